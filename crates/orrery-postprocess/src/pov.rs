//! POV-Ray exporter.
//!
//! # Usage
//!
//! ```text
//! let mut pov = PovExporter::new(&system).with_config(config);
//! pov.add_all();
//! pov.export_script()?;            // once
//! loop {
//!     system.borrow_mut().do_step(dt);
//!     pov.export_data()?;          // once per frame
//! }
//! ```
//!
//! Shapes and materials get sequential ids in first-encounter order over
//! registered items (registration order, then instance order within each
//! model). In single asset file mode the declarations live in
//! `<script>.assets`: the script export writes every asset known so far,
//! each data export appends the ones it encountered first. Otherwise each
//! data file declares the assets it references.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

use orrery_assets::{VisualMaterial, VisualShape};
use orrery_math::{Color, Vec3};
use orrery_physics::{ItemKind, PhysicsSystem, SharedSystem};
use orrery_types::{ItemId, OrreryError, OrreryResult};

use crate::config::{ContactDisplay, ContactSymbol, ExportConfig, Overlay};
use crate::exporter::SceneExporter;
use crate::registry::ExportRegistry;
use crate::writer::{self, PovWriter};

/// Exports a physics system to POV-Ray script and data files.
pub struct PovExporter {
    system: Weak<RefCell<PhysicsSystem>>,
    config: ExportConfig,
    /// Registered items, in registration order.
    items: Vec<ItemId>,
    shapes: ExportRegistry<VisualShape>,
    materials: ExportRegistry<VisualMaterial>,
    /// Number used by the next `export_data`.
    frame_number: u32,
}

impl PovExporter {
    /// Creates an exporter for `system` with default settings.
    pub fn new(system: &SharedSystem) -> Self {
        Self {
            system: Rc::downgrade(system),
            config: ExportConfig::default(),
            items: Vec::new(),
            shapes: ExportRegistry::new(),
            materials: ExportRegistry::new(),
            frame_number: 0,
        }
    }

    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ExportConfig) {
        self.config = config;
    }

    // ─── Membership ───────────────────────────────────────────

    /// Registers an item. Items without a visual model, stale ids and
    /// duplicates are ignored. Returns true if the item was added.
    pub fn add(&mut self, id: ItemId) -> bool {
        if self.items.contains(&id) {
            return false;
        }
        let Ok(system) = self.live_system() else {
            tracing::warn!(?id, "add: physics system unavailable");
            return false;
        };
        let Ok(sys) = system.try_borrow() else {
            tracing::warn!(?id, "add: physics system is stepping");
            return false;
        };
        match sys.get(id) {
            Some(item) if item.has_visual_model() => {
                self.items.push(id);
                true
            }
            Some(item) => {
                tracing::debug!(item = %item.name, "add: item has no visual model");
                false
            }
            None => {
                tracing::debug!(?id, "add: stale item id");
                false
            }
        }
    }

    /// Unregisters an item. Registry entries stay.
    pub fn remove(&mut self, id: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| *i != id);
        before != self.items.len()
    }

    /// Registers every item of the system that has a visual model.
    /// Returns the number of newly added items.
    pub fn add_all(&mut self) -> usize {
        let ids = match self.live_system() {
            Ok(system) => match system.try_borrow() {
                Ok(sys) => sys
                    .items()
                    .filter(|(_, item)| item.has_visual_model())
                    .map(|(id, _)| id)
                    .collect::<Vec<_>>(),
                Err(_) => {
                    tracing::warn!("add_all: physics system is stepping");
                    return 0;
                }
            },
            Err(_) => {
                tracing::warn!("add_all: physics system unavailable");
                return 0;
            }
        };
        let mut added = 0;
        for id in ids {
            if !self.items.contains(&id) {
                self.items.push(id);
                added += 1;
            }
        }
        added
    }

    pub fn remove_all(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains(&id)
    }

    pub fn shape_registry(&self) -> &ExportRegistry<VisualShape> {
        &self.shapes
    }

    pub fn material_registry(&self) -> &ExportRegistry<VisualMaterial> {
        &self.materials
    }

    // ─── Settings ─────────────────────────────────────────────

    pub fn set_base_path(&mut self, path: impl Into<PathBuf>) {
        self.config.base_path = path.into();
    }

    pub fn set_output_script_file(&mut self, name: impl Into<String>) {
        self.config.script_file = name.into();
    }

    pub fn set_picture_filebase(&mut self, base: impl Into<String>) {
        self.config.picture_base = base.into();
    }

    pub fn set_output_data_filebase(&mut self, base: impl Into<String>) {
        self.config.data_base = base.into();
    }

    pub fn set_picture_size(&mut self, width: u32, height: u32) {
        self.config.picture_width = width;
        self.config.picture_height = height;
    }

    pub fn set_antialiasing(&mut self, enabled: bool, depth: u32, threshold: f32) {
        self.config.antialias.enabled = enabled;
        self.config.antialias.depth = depth;
        self.config.antialias.threshold = threshold;
    }

    pub fn set_camera(&mut self, location: Vec3, aim: Vec3, angle: f32, orthographic: bool) {
        self.config.camera.location = location;
        self.config.camera.aim = aim;
        self.config.camera.angle = angle;
        self.config.camera.orthographic = orthographic;
    }

    pub fn set_light(&mut self, location: Vec3, color: Color, cast_shadow: bool) {
        self.config.light.location = location;
        self.config.light.color = color;
        self.config.light.cast_shadow = cast_shadow;
    }

    pub fn set_background(&mut self, color: Color) {
        self.config.background = color;
    }

    pub fn set_ambient_light(&mut self, color: Color) {
        self.config.ambient_light = color;
    }

    pub fn set_show_cogs(&mut self, show: bool, size: f32) {
        self.config.cogs = Overlay { show, size };
    }

    pub fn set_show_frames(&mut self, show: bool, size: f32) {
        self.config.frames = Overlay { show, size };
    }

    pub fn set_show_links(&mut self, show: bool, size: f32) {
        self.config.links = Overlay { show, size };
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_show_contacts(
        &mut self,
        show: bool,
        symbol: ContactSymbol,
        scale: f32,
        width: f32,
        max_size: f32,
        colormap: bool,
        colormap_start: f32,
        colormap_end: f32,
    ) {
        self.config.contacts = ContactDisplay {
            show,
            symbol,
            scale,
            width,
            max_size,
            colormap,
            colormap_start,
            colormap_end,
        };
    }

    pub fn set_wireframe_thickness(&mut self, thickness: f32) {
        self.config.wireframe_thickness = thickness;
    }

    /// Text appended to the script just before the data include.
    pub fn set_custom_script(&mut self, text: impl Into<String>) {
        self.config.custom_script = text.into();
    }

    /// Text appended to every data file.
    pub fn set_custom_data(&mut self, text: impl Into<String>) {
        self.config.custom_data = text.into();
    }

    pub fn set_use_single_asset_file(&mut self, single: bool) {
        self.config.single_asset_file = single;
    }

    /// Number used by the next `export_data`.
    pub fn set_frame_number(&mut self, frame: u32) {
        self.frame_number = frame;
    }

    pub fn frame_number(&self) -> u32 {
        self.frame_number
    }

    // ─── Export ───────────────────────────────────────────────

    /// Writes the `.ini`, the script and (single asset file mode) the
    /// asset file under the configured names.
    pub fn export_script(&mut self) -> OrreryResult<PathBuf> {
        let name = PathBuf::from(&self.config.script_file);
        self.export_script_to(&name)?;
        Ok(self.config.script_path())
    }

    /// Writes the next numbered data file and advances the frame counter.
    pub fn export_data(&mut self) -> OrreryResult<PathBuf> {
        let next = self.frame_number.checked_add(1).ok_or_else(|| {
            OrreryError::InvalidConfig(format!("frame number {} is the last one available", self.frame_number))
        })?;
        let path = self.config.data_path(self.frame_number);
        self.write_data(&path)?;
        self.frame_number = next;
        Ok(path)
    }

    fn live_system(&self) -> OrreryResult<Rc<RefCell<PhysicsSystem>>> {
        self.system
            .upgrade()
            .ok_or_else(|| OrreryError::SystemUnavailable("physics system was dropped".into()))
    }

    fn require_dir(dir: &Path) -> OrreryResult<()> {
        if dir.as_os_str().is_empty() || dir.is_dir() {
            Ok(())
        } else {
            Err(OrreryError::MissingDirectory(dir.to_path_buf()))
        }
    }

    /// Registers the assets of every registered item, in order.
    fn register_assets(&mut self, sys: &PhysicsSystem) {
        for id in &self.items {
            let Some(model) = sys.get(*id).and_then(|item| item.visual_model()) else {
                continue;
            };
            for inst in model.instances() {
                self.shapes.register(&inst.shape);
                if let Some(mat) = &inst.material {
                    self.materials.register(mat);
                }
            }
        }
    }

    fn assets_text(&self) -> String {
        let mut w = PovWriter::new();
        w.line("// Asset declarations written by orrery.");
        for (id, mat) in self.materials.iter() {
            writer::declare_material(&mut w, id, mat);
        }
        for (id, shape) in self.shapes.iter() {
            writer::declare_shape(&mut w, id, shape, self.config.wireframe_thickness);
        }
        w.finish()
    }

    fn write_data(&mut self, path: &Path) -> OrreryResult<()> {
        if let Some(parent) = path.parent() {
            Self::require_dir(parent)?;
        }
        let system = self.live_system()?;
        let sys = system
            .try_borrow()
            .map_err(|_| OrreryError::SystemUnavailable("physics system is stepping".into()))?;

        let single = self.config.single_asset_file;
        let mut decls = PovWriter::new();
        let mut body = PovWriter::new();
        let mut declared_shapes = HashSet::new();
        let mut declared_materials = HashSet::new();
        let mut written = 0usize;

        for id in &self.items {
            let Some(item) = sys.get(*id) else {
                tracing::debug!(?id, "export_data: skipping stale item");
                continue;
            };
            let Some(model) = item.visual_model() else {
                continue;
            };
            written += 1;
            let name = writer::single_line(&item.name).replace('"', "'");
            body.line(&format!("// {} \"{}\"", item.kind.name(), name));

            for inst in model.instances() {
                let (shape_id, new_shape) = self.shapes.register(&inst.shape);
                let declare = if single { new_shape } else { declared_shapes.insert(shape_id) };
                if declare {
                    writer::declare_shape(&mut decls, shape_id, &inst.shape, self.config.wireframe_thickness);
                }

                let material_id = inst.material.as_ref().map(|mat| {
                    let (mat_id, new_mat) = self.materials.register(mat);
                    let declare = if single { new_mat } else { declared_materials.insert(mat_id) };
                    if declare {
                        writer::declare_material(&mut decls, mat_id, mat);
                    }
                    mat_id
                });

                writer::place_object(&mut body, shape_id, material_id, &inst.world_frame(&item.frame));
            }

            if item.kind == ItemKind::Body {
                if self.config.cogs.show {
                    writer::cog_call(&mut body, &item.cog_frame(), self.config.cogs.size);
                }
                if self.config.frames.show {
                    writer::axes_call(&mut body, "sh_frame", &item.frame, self.config.frames.size);
                }
            }
        }

        // Link frames cover every link of the system, registered or not.
        if self.config.links.show {
            for (_, item) in sys.items().filter(|(_, item)| item.kind == ItemKind::Link) {
                writer::axes_call(&mut body, "sh_link", &item.frame, self.config.links.size);
            }
        }

        if self.config.contacts.show {
            for contact in sys.contacts() {
                writer::contact_call(&mut body, contact, &self.config.contacts);
            }
        }

        let mut out = PovWriter::new();
        out.line(&format!("// Frame data written by orrery: {} items", written));
        out.line(&format!("#declare sim_time = {};", sys.time()));
        out.blank();
        drop(sys);

        if single {
            if !decls.is_empty() {
                let assets_path = self.config.assets_path();
                if let Some(parent) = assets_path.parent() {
                    Self::require_dir(parent)?;
                }
                let mut file = OpenOptions::new().create(true).append(true).open(&assets_path)?;
                file.write_all(decls.finish().as_bytes())?;
            }
        } else if !decls.is_empty() {
            out.raw(&decls.finish());
            out.blank();
        }

        out.raw(&body.finish());
        if !self.config.custom_data.is_empty() {
            out.blank();
            out.raw(&self.config.custom_data);
        }

        fs::write(path, out.finish())?;
        tracing::info!(path = %path.display(), items = written, "data exported");
        Ok(())
    }
}

impl SceneExporter for PovExporter {
    fn export_script_to(&mut self, path: &Path) -> OrreryResult<()> {
        self.config.script_file = path.to_string_lossy().into_owned();

        Self::require_dir(&self.config.base_path)?;
        Self::require_dir(&self.config.picture_dir_path())?;
        Self::require_dir(&self.config.output_dir_path())?;

        let system = self.live_system()?;
        {
            let sys = system
                .try_borrow()
                .map_err(|_| OrreryError::SystemUnavailable("physics system is stepping".into()))?;
            self.register_assets(&sys);
        }

        fs::write(self.config.ini_path(), writer::ini(&self.config))?;
        let script_path = self.config.script_path();
        fs::write(&script_path, writer::script(&self.config))?;
        if self.config.single_asset_file {
            fs::write(self.config.assets_path(), self.assets_text())?;
        }

        tracing::info!(
            path = %script_path.display(),
            shapes = self.shapes.len(),
            materials = self.materials.len(),
            "script exported"
        );
        Ok(())
    }

    fn export_data_to(&mut self, path: &Path) -> OrreryResult<()> {
        let full = self.config.base_path.join(path);
        self.write_data(&full)
    }

    fn name(&self) -> &str {
        "povray"
    }
}
