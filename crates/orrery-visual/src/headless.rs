//! Headless backend: software framebuffer, no window.
//!
//! Used for CI, previews and tests. Every bound shape instance is drawn as
//! a depth-tested square splat at its projected world position, sized by
//! the shape's bounding radius and colored by its material. Grids and axes
//! are drawn as projected points. The result is crude but deterministic and
//! enough to verify that bindings, cameras and the frame loop work.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use orrery_assets::{Keyed, VisualModel};
use orrery_math::{Color, Frame, Mat4, Vec3};
use orrery_physics::{ItemKind, PhysicalItem, PhysicsSystem, StepListener};
use orrery_types::constants::{DEFAULT_FRAMEBUFFER_HEIGHT, DEFAULT_FRAMEBUFFER_WIDTH};
use orrery_types::{AssetKey, CameraId, ItemId, OrreryError, OrreryResult, VisualModelId};

use crate::camera::{Camera, CameraVerticalDir};
use crate::lifecycle::FrameLifecycle;
use crate::system::{VisualSystem, VisualSystemCore};

const FOV_Y_DEGREES: f32 = 45.0;
const Z_NEAR: f32 = 0.01;
const Z_FAR: f32 = 1000.0;
const MAX_SPLAT_RADIUS: i32 = 12;
const AXIS_SAMPLES: usize = 16;
const DEFAULT_BACKGROUND: Color = Color::new(0.9, 0.9, 0.9);
const GRID_COLOR: Color = Color::new(0.6, 0.6, 0.6);

#[derive(Debug)]
struct ItemBinding {
    handle: VisualModelId,
    model_key: AssetKey,
    model: Arc<VisualModel>,
    /// Item frame as of the last refresh.
    frame: Frame,
}

#[derive(Debug)]
struct StandaloneModel {
    model: Arc<VisualModel>,
    frame: Frame,
}

/// A projected draw request.
struct Splat {
    position: Vec3,
    radius: f32,
    color: [u8; 3],
}

/// In-memory rendering backend.
pub struct HeadlessVisualSystem {
    core: VisualSystemCore,
    lifecycle: FrameLifecycle,

    cameras: Vec<Camera>,
    active_camera: Option<usize>,
    /// Used until the first `add_camera`.
    free_camera: Camera,
    vertical: CameraVerticalDir,

    /// Item bindings, ordered for deterministic draws.
    bindings: BTreeMap<ItemId, ItemBinding>,
    standalone: BTreeMap<VisualModelId, StandaloneModel>,
    /// Next visual model handle, shared by item and standalone bindings.
    next_handle: i32,

    width: u32,
    height: u32,
    background: Color,
    color: Vec<u8>,
    depth: Vec<f32>,
    last_frame: Option<Vec<u8>>,
    drawn_instances: usize,

    frame_limit: Option<u64>,
    shutdown_requested: bool,
}

impl HeadlessVisualSystem {
    pub fn new() -> Self {
        let (width, height) = (DEFAULT_FRAMEBUFFER_WIDTH, DEFAULT_FRAMEBUFFER_HEIGHT);
        Self {
            core: VisualSystemCore::new(),
            lifecycle: FrameLifecycle::new(),
            cameras: Vec::new(),
            active_camera: None,
            free_camera: Camera::default(),
            vertical: CameraVerticalDir::default(),
            bindings: BTreeMap::new(),
            standalone: BTreeMap::new(),
            next_handle: 0,
            width,
            height,
            background: DEFAULT_BACKGROUND,
            color: vec![0; pixel_count(width, height) * 3],
            depth: vec![f32::INFINITY; pixel_count(width, height)],
            last_frame: None,
            drawn_instances: 0,
            frame_limit: None,
            shutdown_requested: false,
        }
    }

    /// Builder: framebuffer size in pixels (each side at least 1).
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self.color = vec![0; pixel_count(self.width, self.height) * 3];
        self.depth = vec![f32::INFINITY; pixel_count(self.width, self.height)];
        self.last_frame = None;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Builder: `run()` returns false after `frames` completed frames.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Makes the next `run()` return false.
    pub fn request_shutdown(&mut self) {
        self.shutdown_requested = true;
    }

    // ─── Inspection ───────────────────────────────────────────

    pub fn lifecycle(&self) -> &FrameLifecycle {
        &self.lifecycle
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of item bindings.
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Bound items in id order.
    pub fn bound_items(&self) -> Vec<ItemId> {
        self.bindings.keys().copied().collect()
    }

    /// Handle of the binding for `item`.
    pub fn binding_of(&self, item: ItemId) -> Option<VisualModelId> {
        self.bindings.get(&item).map(|b| b.handle)
    }

    /// Key of the model currently bound for `item`.
    pub fn bound_model_key(&self, item: ItemId) -> Option<AssetKey> {
        self.bindings.get(&item).map(|b| b.model_key)
    }

    /// Cached world frame of `item`'s binding.
    pub fn bound_frame(&self, item: ItemId) -> Option<Frame> {
        self.bindings.get(&item).map(|b| b.frame)
    }

    pub fn standalone_count(&self) -> usize {
        self.standalone.len()
    }

    pub fn standalone_frame(&self, id: VisualModelId) -> Option<Frame> {
        self.standalone.get(&id).map(|m| m.frame)
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    pub fn camera(&self, id: CameraId) -> Option<Camera> {
        self.camera_index(id).map(|i| self.cameras[i])
    }

    /// Handle of the active camera, `INVALID` before any `add_camera`.
    pub fn active_camera(&self) -> CameraId {
        self.active_camera
            .map(|i| CameraId(i as i32))
            .unwrap_or(CameraId::INVALID)
    }

    /// Makes `id` the active camera. Returns false for unknown handles.
    pub fn set_active_camera(&mut self, id: CameraId) -> bool {
        match self.camera_index(id) {
            Some(i) => {
                self.active_camera = Some(i);
                true
            }
            None => {
                tracing::debug!(camera = id.0, "set_active_camera: unknown handle");
                false
            }
        }
    }

    pub fn vertical(&self) -> CameraVerticalDir {
        self.vertical
    }

    /// Shape instances drawn by the last `render`.
    pub fn drawn_instances(&self) -> usize {
        self.drawn_instances
    }

    /// RGB8 pixels of the last completed frame.
    pub fn last_frame(&self) -> Option<&[u8]> {
        self.last_frame.as_deref()
    }

    /// Pixel of the last completed frame (or the working buffer before the first one).
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let pixels = self.last_frame.as_deref().unwrap_or(self.color.as_slice());
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([pixels[i], pixels[i + 1], pixels[i + 2]])
    }

    // ─── Binding ──────────────────────────────────────────────

    fn alloc_handle(&mut self) -> VisualModelId {
        let id = VisualModelId(self.next_handle);
        self.next_handle += 1;
        id
    }

    fn sync_item(&mut self, id: ItemId, item: &PhysicalItem) {
        let Some(model) = item.visual_model() else {
            if let Some(binding) = self.bindings.remove(&id) {
                tracing::debug!(item = %item.name, handle = binding.handle.0, "visual model removed, unbound");
            }
            return;
        };

        let key = model.asset_key();
        if let Some(binding) = self.bindings.get_mut(&id) {
            if binding.model_key != key {
                tracing::debug!(item = %item.name, handle = binding.handle.0, "visual model replaced, rebound");
                binding.model = Arc::clone(model);
                binding.model_key = key;
            }
            binding.frame = item.frame;
            return;
        }

        let handle = self.alloc_handle();
        tracing::debug!(item = %item.name, handle = handle.0, "item bound");
        self.bindings.insert(
            id,
            ItemBinding {
                handle,
                model_key: key,
                model: Arc::clone(model),
                frame: item.frame,
            },
        );
    }

    fn sync_system(&mut self, system: &PhysicsSystem) {
        let sid = system.id();
        self.bindings
            .retain(|id, _| id.system != sid || system.contains(*id));
        for (id, item) in system.items() {
            self.sync_item(id, item);
        }
    }

    fn refresh_frames_from(&mut self, system: &PhysicsSystem) {
        let sid = system.id();
        for (id, binding) in self.bindings.iter_mut() {
            if id.system != sid {
                continue;
            }
            if let Some(item) = system.get(*id) {
                binding.frame = item.frame;
            }
        }
    }

    /// Refreshes cached frames from systems that are not currently stepping.
    fn refresh_frames(&mut self) {
        for system in self.core.systems() {
            if let Ok(sys) = system.try_borrow() {
                self.refresh_frames_from(&sys);
            }
        }
    }

    // ─── Cameras ──────────────────────────────────────────────

    fn camera_index(&self, id: CameraId) -> Option<usize> {
        if !id.is_valid() {
            return None;
        }
        let i = id.0 as usize;
        (i < self.cameras.len()).then_some(i)
    }

    fn active_camera_ref(&self) -> &Camera {
        self.active_camera
            .and_then(|i| self.cameras.get(i))
            .unwrap_or(&self.free_camera)
    }

    fn active_camera_mut(&mut self) -> &mut Camera {
        match self.active_camera {
            Some(i) if i < self.cameras.len() => &mut self.cameras[i],
            _ => &mut self.free_camera,
        }
    }

    fn focal_length_px(&self) -> f32 {
        self.height as f32 * 0.5 / (FOV_Y_DEGREES.to_radians() * 0.5).tan()
    }

    fn view_projection(&self) -> Mat4 {
        let aspect = self.width as f32 / self.height as f32;
        let proj = Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, Z_NEAR, Z_FAR);
        proj * self.active_camera_ref().view_matrix(self.vertical)
    }

    // ─── Rasterization ────────────────────────────────────────

    fn clear_buffers(&mut self) {
        let bg = self.background.to_rgb8();
        for px in self.color.chunks_exact_mut(3) {
            px.copy_from_slice(&bg);
        }
        self.depth.fill(f32::INFINITY);
    }

    /// Draws a splat. `radius` is in world units; zero draws a single pixel.
    fn draw(&mut self, view_proj: &Mat4, splat: &Splat) -> bool {
        let clip = *view_proj * splat.position.extend(1.0);
        if clip.w <= Z_NEAR {
            return false;
        }
        let ndc = clip.truncate() / clip.w;
        if !(0.0..=1.0).contains(&ndc.z) {
            return false;
        }
        let fx = ((ndc.x * 0.5 + 0.5) * self.width as f32).floor();
        let fy = ((0.5 - ndc.y * 0.5) * self.height as f32).floor();
        // Splats centered further off-screen than the largest radius cannot touch it.
        let margin = MAX_SPLAT_RADIUS as f32;
        if !(-margin..=self.width as f32 + margin).contains(&fx)
            || !(-margin..=self.height as f32 + margin).contains(&fy)
        {
            return false;
        }
        let (sx, sy) = (fx as i32, fy as i32);
        let r = if splat.radius > 0.0 {
            ((splat.radius * self.focal_length_px() / clip.w).round() as i32).clamp(1, MAX_SPLAT_RADIUS)
        } else {
            0
        };

        let mut written = false;
        for y in (sy - r)..=(sy + r) {
            if y < 0 || y >= self.height as i32 {
                continue;
            }
            for x in (sx - r)..=(sx + r) {
                if x < 0 || x >= self.width as i32 {
                    continue;
                }
                let p = y as usize * self.width as usize + x as usize;
                if ndc.z < self.depth[p] {
                    self.depth[p] = ndc.z;
                    self.color[p * 3..p * 3 + 3].copy_from_slice(&splat.color);
                    written = true;
                }
            }
        }
        written
    }

    fn axis_splats(frame: &Frame, axis_length: f32, out: &mut Vec<Splat>) {
        let axes = [
            (Vec3::X, Color::RED),
            (Vec3::Y, Color::GREEN),
            (Vec3::Z, Color::BLUE),
        ];
        for (axis, color) in axes {
            let color = color.to_rgb8();
            for s in 0..=AXIS_SAMPLES {
                let t = s as f32 / AXIS_SAMPLES as f32;
                out.push(Splat {
                    position: frame.transform_point(axis * axis_length * t),
                    radius: 0.0,
                    color,
                });
            }
        }
    }

    fn encode(&self, pixels: &[u8], path: &Path) -> OrreryResult<()> {
        let img = image::RgbImage::from_raw(self.width, self.height, pixels.to_vec())
            .ok_or_else(|| OrreryError::Image("framebuffer size mismatch".into()))?;
        img.save(path).map_err(|e| OrreryError::Image(e.to_string()))
    }
}

fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

fn model_splats(model: &VisualModel, parent: &Frame, out: &mut Vec<Splat>) {
    let fallback = model.primary_material().map(|m| m.diffuse).unwrap_or(Color::GRAY);
    for inst in model.instances() {
        let color = inst.material.as_ref().map(|m| m.diffuse).unwrap_or(fallback);
        out.push(Splat {
            position: inst.world_frame(parent).position,
            radius: inst.shape.geometry().bounding_radius(),
            color: color.to_rgb8(),
        });
    }
}

impl Default for HeadlessVisualSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl StepListener for HeadlessVisualSystem {
    fn on_setup(&mut self, system: &PhysicsSystem) {
        if self.core.is_attached(system.id()) {
            self.sync_system(system);
        }
    }

    fn on_update(&mut self, system: &PhysicsSystem) {
        if self.core.is_attached(system.id()) {
            self.refresh_frames_from(system);
        }
    }

    fn on_clear(&mut self, system: &PhysicsSystem) {
        let sid = system.id();
        let before = self.bindings.len();
        self.bindings.retain(|id, _| id.system != sid);
        tracing::debug!(dropped = before - self.bindings.len(), "system cleared");
    }
}

impl VisualSystem for HeadlessVisualSystem {
    fn core(&self) -> &VisualSystemCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut VisualSystemCore {
        &mut self.core
    }

    fn bind_all(&mut self) {
        let live = self.core.system_ids();
        self.bindings.retain(|id, _| live.contains(&id.system));
        for system in self.core.systems() {
            match system.try_borrow() {
                Ok(sys) => self.sync_system(&sys),
                Err(_) => tracing::warn!("bind_all skipped a system that is stepping"),
            }
        }
        tracing::debug!(bindings = self.bindings.len(), "bind_all complete");
    }

    fn bind_item(&mut self, item: ItemId) {
        for system in self.core.systems() {
            let Ok(sys) = system.try_borrow() else {
                continue;
            };
            if sys.id() != item.system {
                continue;
            }
            match sys.get(item) {
                Some(physical) => self.sync_item(item, physical),
                None => {
                    if self.bindings.remove(&item).is_some() {
                        tracing::debug!(?item, "stale item unbound");
                    }
                }
            }
            return;
        }
        tracing::debug!(?item, "bind_item: item not in an attached system");
    }

    fn add_camera(&mut self, position: Vec3, target: Vec3) -> CameraId {
        self.cameras.push(Camera::new(position, target));
        let index = self.cameras.len() - 1;
        self.active_camera = Some(index);
        CameraId(index as i32)
    }

    fn set_camera_position_of(&mut self, id: CameraId, position: Vec3) {
        match self.camera_index(id) {
            Some(i) => self.cameras[i].position = position,
            None => tracing::debug!(camera = id.0, "set_camera_position_of: unknown handle"),
        }
    }

    fn set_camera_target_of(&mut self, id: CameraId, target: Vec3) {
        match self.camera_index(id) {
            Some(i) => self.cameras[i].target = target,
            None => tracing::debug!(camera = id.0, "set_camera_target_of: unknown handle"),
        }
    }

    fn set_camera_position(&mut self, position: Vec3) {
        self.active_camera_mut().position = position;
    }

    fn set_camera_target(&mut self, target: Vec3) {
        self.active_camera_mut().target = target;
    }

    fn camera_position(&self) -> Vec3 {
        self.active_camera_ref().position
    }

    fn camera_target(&self) -> Vec3 {
        self.active_camera_ref().target
    }

    fn set_camera_vertical(&mut self, vertical: CameraVerticalDir) {
        self.vertical = vertical;
    }

    fn add_visual_model(&mut self, model: Arc<VisualModel>, frame: Frame) -> VisualModelId {
        let handle = self.alloc_handle();
        self.standalone.insert(handle, StandaloneModel { model, frame });
        handle
    }

    fn update_visual_model(&mut self, id: VisualModelId, frame: Frame) {
        match self.standalone.get_mut(&id) {
            Some(m) => m.frame = frame,
            None => tracing::debug!(model = id.0, "update_visual_model: unknown handle"),
        }
    }

    fn run(&mut self) -> bool {
        let within_budget = self
            .frame_limit
            .map_or(true, |limit| self.lifecycle.frames_completed() < limit);
        self.lifecycle.run(within_budget && !self.shutdown_requested)
    }

    fn begin_scene(&mut self) {
        if self.lifecycle.begin_scene().is_ok() {
            self.clear_buffers();
        }
    }

    fn render(&mut self) {
        if self.lifecycle.check_render("render").is_err() {
            return;
        }
        self.refresh_frames();

        let mut splats = Vec::new();
        for binding in self.bindings.values() {
            model_splats(&binding.model, &binding.frame, &mut splats);
        }
        for standalone in self.standalone.values() {
            model_splats(&standalone.model, &standalone.frame, &mut splats);
        }

        let view_proj = self.view_projection();
        self.drawn_instances = 0;
        for splat in &splats {
            if self.draw(&view_proj, splat) {
                self.drawn_instances += 1;
            }
        }
    }

    fn end_scene(&mut self) {
        let Ok(index) = self.lifecycle.end_scene() else {
            return;
        };
        self.last_frame = Some(self.color.clone());
        if self.core.image_output() {
            let path = self.core.image_path(index);
            if let Err(err) = self.encode(&self.color, &path) {
                tracing::warn!(%err, path = %path.display(), "frame capture failed");
            }
        }
    }

    fn render_grid(&mut self, frame: &Frame, divisions: u32, delta: f32) {
        if self.lifecycle.check_render("render_grid").is_err() || divisions == 0 {
            return;
        }
        let half = divisions as f32 * delta * 0.5;
        let samples = divisions * 4;
        let color = GRID_COLOR.to_rgb8();
        let mut splats = Vec::new();
        for line in 0..=divisions {
            let offset = -half + line as f32 * delta;
            for s in 0..=samples {
                let along = -half + 2.0 * half * s as f32 / samples as f32;
                for local in [Vec3::new(offset, along, 0.0), Vec3::new(along, offset, 0.0)] {
                    splats.push(Splat {
                        position: frame.transform_point(local),
                        radius: 0.0,
                        color,
                    });
                }
            }
        }
        let view_proj = self.view_projection();
        for splat in &splats {
            self.draw(&view_proj, splat);
        }
    }

    fn render_frame(&mut self, frame: &Frame, axis_length: f32) {
        if self.lifecycle.check_render("render_frame").is_err() {
            return;
        }
        let mut splats = Vec::new();
        Self::axis_splats(frame, axis_length, &mut splats);
        let view_proj = self.view_projection();
        for splat in &splats {
            self.draw(&view_proj, splat);
        }
    }

    fn render_cog_frames(&mut self, axis_length: f32) {
        if self.lifecycle.check_render("render_cog_frames").is_err() {
            return;
        }
        let mut splats = Vec::new();
        for system in self.core.systems() {
            let Ok(sys) = system.try_borrow() else {
                continue;
            };
            for (_, item) in sys.items() {
                if item.kind == ItemKind::Body {
                    Self::axis_splats(&item.cog_frame(), axis_length, &mut splats);
                }
            }
        }
        let view_proj = self.view_projection();
        for splat in &splats {
            self.draw(&view_proj, splat);
        }
    }

    fn write_image_to_file(&mut self, path: &Path) -> OrreryResult<()> {
        let pixels = self.last_frame.as_deref().unwrap_or(self.color.as_slice());
        self.encode(pixels, path)?;
        tracing::info!(path = %path.display(), "frame written");
        Ok(())
    }
}
