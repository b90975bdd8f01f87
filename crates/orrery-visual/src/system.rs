//! The visualization interface.
//!
//! [`VisualSystem`] splits into a required subset (the frame lifecycle)
//! and an optional subset with no-op defaults. A backend that only
//! implements the lifecycle still compiles and runs: cameras come back
//! as [`CameraId::INVALID`], visual models as [`VisualModelId::INVALID`],
//! and every other optional call is silently absorbed.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};
use std::sync::Arc;

use orrery_assets::{VisualModel, VisualShape};
use orrery_math::{Frame, Vec3};
use orrery_physics::{PhysicsSystem, SharedSystem, StepListener};
use orrery_types::{CameraId, ItemId, OrreryResult, SystemId, VisualModelId};

use crate::camera::CameraVerticalDir;

/// State every backend carries: attached systems and image output settings.
#[derive(Debug, Default)]
pub struct VisualSystemCore {
    systems: Vec<(SystemId, Weak<RefCell<PhysicsSystem>>)>,
    image_dir: PathBuf,
    image_output: bool,
}

impl VisualSystemCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an attachment. Returns false if the system was already
    /// attached or is currently borrowed.
    pub fn push_system(&mut self, system: &SharedSystem) -> bool {
        let weak = Rc::downgrade(system);
        if self.systems.iter().any(|(_, w)| Weak::ptr_eq(w, &weak)) {
            return false;
        }
        let Ok(id) = system.try_borrow().map(|s| s.id()) else {
            tracing::warn!("cannot attach a physics system while it is stepping");
            return false;
        };
        self.systems.push((id, weak));
        true
    }

    /// True if a live system with this id is attached.
    pub fn is_attached(&self, id: SystemId) -> bool {
        self.systems
            .iter()
            .any(|(sid, w)| *sid == id && w.strong_count() > 0)
    }

    /// Attached systems that are still alive, in attachment order.
    pub fn systems(&self) -> Vec<SharedSystem> {
        self.systems.iter().filter_map(|(_, w)| w.upgrade()).collect()
    }

    /// Ids of attached systems that are still alive.
    pub fn system_ids(&self) -> Vec<SystemId> {
        self.systems
            .iter()
            .filter(|(_, w)| w.strong_count() > 0)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn system_count(&self) -> usize {
        self.systems.iter().filter(|(_, w)| w.strong_count() > 0).count()
    }

    /// First live attached system.
    pub fn first_system(&self) -> Option<SharedSystem> {
        self.systems.iter().find_map(|(_, w)| w.upgrade())
    }

    pub fn set_image_dir(&mut self, dir: &Path) {
        self.image_dir = dir.to_path_buf();
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    pub fn set_image_output(&mut self, enabled: bool) {
        self.image_output = enabled;
    }

    pub fn image_output(&self) -> bool {
        self.image_output
    }

    /// Path of the automatically saved image for `frame`.
    pub fn image_path(&self, frame: u64) -> PathBuf {
        self.image_dir.join(format!("img_{:05}.png", frame))
    }
}

/// Contract between a physics system and a rendering backend.
///
/// Lifecycle hooks come from the [`StepListener`] supertrait; use
/// [`attach`] to register them together with the attachment.
pub trait VisualSystem: StepListener {
    fn core(&self) -> &VisualSystemCore;

    fn core_mut(&mut self) -> &mut VisualSystemCore;

    // ─── Attachment & binding ─────────────────────────────────

    /// Attaches a physics system and binds all of its items.
    ///
    /// Re-attaching the same system is ignored.
    fn attach_system(&mut self, system: &SharedSystem) {
        if self.core_mut().push_system(system) {
            tracing::info!(systems = self.core().system_count(), "physics system attached");
            self.bind_all();
        } else {
            tracing::debug!("attach_system ignored");
        }
    }

    /// Resynchronizes bindings with every attached system.
    fn bind_all(&mut self) {}

    /// Resynchronizes the binding of a single item.
    fn bind_item(&mut self, item: ItemId) {
        let _ = item;
    }

    // ─── Cameras ──────────────────────────────────────────────

    /// Adds a camera. Backends without multi-camera support return
    /// [`CameraId::INVALID`].
    fn add_camera(&mut self, position: Vec3, target: Vec3) -> CameraId {
        let _ = (position, target);
        CameraId::INVALID
    }

    fn set_camera_position_of(&mut self, id: CameraId, position: Vec3) {
        let _ = (id, position);
    }

    fn set_camera_target_of(&mut self, id: CameraId, target: Vec3) {
        let _ = (id, target);
    }

    /// Sets the position of the active camera.
    fn set_camera_position(&mut self, position: Vec3) {
        let _ = position;
    }

    /// Sets the target of the active camera.
    fn set_camera_target(&mut self, target: Vec3) {
        let _ = target;
    }

    fn camera_position(&self) -> Vec3 {
        Vec3::ZERO
    }

    fn camera_target(&self) -> Vec3 {
        Vec3::ZERO
    }

    /// Moves camera `id`; a `None` target leaves the target unchanged.
    fn update_camera_of(&mut self, id: CameraId, position: Vec3, target: Option<Vec3>) {
        self.set_camera_position_of(id, position);
        if let Some(target) = target {
            self.set_camera_target_of(id, target);
        }
    }

    /// Moves the active camera; a `None` target leaves the target unchanged.
    fn update_camera(&mut self, position: Vec3, target: Option<Vec3>) {
        self.set_camera_position(position);
        if let Some(target) = target {
            self.set_camera_target(target);
        }
    }

    fn set_camera_vertical(&mut self, vertical: CameraVerticalDir) {
        let _ = vertical;
    }

    // ─── Standalone visual models ─────────────────────────────

    /// Adds a model not tied to any physical item.
    fn add_visual_model(&mut self, model: Arc<VisualModel>, frame: Frame) -> VisualModelId {
        let _ = (model, frame);
        VisualModelId::INVALID
    }

    /// Adds a single shape as a standalone model.
    fn add_visual_shape(&mut self, shape: Arc<VisualShape>, frame: Frame) -> VisualModelId {
        self.add_visual_model(Arc::new(VisualModel::from_shape(shape, None)), frame)
    }

    fn update_visual_model(&mut self, id: VisualModelId, frame: Frame) {
        let _ = (id, frame);
    }

    // ─── Frame lifecycle ──────────────────────────────────────

    /// Returns false once the backend should stop (window closed,
    /// frame budget spent). Shutdown is terminal.
    fn run(&mut self) -> bool;

    fn begin_scene(&mut self);

    /// Draws all bound items.
    fn render(&mut self);

    fn end_scene(&mut self);

    /// Draws a `divisions`×`divisions` grid with spacing `delta` in the
    /// XY plane of `frame`.
    fn render_grid(&mut self, frame: &Frame, divisions: u32, delta: f32) {
        let _ = (frame, divisions, delta);
    }

    /// Draws the axes of `frame`.
    fn render_frame(&mut self, frame: &Frame, axis_length: f32) {
        let _ = (frame, axis_length);
    }

    /// Draws the center-of-mass frames of all bodies.
    fn render_cog_frames(&mut self, axis_length: f32) {
        let _ = axis_length;
    }

    /// Saves the current frame; the format follows the file extension.
    fn write_image_to_file(&mut self, path: &Path) -> OrreryResult<()> {
        let _ = path;
        Ok(())
    }

    // ─── Modal analysis ───────────────────────────────────────
    //
    // Oscillation of a selected vibration mode. No-ops unless a backend
    // can display modal assemblies.

    fn enable_modal_analysis(&mut self, enabled: bool) {
        let _ = enabled;
    }

    fn set_modal_mode_number(&mut self, mode: usize) {
        let _ = mode;
    }

    fn set_modal_amplitude(&mut self, amplitude: f64) {
        let _ = amplitude;
    }

    fn set_modal_speed(&mut self, speed: f64) {
        let _ = speed;
    }

    /// Upper bound on the selectable mode number.
    fn set_modal_modes_max(&mut self, max_modes: usize) {
        let _ = max_modes;
    }

    // ─── Queries ──────────────────────────────────────────────

    /// Real-time factor of the first live attached system, or 0.
    fn simulation_rtf(&self) -> f64 {
        self.core()
            .first_system()
            .and_then(|s| s.try_borrow().ok().map(|s| s.rtf()))
            .unwrap_or(0.0)
    }

    /// Simulated time of the first live attached system, or 0.
    fn simulation_time(&self) -> f64 {
        self.core()
            .first_system()
            .and_then(|s| s.try_borrow().ok().map(|s| s.time()))
            .unwrap_or(0.0)
    }

    fn set_image_output_directory(&mut self, dir: &Path) {
        self.core_mut().set_image_dir(dir);
    }

    /// Enables saving `img_NNNNN.png` at every `end_scene` (backends with capture).
    fn set_image_output(&mut self, enabled: bool) {
        self.core_mut().set_image_output(enabled);
    }

    fn systems(&self) -> Vec<SharedSystem> {
        self.core().systems()
    }

    fn system_count(&self) -> usize {
        self.core().system_count()
    }
}

/// Attaches `system` to `visual` and registers `visual` as a step listener.
///
/// The physics system keeps only a weak reference to the backend.
pub fn attach<V: VisualSystem + 'static>(visual: &Rc<RefCell<V>>, system: &SharedSystem) {
    match system.try_borrow_mut() {
        Ok(mut sys) => sys.add_listener(visual),
        Err(_) => {
            tracing::warn!("cannot attach a physics system while it is stepping");
            return;
        }
    }
    match visual.try_borrow_mut() {
        Ok(mut vis) => vis.attach_system(system),
        Err(_) => tracing::warn!("visual system busy, attach skipped"),
    }
}
