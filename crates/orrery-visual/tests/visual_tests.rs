//! Integration tests for orrery-visual.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use orrery_assets::{Keyed, VisualMaterial, VisualModel, VisualShape};
use orrery_math::{Color, Frame, Vec3};
use orrery_physics::{PhysicalItem, PhysicsSystem, SharedSystem, StepListener};
use orrery_types::{CameraId, VisualModelId};
use orrery_visual::{
    attach, CameraVerticalDir, FrameLifecycle, FrameState, HeadlessVisualSystem, LifecycleViolation,
    VisualSystem, VisualSystemCore,
};

fn sphere_model(color: Color) -> Arc<VisualModel> {
    let mat = Arc::new(VisualMaterial::new("m", color));
    Arc::new(VisualModel::from_shape(Arc::new(VisualShape::sphere(0.2)), Some(mat)))
}

/// Three items with models, one without.
fn make_system() -> (SharedSystem, Vec<orrery_types::ItemId>) {
    let mut sys = PhysicsSystem::new();
    let ids = vec![
        sys.add(PhysicalItem::body("a").with_visual_model(sphere_model(Color::RED))),
        sys.add(PhysicalItem::body("b").with_visual_model(sphere_model(Color::GREEN))),
        sys.add(PhysicalItem::body("bare")),
        sys.add(PhysicalItem::link("c").with_visual_model(sphere_model(Color::BLUE))),
    ];
    (sys.into_shared(), ids)
}

// ─── Minimal Backend ──────────────────────────────────────────

/// Implements only the required lifecycle.
#[derive(Default)]
struct MinimalBackend {
    core: VisualSystemCore,
    frames: u32,
}

impl StepListener for MinimalBackend {}

impl VisualSystem for MinimalBackend {
    fn core(&self) -> &VisualSystemCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut VisualSystemCore {
        &mut self.core
    }

    fn run(&mut self) -> bool {
        self.frames < 2
    }

    fn begin_scene(&mut self) {}

    fn render(&mut self) {}

    fn end_scene(&mut self) {
        self.frames += 1;
    }
}

#[test]
fn minimal_backend_returns_sentinels() {
    let mut backend = MinimalBackend::default();
    assert_eq!(backend.add_camera(Vec3::ONE, Vec3::ZERO), CameraId::INVALID);
    assert_eq!(
        backend.add_visual_shape(Arc::new(VisualShape::sphere(1.0)), Frame::IDENTITY),
        VisualModelId::INVALID
    );
    backend.update_camera(Vec3::X, Some(Vec3::Y));
    backend.set_camera_vertical(CameraVerticalDir::Z);
    assert_eq!(backend.camera_position(), Vec3::ZERO);
    assert!(backend.write_image_to_file(std::path::Path::new("unused.png")).is_ok());
}

#[test]
fn modal_controls_are_accepted_and_ignored() {
    let (sys, _) = make_system();
    let mut vis = HeadlessVisualSystem::new().with_frame_limit(1);
    vis.attach_system(&sys);
    vis.bind_all();
    vis.enable_modal_analysis(true);
    vis.set_modal_mode_number(3);
    vis.set_modal_amplitude(0.5);
    vis.set_modal_speed(2.0);
    vis.set_modal_modes_max(12);
    assert_eq!(vis.binding_count(), 3);

    let mut backend = MinimalBackend::default();
    backend.enable_modal_analysis(true);
    backend.set_modal_mode_number(1);
    assert_eq!(backend.system_count(), 0);
}

#[test]
fn minimal_backend_drives_frame_loop() {
    let (sys, _) = make_system();
    let backend = Rc::new(RefCell::new(MinimalBackend::default()));
    attach(&backend, &sys);
    assert_eq!(backend.borrow().system_count(), 1);

    let mut b = backend.borrow_mut();
    while b.run() {
        b.begin_scene();
        b.render();
        b.render_grid(&Frame::IDENTITY, 10, 0.1);
        b.end_scene();
    }
    assert_eq!(b.frames, 2);
}

#[test]
fn visual_system_is_object_safe() {
    let mut backends: Vec<Box<dyn VisualSystem>> = vec![
        Box::new(MinimalBackend::default()),
        Box::new(HeadlessVisualSystem::new()),
    ];
    for b in &mut backends {
        assert!(b.run());
    }
}

// ─── Binding Tests ────────────────────────────────────────────

#[test]
fn bind_all_binds_items_with_models_only() {
    let (sys, ids) = make_system();
    let mut vis = HeadlessVisualSystem::new();
    vis.attach_system(&sys);

    assert_eq!(vis.binding_count(), 3);
    assert!(vis.binding_of(ids[0]).is_some());
    assert!(vis.binding_of(ids[1]).is_some());
    assert!(vis.binding_of(ids[2]).is_none());
    assert!(vis.binding_of(ids[3]).is_some());
}

#[test]
fn bind_all_is_idempotent() {
    let (sys, ids) = make_system();
    let mut vis = HeadlessVisualSystem::new();
    vis.attach_system(&sys);
    let before: Vec<_> = ids.iter().map(|id| vis.binding_of(*id)).collect();
    vis.bind_all();
    vis.bind_all();
    let after: Vec<_> = ids.iter().map(|id| vis.binding_of(*id)).collect();
    assert_eq!(before, after);
    assert_eq!(vis.binding_count(), 3);
}

#[test]
fn bind_item_only_touches_that_item() {
    let (sys, ids) = make_system();
    let mut vis = HeadlessVisualSystem::new();
    vis.attach_system(&sys);
    let other_handle = vis.binding_of(ids[1]);
    let other_key = vis.bound_model_key(ids[1]);

    let replacement = sphere_model(Color::WHITE);
    let new_key = replacement.asset_key();
    sys.borrow_mut().get_mut(ids[0]).unwrap().set_visual_model(Some(replacement));
    sys.borrow_mut()
        .get_mut(ids[1])
        .unwrap()
        .set_visual_model(Some(sphere_model(Color::BLACK)));

    vis.bind_item(ids[0]);
    assert_eq!(vis.bound_model_key(ids[0]), Some(new_key));
    assert_eq!(vis.binding_of(ids[1]), other_handle);
    assert_eq!(vis.bound_model_key(ids[1]), other_key, "item b must not be rebound");
}

#[test]
fn removed_model_loses_binding() {
    let (sys, ids) = make_system();
    let mut vis = HeadlessVisualSystem::new();
    vis.attach_system(&sys);

    sys.borrow_mut().get_mut(ids[0]).unwrap().set_visual_model(None);
    vis.bind_all();
    assert!(vis.binding_of(ids[0]).is_none());
    assert_eq!(vis.binding_count(), 2);
}

#[test]
fn removed_item_is_unbound_by_bind_item() {
    let (sys, ids) = make_system();
    let mut vis = HeadlessVisualSystem::new();
    vis.attach_system(&sys);
    sys.borrow_mut().remove(ids[3]);
    vis.bind_item(ids[3]);
    assert!(vis.binding_of(ids[3]).is_none());
    assert_eq!(vis.binding_count(), 2);
}

#[test]
fn reattach_is_ignored() {
    let (sys, _) = make_system();
    let mut vis = HeadlessVisualSystem::new();
    vis.attach_system(&sys);
    vis.attach_system(&sys);
    assert_eq!(vis.system_count(), 1);
    assert_eq!(vis.binding_count(), 3);
}

#[test]
fn multiple_systems_bind_independently() {
    let (s1, _) = make_system();
    let (s2, _) = make_system();
    let mut vis = HeadlessVisualSystem::new();
    vis.attach_system(&s1);
    vis.attach_system(&s2);
    assert_eq!(vis.system_count(), 2);
    assert_eq!(vis.binding_count(), 6);

    drop(s1);
    vis.bind_all();
    assert_eq!(vis.system_count(), 1);
    assert_eq!(vis.binding_count(), 3);
}

// ─── Step Listener Tests ──────────────────────────────────────

#[test]
fn items_added_mid_run_are_bound_on_setup() {
    let (sys, _) = make_system();
    let vis = Rc::new(RefCell::new(HeadlessVisualSystem::new()));
    attach(&vis, &sys);
    assert_eq!(vis.borrow().binding_count(), 3);

    let late = sys
        .borrow_mut()
        .add(PhysicalItem::body("late").with_visual_model(sphere_model(Color::RED)));
    sys.borrow_mut().do_step(0.01);
    assert!(vis.borrow().binding_of(late).is_some());
    assert_eq!(vis.borrow().binding_count(), 4);
}

#[test]
fn update_refreshes_cached_frames() {
    let mut raw = PhysicsSystem::new();
    let id = raw.add(
        PhysicalItem::body("mover")
            .with_velocity(Vec3::new(0.0, 2.0, 0.0))
            .with_visual_model(sphere_model(Color::RED)),
    );
    let sys = raw.into_shared();
    let vis = Rc::new(RefCell::new(HeadlessVisualSystem::new()));
    attach(&vis, &sys);

    sys.borrow_mut().do_step(0.5);
    let frame = vis.borrow().bound_frame(id).unwrap();
    assert!((frame.position.y - 1.0).abs() < 1e-5);
}

#[test]
fn clear_drops_bindings_of_that_system() {
    let (s1, _) = make_system();
    let (s2, _) = make_system();
    let vis = Rc::new(RefCell::new(HeadlessVisualSystem::new()));
    attach(&vis, &s1);
    attach(&vis, &s2);
    s1.borrow_mut().clear();
    assert_eq!(vis.borrow().binding_count(), 3);
}

#[test]
fn rtf_and_time_come_from_first_system() {
    let (s1, _) = make_system();
    let (s2, _) = make_system();
    let mut vis = HeadlessVisualSystem::new();
    assert_eq!(vis.simulation_time(), 0.0);
    assert_eq!(vis.simulation_rtf(), 0.0);

    vis.attach_system(&s1);
    vis.attach_system(&s2);
    s1.borrow_mut().do_step(0.25);
    s2.borrow_mut().do_step(1.0);
    assert!((vis.simulation_time() - 0.25).abs() < 1e-12);
    assert!((vis.simulation_rtf() - s1.borrow().rtf()).abs() < 1e-12);

    drop(s1);
    assert!((vis.simulation_time() - 1.0).abs() < 1e-12);
}

// ─── Camera Tests ─────────────────────────────────────────────

#[test]
fn camera_handles_are_monotonic() {
    let mut vis = HeadlessVisualSystem::new();
    assert_eq!(vis.active_camera(), CameraId::INVALID);
    let a = vis.add_camera(Vec3::X, Vec3::ZERO);
    let b = vis.add_camera(Vec3::Y, Vec3::ZERO);
    let c = vis.add_camera(Vec3::Z, Vec3::ZERO);
    assert_eq!((a, b, c), (CameraId(0), CameraId(1), CameraId(2)));
    assert_eq!(vis.active_camera(), c);
    assert_eq!(vis.camera_count(), 3);
}

#[test]
fn update_camera_without_target_keeps_target() {
    let mut vis = HeadlessVisualSystem::new();
    let cam = vis.add_camera(Vec3::new(0.0, 0.0, 5.0), Vec3::new(1.0, 2.0, 3.0));

    vis.update_camera_of(cam, Vec3::new(9.0, 9.0, 9.0), None);
    let c = vis.camera(cam).unwrap();
    assert_eq!(c.position, Vec3::new(9.0, 9.0, 9.0));
    assert_eq!(c.target, Vec3::new(1.0, 2.0, 3.0));

    vis.update_camera(Vec3::ONE, Some(Vec3::ZERO));
    assert_eq!(vis.camera_position(), Vec3::ONE);
    assert_eq!(vis.camera_target(), Vec3::ZERO);
}

#[test]
fn invalid_camera_handles_are_ignored() {
    let mut vis = HeadlessVisualSystem::new();
    let a = vis.add_camera(Vec3::X, Vec3::ZERO);
    vis.set_camera_position_of(CameraId(7), Vec3::splat(100.0));
    vis.set_camera_target_of(CameraId::INVALID, Vec3::splat(100.0));
    assert_eq!(vis.camera(a).unwrap().position, Vec3::X);
    assert!(!vis.set_active_camera(CameraId(3)));
}

#[test]
fn active_camera_selection() {
    let mut vis = HeadlessVisualSystem::new();
    let a = vis.add_camera(Vec3::X, Vec3::ZERO);
    let _b = vis.add_camera(Vec3::Y, Vec3::ZERO);
    assert!(vis.set_active_camera(a));
    vis.set_camera_target(Vec3::new(0.0, 0.0, 1.0));
    assert_eq!(vis.camera(a).unwrap().target, Vec3::new(0.0, 0.0, 1.0));
    vis.set_camera_vertical(CameraVerticalDir::Z);
    assert_eq!(vis.vertical(), CameraVerticalDir::Z);
}

// ─── Standalone Model Tests ───────────────────────────────────

#[test]
fn standalone_handles_share_counter_with_items() {
    let (sys, ids) = make_system();
    let mut vis = HeadlessVisualSystem::new();
    vis.attach_system(&sys);
    let item_handles: Vec<_> = ids.iter().filter_map(|id| vis.binding_of(*id)).collect();

    let m = vis.add_visual_model(sphere_model(Color::RED), Frame::IDENTITY);
    let s = vis.add_visual_shape(Arc::new(VisualShape::cuboid(Vec3::ONE)), Frame::IDENTITY);
    assert!(m.is_valid() && s.is_valid());
    assert_ne!(m, s);
    assert!(!item_handles.contains(&m));
    assert!(!item_handles.contains(&s));
    assert_eq!(vis.standalone_count(), 2);

    let target = Frame::from_position(Vec3::new(1.0, 2.0, 3.0));
    vis.update_visual_model(s, target);
    assert_eq!(vis.standalone_frame(s), Some(target));
    assert_eq!(vis.standalone_frame(m), Some(Frame::IDENTITY));

    vis.update_visual_model(VisualModelId(99), target);
    assert_eq!(vis.standalone_count(), 2);
}

// ─── Lifecycle Tests ──────────────────────────────────────────

#[test]
fn lifecycle_state_machine() {
    let mut lc = FrameLifecycle::new();
    assert_eq!(lc.state(), FrameState::Idle);
    assert_eq!(lc.check_render("render"), Err(LifecycleViolation::SceneNotOpen("render")));
    assert!(lc.begin_scene().is_ok());
    assert_eq!(lc.begin_scene(), Err(LifecycleViolation::SceneAlreadyOpen));
    assert!(lc.check_render("render").is_ok());
    assert_eq!(lc.end_scene(), Ok(0));
    assert_eq!(lc.end_scene(), Err(LifecycleViolation::SceneNotOpen("end_scene")));
    assert!(lc.run(true));
    assert!(!lc.run(false));
    assert!(!lc.run(true), "shutdown is terminal");
    assert_eq!(lc.begin_scene(), Err(LifecycleViolation::ShutDown("begin_scene")));
    assert_eq!(lc.frames_completed(), 1);
}

#[test]
fn frame_limit_stops_run() {
    let mut vis = HeadlessVisualSystem::new().with_frame_limit(3);
    let mut frames = 0;
    while vis.run() {
        vis.begin_scene();
        vis.render();
        vis.end_scene();
        frames += 1;
    }
    assert_eq!(frames, 3);
    assert!(vis.lifecycle().is_shutdown());

    vis.begin_scene();
    assert_eq!(vis.lifecycle().state(), FrameState::Shutdown);
}

#[test]
fn request_shutdown_stops_run() {
    let mut vis = HeadlessVisualSystem::new();
    assert!(vis.run());
    vis.request_shutdown();
    assert!(!vis.run());
    assert!(!vis.run());
}

#[test]
fn render_outside_scene_draws_nothing() {
    let (sys, _) = make_system();
    let mut vis = HeadlessVisualSystem::new();
    vis.attach_system(&sys);
    vis.render();
    assert_eq!(vis.drawn_instances(), 0);
    vis.end_scene();
    assert_eq!(vis.lifecycle().frames_completed(), 0);
}

// ─── Rasterization Tests ──────────────────────────────────────

#[test]
fn bound_item_is_drawn_in_material_color() {
    let mut raw = PhysicsSystem::new();
    raw.add(PhysicalItem::body("red").with_visual_model(sphere_model(Color::RED)));
    let sys = raw.into_shared();

    let mut vis = HeadlessVisualSystem::new().with_background(Color::BLACK);
    vis.attach_system(&sys);
    vis.add_camera(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);

    vis.begin_scene();
    vis.render();
    vis.end_scene();

    let (w, h) = vis.resolution();
    assert_eq!(vis.drawn_instances(), 1);
    assert_eq!(vis.pixel(w / 2, h / 2), Some([255, 0, 0]));
    assert_eq!(vis.pixel(0, 0), Some([0, 0, 0]));
}

#[test]
fn item_behind_camera_is_not_drawn() {
    let mut raw = PhysicsSystem::new();
    raw.add(
        PhysicalItem::body("behind")
            .with_position(Vec3::new(0.0, 0.0, 10.0))
            .with_visual_model(sphere_model(Color::RED)),
    );
    let sys = raw.into_shared();
    let mut vis = HeadlessVisualSystem::new();
    vis.attach_system(&sys);
    vis.add_camera(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
    vis.begin_scene();
    vis.render();
    vis.end_scene();
    assert_eq!(vis.drawn_instances(), 0);
}

#[test]
fn item_far_off_axis_near_the_lens_is_culled() {
    let mut raw = PhysicsSystem::new();
    raw.add(
        PhysicalItem::body("sideways")
            .with_position(Vec3::new(1.0e6, 0.0, 4.98))
            .with_visual_model(sphere_model(Color::RED)),
    );
    raw.add(
        PhysicalItem::body("above")
            .with_position(Vec3::new(0.0, -1.0e6, 4.98))
            .with_visual_model(sphere_model(Color::RED)),
    );
    let sys = raw.into_shared();
    let mut vis = HeadlessVisualSystem::new();
    vis.attach_system(&sys);
    vis.bind_all();
    vis.add_camera(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
    vis.begin_scene();
    vis.render();
    vis.end_scene();
    assert_eq!(vis.binding_count(), 2);
    assert_eq!(vis.drawn_instances(), 0);
}

#[test]
fn last_pixel_of_wide_frame_is_addressable() {
    let mut vis = HeadlessVisualSystem::new()
        .with_resolution(4096, 3)
        .with_background(Color::BLUE);
    vis.begin_scene();
    vis.end_scene();
    assert_eq!(vis.resolution(), (4096, 3));
    assert_eq!(vis.pixel(4095, 2), Some([0, 0, 255]));
    assert_eq!(vis.pixel(4096, 2), None);
}

#[test]
fn write_image_to_file_saves_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.png");
    let mut vis = HeadlessVisualSystem::new().with_resolution(32, 16);
    vis.begin_scene();
    vis.render_frame(&Frame::IDENTITY, 1.0);
    vis.render_cog_frames(0.1);
    vis.end_scene();
    vis.write_image_to_file(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn write_image_to_missing_dir_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope").join("frame.png");
    let mut vis = HeadlessVisualSystem::new().with_resolution(8, 8);
    assert!(vis.write_image_to_file(&path).is_err());
}

#[test]
fn image_output_writes_numbered_frames() {
    let dir = tempfile::tempdir().unwrap();
    let mut vis = HeadlessVisualSystem::new()
        .with_resolution(16, 16)
        .with_frame_limit(2);
    vis.set_image_output_directory(dir.path());
    vis.set_image_output(true);
    while vis.run() {
        vis.begin_scene();
        vis.render();
        vis.end_scene();
    }
    assert!(dir.path().join("img_00000.png").exists());
    assert!(dir.path().join("img_00001.png").exists());
    assert!(!dir.path().join("img_00002.png").exists());
}
