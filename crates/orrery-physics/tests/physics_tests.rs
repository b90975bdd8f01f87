//! Integration tests for orrery-physics.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use orrery_assets::{VisualModel, VisualShape};
use orrery_math::{Frame, Vec3};
use orrery_physics::{Contact, ItemKind, PhysicalItem, PhysicsSystem, StepListener};

// ─── Arena Tests ──────────────────────────────────────────────

#[test]
fn add_and_get() {
    let mut sys = PhysicsSystem::new();
    let id = sys.add(PhysicalItem::body("ball"));
    assert_eq!(sys.len(), 1);
    assert_eq!(sys.get(id).unwrap().name, "ball");
    assert_eq!(id.system, sys.id());
}

#[test]
fn removed_handle_is_stale() {
    let mut sys = PhysicsSystem::new();
    let a = sys.add(PhysicalItem::body("a"));
    assert!(sys.remove(a).is_some());
    assert!(sys.get(a).is_none());
    assert!(sys.remove(a).is_none());

    let b = sys.add(PhysicalItem::body("b"));
    assert_eq!(a.index, b.index, "slot should be reused");
    assert_ne!(a.generation, b.generation);
    assert!(sys.get(a).is_none());
    assert_eq!(sys.get(b).unwrap().name, "b");
}

#[test]
fn foreign_handle_does_not_resolve() {
    let mut s1 = PhysicsSystem::new();
    let mut s2 = PhysicsSystem::new();
    let id1 = s1.add(PhysicalItem::body("one"));
    let _ = s2.add(PhysicalItem::body("two"));
    assert_ne!(s1.id(), s2.id());
    assert!(s2.get(id1).is_none());
    assert!(!s2.contains(id1));
}

#[test]
fn items_iterate_in_slot_order() {
    let mut sys = PhysicsSystem::new();
    let ids: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|n| sys.add(PhysicalItem::body(*n)))
        .collect();
    sys.remove(ids[1]);
    let names: Vec<_> = sys.items().map(|(_, item)| item.name.clone()).collect();
    assert_eq!(names, vec!["a", "c"]);
    assert_eq!(sys.item_ids(), vec![ids[0], ids[2]]);
}

#[test]
fn visual_model_replacement() {
    let mut sys = PhysicsSystem::new();
    let model = Arc::new(VisualModel::from_shape(Arc::new(VisualShape::sphere(0.2)), None));
    let id = sys.add(PhysicalItem::body("ball").with_visual_model(model));
    assert!(sys.get(id).unwrap().has_visual_model());

    sys.get_mut(id).unwrap().set_visual_model(None);
    assert!(!sys.get(id).unwrap().has_visual_model());
}

// ─── Stepping Tests ───────────────────────────────────────────

#[test]
fn step_advances_clock_and_items() {
    let mut sys = PhysicsSystem::new();
    let id = sys.add(PhysicalItem::body("mover").with_velocity(Vec3::new(1.0, 0.0, 0.0)));
    sys.do_step(0.5);
    sys.do_step(0.5);
    assert!((sys.time() - 1.0).abs() < 1e-9);
    assert_eq!(sys.step_count(), 2);
    assert!((sys.get(id).unwrap().frame.position.x - 1.0).abs() < 1e-5);
    assert!(sys.rtf() >= 0.0);
}

#[test]
fn cog_frame_composes_offset() {
    let item = PhysicalItem::body("b")
        .with_position(Vec3::new(1.0, 0.0, 0.0))
        .with_com(Frame::from_position(Vec3::new(0.0, 0.5, 0.0)));
    assert_eq!(item.cog_frame().position, Vec3::new(1.0, 0.5, 0.0));
    assert_eq!(item.kind, ItemKind::Body);
}

#[test]
fn contacts_are_replaced_and_cleared() {
    let mut sys = PhysicsSystem::new();
    sys.set_contacts(vec![Contact::new(Vec3::ZERO, Vec3::Y, Vec3::new(0.0, 3.0, 1.0))]);
    assert_eq!(sys.contacts().len(), 1);
    assert!((sys.contacts()[0].normal_force() - 3.0).abs() < 1e-6);
    sys.clear();
    assert!(sys.contacts().is_empty());
}

#[test]
fn clear_invalidates_handles() {
    let mut sys = PhysicsSystem::new();
    let id = sys.add(PhysicalItem::body("x"));
    sys.clear();
    assert!(sys.is_empty());
    assert!(sys.get(id).is_none());
}

// ─── Listener Tests ───────────────────────────────────────────

#[derive(Default)]
struct Recorder {
    log: Vec<String>,
}

impl StepListener for Recorder {
    fn on_setup(&mut self, system: &PhysicsSystem) {
        self.log.push(format!("setup {}", system.step_count()));
    }

    fn on_update(&mut self, system: &PhysicsSystem) {
        self.log.push(format!("update {}", system.step_count()));
    }

    fn on_clear(&mut self, system: &PhysicsSystem) {
        self.log.push(format!("clear {}", system.len()));
    }
}

#[test]
fn listener_sees_lifecycle_in_order() {
    let mut sys = PhysicsSystem::new();
    sys.add(PhysicalItem::body("a"));
    let rec = Rc::new(RefCell::new(Recorder::default()));
    sys.add_listener(&rec);

    sys.do_step(0.01);
    sys.clear();

    assert_eq!(rec.borrow().log, vec!["setup 0", "update 1", "clear 1"]);
}

#[test]
fn listener_registered_once() {
    let mut sys = PhysicsSystem::new();
    let rec = Rc::new(RefCell::new(Recorder::default()));
    sys.add_listener(&rec);
    sys.add_listener(&rec);
    assert_eq!(sys.listener_count(), 1);
    sys.do_step(0.01);
    assert_eq!(rec.borrow().log.len(), 2);
}

#[test]
fn dropped_listener_is_pruned() {
    let mut sys = PhysicsSystem::new();
    {
        let rec = Rc::new(RefCell::new(Recorder::default()));
        sys.add_listener(&rec);
        assert_eq!(sys.listener_count(), 1);
    }
    assert_eq!(sys.listener_count(), 0);
    sys.do_step(0.01);
}

#[test]
fn busy_listener_is_skipped() {
    let mut sys = PhysicsSystem::new();
    let rec = Rc::new(RefCell::new(Recorder::default()));
    sys.add_listener(&rec);
    {
        let _held = rec.borrow_mut();
        sys.do_step(0.01);
    }
    assert!(rec.borrow().log.is_empty());
}

#[test]
fn contact_serializes() {
    let c = Contact::new(Vec3::ONE, Vec3::Z, Vec3::ZERO);
    let json = serde_json::to_string(&c).unwrap();
    let back: Contact = serde_json::from_str(&json).unwrap();
    assert_eq!(c, back);
}
