//! Integration tests for orrery-telemetry.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use orrery_math::Vec3;
use orrery_physics::{PhysicalItem, PhysicsSystem};
use orrery_telemetry::{EventBus, EventKind, JsonLinesSink, TelemetryEvent, TelemetryListener, VecSink};

// ─── Bus Tests ────────────────────────────────────────────────

#[test]
fn emit_and_flush() {
    let sink = VecSink::new();
    let events = sink.events();
    let mut bus = EventBus::new().with_sink(sink);

    bus.emit(TelemetryEvent::new(0, EventKind::StepSetup { sim_time: 0.0 }));
    bus.emit(TelemetryEvent::new(
        1,
        EventKind::FrameRendered {
            frame: 0,
            bindings: 3,
        },
    ));
    assert!(events.lock().unwrap().is_empty(), "events wait for flush");

    assert_eq!(bus.flush(), 2);
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].label(), "frame_rendered");
}

#[test]
fn disabled_bus_drops_events() {
    let sink = VecSink::new();
    let events = sink.events();
    let mut bus = EventBus::new().with_sink(sink);
    bus.set_enabled(false);
    bus.emit(TelemetryEvent::new(0, EventKind::StepSetup { sim_time: 0.0 }));
    assert_eq!(bus.flush(), 0);
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn every_sink_sees_every_event() {
    let a = VecSink::new();
    let b = VecSink::new();
    let (ea, eb) = (a.events(), b.events());
    let mut bus = EventBus::new().with_sink(a).with_sink(b);
    assert_eq!(bus.sink_count(), 2);

    bus.emit(TelemetryEvent::new(0, EventKind::SystemCleared { item_count: 1 }));
    bus.flush();
    assert_eq!(ea.lock().unwrap().len(), 1);
    assert_eq!(eb.lock().unwrap().len(), 1);
}

#[test]
fn event_serialization() {
    let event = TelemetryEvent::new(
        5,
        EventKind::DataExported {
            frame: 12,
            path: PathBuf::from("output/state0012.pov"),
            items: 3,
        },
    );
    let json = serde_json::to_string(&event).unwrap();
    let recovered: TelemetryEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered, event);
}

#[test]
fn json_lines_sink_writes_one_line_per_event() {
    let mut bus = EventBus::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("telemetry.jsonl");
    let file = std::fs::File::create(&path).unwrap();
    bus.add_sink(Box::new(JsonLinesSink::new(file)));

    for step in 0..3 {
        bus.emit(TelemetryEvent::new(step, EventKind::StepSetup { sim_time: step as f64 }));
    }
    bus.finalize();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 3);
    for line in text.lines() {
        let _: TelemetryEvent = serde_json::from_str(line).unwrap();
    }
}

#[test]
fn custom_event_label() {
    let event = TelemetryEvent::new(
        0,
        EventKind::Custom {
            label: "checkpoint".into(),
            payload: "{}".into(),
        },
    );
    assert_eq!(event.label(), "checkpoint");
}

// ─── Listener Tests ───────────────────────────────────────────

#[test]
fn listener_reports_steps() {
    let sink = VecSink::new();
    let events = sink.events();
    let listener = Rc::new(RefCell::new(TelemetryListener::new(EventBus::new().with_sink(sink))));

    let mut sys = PhysicsSystem::new();
    sys.add(PhysicalItem::body("ball").with_velocity(Vec3::X));
    sys.add_listener(&listener);

    sys.do_step(0.1);
    sys.do_step(0.1);
    sys.clear();

    let events = events.lock().unwrap();
    let labels: Vec<_> = events.iter().map(|e| e.label().to_string()).collect();
    assert_eq!(
        labels,
        vec!["step_setup", "step_update", "step_setup", "step_update", "system_cleared"]
    );
    match &events[3].kind {
        EventKind::StepUpdate {
            sim_time,
            item_count,
            ..
        } => {
            assert!((sim_time - 0.2).abs() < 1e-6);
            assert_eq!(*item_count, 1);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn listener_bus_accepts_external_events() {
    let sink = VecSink::new();
    let events = sink.events();
    let mut listener = TelemetryListener::new(EventBus::new().with_sink(sink));
    listener.bus_mut().emit(TelemetryEvent::new(
        0,
        EventKind::ScriptExported {
            path: PathBuf::from("render_frames.pov"),
        },
    ));
    listener.finish();
    assert_eq!(events.lock().unwrap().len(), 1);
}
