//! Step listener that turns physics notifications into telemetry events.

use orrery_physics::{PhysicsSystem, StepListener};

use crate::bus::EventBus;
use crate::events::{EventKind, TelemetryEvent};

/// Emits `StepSetup`, `StepUpdate` and `SystemCleared` events onto a bus.
///
/// The bus is flushed at the end of every step.
pub struct TelemetryListener {
    bus: EventBus,
}

impl TelemetryListener {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Mutable access for emitting render/export events from outside a step.
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Consumes the listener, finalizing its sinks.
    pub fn finish(mut self) {
        self.bus.finalize();
    }
}

impl StepListener for TelemetryListener {
    fn on_setup(&mut self, system: &PhysicsSystem) {
        self.bus.emit(TelemetryEvent::new(
            system.step_count(),
            EventKind::StepSetup {
                sim_time: system.time(),
            },
        ));
    }

    fn on_update(&mut self, system: &PhysicsSystem) {
        self.bus.emit(TelemetryEvent::new(
            system.step_count(),
            EventKind::StepUpdate {
                sim_time: system.time(),
                rtf: system.rtf(),
                item_count: system.len(),
            },
        ));
        self.bus.flush();
    }

    fn on_clear(&mut self, system: &PhysicsSystem) {
        self.bus.emit(TelemetryEvent::new(
            system.step_count(),
            EventKind::SystemCleared {
                item_count: system.len(),
            },
        ));
        self.bus.flush();
    }
}
