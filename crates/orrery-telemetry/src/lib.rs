//! # orrery-telemetry
//!
//! Event bus for simulation and visualization telemetry. Emits structured
//! events (step timing, renders, exports) consumed by pluggable sinks
//! (in-memory, `tracing`, JSON lines).

pub mod bus;
pub mod events;
pub mod listener;
pub mod sinks;

pub use bus::EventBus;
pub use events::{EventKind, TelemetryEvent};
pub use listener::TelemetryListener;
pub use sinks::{EventSink, JsonLinesSink, TracingSink, VecSink};
