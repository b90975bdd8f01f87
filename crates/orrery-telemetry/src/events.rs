//! Telemetry event types.
//!
//! Events are lightweight value types tagged with the step index at which
//! they were emitted.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A telemetry event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Completed physics steps when the event was emitted.
    pub step: u64,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// A physics step is about to start.
    StepSetup {
        /// Simulated time before the step (seconds).
        sim_time: f64,
    },

    /// A physics step completed.
    StepUpdate {
        /// Simulated time after the step (seconds).
        sim_time: f64,
        /// Real-time factor of the step.
        rtf: f64,
        /// Live items in the system.
        item_count: usize,
    },

    /// The physics system was cleared.
    SystemCleared {
        /// Items present just before clearing.
        item_count: usize,
    },

    /// A visualization backend completed a frame.
    FrameRendered {
        /// Frame index within the backend.
        frame: u64,
        /// Number of live bindings drawn.
        bindings: usize,
    },

    /// The export script was written.
    ScriptExported {
        path: PathBuf,
    },

    /// A per-frame data file was written.
    DataExported {
        /// Frame number encoded in the file name.
        frame: u32,
        path: PathBuf,
        /// Items written to the file.
        items: usize,
    },

    /// Custom event for extensibility.
    Custom {
        /// Arbitrary label.
        label: String,
        /// JSON-encoded payload.
        payload: String,
    },
}

impl TelemetryEvent {
    /// Creates a new event for the given step.
    pub fn new(step: u64, kind: EventKind) -> Self {
        Self { step, kind }
    }

    /// Short snake_case label of the payload variant.
    pub fn label(&self) -> &str {
        match &self.kind {
            EventKind::StepSetup { .. } => "step_setup",
            EventKind::StepUpdate { .. } => "step_update",
            EventKind::SystemCleared { .. } => "system_cleared",
            EventKind::FrameRendered { .. } => "frame_rendered",
            EventKind::ScriptExported { .. } => "script_exported",
            EventKind::DataExported { .. } => "data_exported",
            EventKind::Custom { label, .. } => label,
        }
    }
}
