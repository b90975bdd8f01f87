//! Pluggable event sinks.

use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::events::TelemetryEvent;

/// Trait for event consumers.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &TelemetryEvent);

    /// Called when the run ends. Flush buffers, close files.
    fn finalize(&mut self) {}

    /// Human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Collects events in memory.
///
/// The collected list is shared, so it stays inspectable after the sink
/// has been boxed into a bus.
#[derive(Default)]
pub struct VecSink {
    events: Arc<Mutex<Vec<TelemetryEvent>>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the collected events.
    pub fn events(&self) -> Arc<Mutex<Vec<TelemetryEvent>>> {
        Arc::clone(&self.events)
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &TelemetryEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// Forwards events to `tracing` at info level.
#[derive(Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &TelemetryEvent) {
        tracing::info!(
            step = event.step,
            label = event.label(),
            event = ?event.kind,
            "telemetry_event"
        );
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}

/// Writes one JSON object per line.
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
    failed: bool,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            failed: false,
        }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> EventSink for JsonLinesSink<W> {
    fn handle(&mut self, event: &TelemetryEvent) {
        if self.failed {
            return;
        }
        let result = serde_json::to_writer(&mut self.writer, event)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if let Err(err) = result {
            // Stop writing after the first failure instead of logging per event.
            tracing::warn!(%err, "json telemetry sink disabled");
            self.failed = true;
        }
    }

    fn finalize(&mut self) {
        if let Err(err) = self.writer.flush() {
            tracing::warn!(%err, "json telemetry sink flush failed");
        }
    }

    fn name(&self) -> &str {
        "json_lines_sink"
    }
}
