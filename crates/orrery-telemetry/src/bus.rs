//! Event bus: broadcast-style event dispatch with pluggable sinks.
//!
//! Events are queued on a `std::sync::mpsc` channel by `emit` and handed
//! to every sink on `flush`.

use std::sync::mpsc;

use crate::events::TelemetryEvent;
use crate::sinks::EventSink;

/// Broadcast event bus.
pub struct EventBus {
    sender: mpsc::Sender<TelemetryEvent>,
    receiver: mpsc::Receiver<TelemetryEvent>,
    sinks: Vec<Box<dyn EventSink>>,
    /// Disabled bus drops events silently.
    enabled: bool,
}

impl EventBus {
    /// Creates a new event bus with no sinks.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            sinks: Vec::new(),
            enabled: true,
        }
    }

    /// Registers a sink to receive events.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Builder variant of [`EventBus::add_sink`].
    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.add_sink(Box::new(sink));
        self
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Queues an event. No-op on a disabled bus.
    pub fn emit(&self, event: TelemetryEvent) {
        if !self.enabled {
            return;
        }
        // The receiver lives as long as the bus.
        let _ = self.sender.send(event);
    }

    /// Delivers all pending events to registered sinks.
    ///
    /// Returns the number of events delivered.
    pub fn flush(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(event) = self.receiver.try_recv() {
            for sink in &mut self.sinks {
                sink.handle(&event);
            }
            delivered += 1;
        }
        delivered
    }

    /// Flushes pending events, then finalizes every sink.
    pub fn finalize(&mut self) {
        self.flush();
        for sink in &mut self.sinks {
            sink.finalize();
        }
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
