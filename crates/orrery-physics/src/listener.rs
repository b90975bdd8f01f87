//! Step-lifecycle listeners.
//!
//! Listeners are how a physics system pushes structural notifications
//! into visualization and telemetry layers without those layers polling.
//! A system holds listeners weakly; dropping the listener unregisters it.
//!
//! # Lifecycle
//!
//! ```text
//! for each step:
//!   listener.on_setup(system)    // before items move
//!   listener.on_update(system)   // after items moved, clock advanced
//! on system clear:
//!   listener.on_clear(system)    // items still present
//! ```
//!
//! The system is passed by reference. Listeners must use that reference
//! rather than re-borrowing their own shared handle, which is already
//! mutably borrowed by the stepping caller.

use crate::system::PhysicsSystem;

/// Receives step notifications from an attached physics system.
pub trait StepListener {
    /// Called at the beginning of each step.
    fn on_setup(&mut self, system: &PhysicsSystem) {
        let _ = system;
    }

    /// Called at the end of each step.
    fn on_update(&mut self, system: &PhysicsSystem) {
        let _ = system;
    }

    /// Called when the system is cleared.
    fn on_clear(&mut self, system: &PhysicsSystem) {
        let _ = system;
    }
}
