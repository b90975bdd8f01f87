//! # orrery-physics
//!
//! The physics-engine side of the visualization boundary.
//!
//! This is not a dynamics solver: items move only by prescribed
//! velocities and contacts are injected by the caller. What it provides
//! is the contract visualization and export components consume.
//!
//! ## Key Types
//!
//! - [`PhysicsSystem`]: Generational arena of [`PhysicalItem`]s with a clock
//! - [`SharedSystem`]: `Rc<RefCell<PhysicsSystem>>` handle shared across subsystems
//! - [`StepListener`]: Setup/update/clear notifications pushed by the system
//! - [`Contact`]: Contact point reported for the current step

pub mod item;
pub mod listener;
pub mod system;

pub use item::{Contact, ItemKind, PhysicalItem};
pub use listener::StepListener;
pub use system::{PhysicsSystem, SharedSystem};
