//! # orrery-types
//!
//! Shared types, identifiers, error types, and defaults
//! for the Orrery visualization and export workspace.
//!
//! This crate has zero domain logic. It defines the vocabulary
//! that all other Orrery crates share.

pub mod constants;
pub mod error;
pub mod ids;

pub use error::{OrreryError, OrreryResult};
pub use ids::{AssetKey, CameraId, ItemId, SystemId, VisualModelId};
