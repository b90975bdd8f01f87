//! # orrery-math
//!
//! Math primitives shared by the visualization and export crates.
//!
//! Provides:
//! - Re-exports of `glam` types (`Vec3`, `Quat`, etc.)
//! - [`Frame`]: rigid transform (position + rotation)
//! - [`Color`]: linear RGB color

pub mod color;
pub mod frame;

pub use color::Color;
pub use frame::Frame;

// Re-export glam types as the canonical math types for Orrery.
pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
