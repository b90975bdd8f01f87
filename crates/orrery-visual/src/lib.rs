//! # orrery-visual
//!
//! Backend-agnostic visualization interface for Orrery.
//!
//! A physics system is attached to a [`VisualSystem`], which binds every
//! item carrying a visual model to a backend-side representation and is
//! then driven once per frame through `run`/`begin_scene`/`render`/`end_scene`.
//!
//! ## Key Types
//!
//! - [`VisualSystem`]: Backend contract: required lifecycle, optional everything else
//! - [`VisualSystemCore`]: Attached systems and image output settings shared by backends
//! - [`FrameLifecycle`]: Idle / scene-open / shutdown state machine
//! - [`HeadlessVisualSystem`]: Software-rasterizing backend for CI and previews
//! - [`attach`]: Attaches a backend and registers it as a step listener

pub mod camera;
pub mod headless;
pub mod lifecycle;
pub mod system;

pub use camera::{Camera, CameraVerticalDir};
pub use headless::HeadlessVisualSystem;
pub use lifecycle::{FrameLifecycle, FrameState, LifecycleViolation};
pub use system::{attach, VisualSystem, VisualSystemCore};
