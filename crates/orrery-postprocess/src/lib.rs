//! # orrery-postprocess
//!
//! Offline scene export. A [`PovExporter`] is pointed at a physics system,
//! items are registered with it, and then one script plus a numbered
//! sequence of per-frame data files are written for POV-Ray to render
//! later.
//!
//! ## Key Types
//!
//! - [`SceneExporter`]: Renderer-agnostic export contract
//! - [`PovExporter`]: POV-Ray script/data writer
//! - [`ExportConfig`]: Serializable export session settings (TOML)
//! - [`ExportRegistry`]: Insertion-ordered, deduplicated asset table
//!
//! ## Output layout
//!
//! ```text
//! <base>/render_frames.pov.ini
//! <base>/render_frames.pov
//! <base>/render_frames.pov.assets   (single asset file mode)
//! <base>/output/state0000.pov ...
//! <base>/anim/pic0000.png ...       (written by POV-Ray)
//! ```

pub mod config;
pub mod exporter;
pub mod pov;
pub mod registry;
mod writer;

pub use config::{Antialiasing, CameraSetup, ContactDisplay, ContactSymbol, ExportConfig, LightSetup, Overlay};
pub use exporter::SceneExporter;
pub use pov::PovExporter;
pub use registry::ExportRegistry;
