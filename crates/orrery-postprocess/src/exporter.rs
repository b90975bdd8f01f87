//! Renderer-agnostic export contract.

use std::path::Path;

use orrery_types::OrreryResult;

/// An offline exporter: one script artifact plus per-frame data files.
///
/// Paths are resolved against the exporter's base path; absolute paths
/// are used as given.
pub trait SceneExporter {
    /// Writes the script (and its companion files) under `path`.
    fn export_script_to(&mut self, path: &Path) -> OrreryResult<()>;

    /// Writes the current state to `path` without touching the frame counter.
    fn export_data_to(&mut self, path: &Path) -> OrreryResult<()>;

    /// Returns the exporter name.
    fn name(&self) -> &str;
}
