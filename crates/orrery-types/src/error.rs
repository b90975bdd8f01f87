//! Error types for the Orrery workspace.
//!
//! All crates return `OrreryResult<T>` from fallible operations.
//! Unsupported backend capabilities are not errors; they are no-ops.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the Orrery workspace.
#[derive(Debug, Error)]
pub enum OrreryError {
    /// I/O operation failed (script, data or image file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A directory the export layout relies on does not exist.
    #[error("Missing directory: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The physics system an exporter was created for is gone or busy.
    #[error("Physics system unavailable: {0}")]
    SystemUnavailable(String),

    /// Frame capture could not be encoded.
    #[error("Image error: {0}")]
    Image(String),
}

/// Convenience alias for `Result<T, OrreryError>`.
pub type OrreryResult<T> = Result<T, OrreryError>;
