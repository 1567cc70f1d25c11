//! Error types for export and configuration
//!
//! Structural problems with a project (unknown ids, removing the last screen,
//! malformed colors or payloads) never become errors; they are reported via
//! `Option`/`bool` returns or absorbed with a log line. Only environment
//! failures surface here.

use thiserror::Error;

/// Result type for forge operations
pub type Result<T> = std::result::Result<T, ForgeError>;

/// Forge errors
#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Unknown element type: {0}")]
    UnknownElementKind(String),
}
