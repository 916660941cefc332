//! Error types for the topology viewport.

use thiserror::Error;

/// Result type alias used across the crate.
pub type ViewportResult<T> = Result<T, ViewportError>;

/// Errors surfaced by configuration loading and command validation.
///
/// Runtime viewport operations never fail; storage problems are logged and
/// recovered from inside the position store.
#[derive(Error, Debug)]
pub enum ViewportError {
    /// Zoom factor was zero, negative, or not a number.
    #[error("Invalid zoom factor: {0} (must be > 0)")]
    InvalidZoomFactor(f32),

    /// Fit padding was negative or not a number.
    #[error("Invalid padding: {0} (must be >= 0)")]
    InvalidPadding(f32),

    /// Performance threshold of zero nodes.
    #[error("Invalid node count limit: {0} (must be > 0)")]
    InvalidNodeCountLimit(usize),

    /// IO error while reading configuration or topology files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
