//! Error types for manifest output.

use thiserror::Error;

/// Errors that can occur while writing or checking a manifest.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A manifest on disk does not match the expected document.
    #[error("invalid checksum: {0}")]
    InvalidChecksum(String),
}

/// Convenience alias for results with [`CodegenError`].
pub type Result<T> = std::result::Result<T, CodegenError>;
