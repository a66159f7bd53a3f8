//! Error types for catalog reading.
//!
//! Driver failures are carried through unchanged; this layer adds no retry
//! and no translation on top of them.

use thiserror::Error;

/// Errors that can occur while reading catalogs or managing a mirror.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// ODBC driver or connection failure.
    #[cfg(feature = "odbc")]
    #[error("ODBC error: {0}")]
    OdbcError(#[from] odbc_api::Error),

    /// A catalog row could not be read into a record, or its constraint
    /// text could not be decoded.
    #[error("catalog error: {0}")]
    CatalogError(#[from] schema_reader_core::CatalogError),

    /// No reader exists for the requested engine identifier.
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Configuration is structurally valid YAML but unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Catalog mirror lifecycle operation failure.
    #[error("mirror error: {0}")]
    MirrorError(String),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Convenience alias for results with [`ReaderError`].
pub type Result<T> = std::result::Result<T, ReaderError>;
