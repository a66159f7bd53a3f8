//! Error types for catalog row access and constraint-text decoding.

use thiserror::Error;

/// Errors raised while turning raw catalog rows into typed records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The query result has no column with this name.
    #[error("catalog row has no column '{0}'")]
    MissingColumn(String),

    /// A column that every catalog row must populate was NULL.
    #[error("catalog column '{0}' is null")]
    NullValue(String),

    /// A numeric column held something that does not parse as an integer.
    #[error("catalog column '{column}' is not an integer: {value}")]
    InvalidInteger { column: String, value: String },

    /// Constraint definition text without a `(...)` column list.
    ///
    /// The column list must open with `(` and close with a `)` somewhere
    /// after it; anything else is out of range for the decoder.
    #[error("constraint '{constraint}' has malformed definition text: {text}")]
    MalformedConstraintText { constraint: String, text: String },
}

/// Convenience alias for results with [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;
