//! Untyped rows as they come back from a catalog query.
//!
//! A [`CatalogRow`] is an ordered list of `(column, value)` pairs. Connection
//! backends build them from whatever their driver returns; typed records are
//! then read out of them through [`FromCatalogRow`].
//!
//! Column lookup ignores ASCII case. Drivers disagree on how they report
//! column labels (`Expression`, `EXPRESSION`, `expression`), and consumers
//! address columns by their logical name only.

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// A single value read from a catalog column.
///
/// # Examples
///
/// ```
/// use schema_reader_core::CatalogValue;
///
/// assert!(CatalogValue::Null.is_null());
/// assert_eq!(CatalogValue::from("iikeys").as_text(), Some("iikeys"));
/// assert_eq!(CatalogValue::Integer(2).as_integer(), Some(2));
/// assert_eq!(CatalogValue::from("7").as_integer(), Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogValue {
    /// SQL NULL.
    Null,
    /// Integer column value.
    Integer(i64),
    /// Character column value.
    Text(String),
}

impl CatalogValue {
    /// Returns `true` for SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the text payload, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the value as an integer.
    ///
    /// Text values holding a decimal integer are accepted, since text-buffered
    /// drivers hand back every column as text.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Null => None,
        }
    }
}

impl From<&str> for CatalogValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CatalogValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CatalogValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl<T: Into<CatalogValue>> From<Option<T>> for CatalogValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// One row of a catalog query result, keyed by column name.
///
/// # Examples
///
/// ```
/// use schema_reader_core::CatalogRow;
///
/// let row = CatalogRow::new()
///     .with("constraint_name", "pk_airline")
///     .with("ordinal_position", 1_i64);
///
/// assert_eq!(row.text("CONSTRAINT_NAME").unwrap().as_deref(), Some("pk_airline"));
/// assert_eq!(row.integer("ordinal_position").unwrap(), Some(1));
/// assert!(row.get("missing").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRow {
    columns: Vec<(String, CatalogValue)>,
}

impl CatalogRow {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`push`](Self::push).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CatalogValue>) -> Self {
        self.push(column, value);
        self
    }

    /// Appends a column. Later lookups return the first column with a
    /// matching name.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<CatalogValue>) {
        self.columns.push((column.into(), value.into()));
    }

    /// Column names in result order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Number of columns in the row.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Looks up a value by column name (ASCII case-insensitive).
    pub fn get(&self, column: &str) -> Option<&CatalogValue> {
        self.columns
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value)
    }

    /// Reads a nullable text column.
    ///
    /// Integer values are rendered as text. A missing column is an error;
    /// NULL is `Ok(None)`.
    pub fn text(&self, column: &str) -> Result<Option<String>> {
        match self.lookup(column)? {
            CatalogValue::Null => Ok(None),
            CatalogValue::Text(text) => Ok(Some(text.clone())),
            CatalogValue::Integer(value) => Ok(Some(value.to_string())),
        }
    }

    /// Reads a text column that must not be NULL.
    pub fn required_text(&self, column: &str) -> Result<String> {
        self.text(column)?
            .ok_or_else(|| CatalogError::NullValue(column.to_string()))
    }

    /// Reads a nullable integer column.
    pub fn integer(&self, column: &str) -> Result<Option<i64>> {
        let value = self.lookup(column)?;
        if value.is_null() {
            return Ok(None);
        }
        value
            .as_integer()
            .map(Some)
            .ok_or_else(|| CatalogError::InvalidInteger {
                column: column.to_string(),
                value: value.as_text().unwrap_or_default().to_string(),
            })
    }

    fn lookup(&self, column: &str) -> Result<&CatalogValue> {
        self.get(column)
            .ok_or_else(|| CatalogError::MissingColumn(column.to_string()))
    }
}

/// Conversion from an untyped catalog row into a typed record.
pub trait FromCatalogRow: Sized {
    /// Reads the record's columns out of `row`.
    fn from_catalog_row(row: &CatalogRow) -> Result<Self>;
}

/// Converts a whole result set, failing on the first bad row.
pub fn records_from_rows<T: FromCatalogRow>(rows: &[CatalogRow]) -> Result<Vec<T>> {
    rows.iter().map(T::from_catalog_row).collect()
}
