//! Catalog row model and constraint-text decoding.
//!
//! This crate defines the shapes a provider-specific schema reader produces:
//!
//! - [`CatalogRow`] — an untyped result row keyed by column name, as built
//!   by a connection backend.
//! - [`PrimaryKeyRow`], [`CheckConstraintRow`], [`UniqueKeyRow`],
//!   [`ForeignKeyRow`] — typed records, one per [`QueryKind`], read from
//!   catalog rows through [`FromCatalogRow`].
//! - [`CatalogRows`] and [`TableConstraints`] — query results tagged by kind,
//!   and all four kinds for one [`TableQuery`].
//!
//! Decoding ([`decode_column_lists`]) expands unique and foreign-key rows,
//! whose columns arrive as definition text such as `UNIQUE (a, "b")`, into
//! one row per column.
//!
//! # Example
//!
//! ```
//! use schema_reader_core::*;
//!
//! let row = CatalogRow::new()
//!     .with("constraint_name", "uk_airline")
//!     .with("table_name", "airline")
//!     .with("schema_name", "martin")
//!     .with("text_segment", "UNIQUE (al_iatacode, al_name)");
//!
//! let rows: Vec<UniqueKeyRow> = records_from_rows(&[row]).unwrap();
//! let rows = decode_column_lists(rows).unwrap();
//!
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[0].column_name.as_deref(), Some("al_iatacode"));
//! assert_eq!(rows[1].column_name.as_deref(), Some("al_name"));
//! ```

mod catalog;
mod decode;
mod error;
mod types;

pub use catalog::{CatalogRow, CatalogValue, FromCatalogRow, records_from_rows};
pub use decode::{ConstraintText, decode_column_lists, parse_column_list};
pub use error::{CatalogError, Result};
pub use types::*;
