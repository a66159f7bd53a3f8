//! Provider-specific schema readers.
//!
//! This crate reads primary-key, check, unique and foreign-key constraint
//! metadata out of a database engine's system catalogs and returns it as the
//! typed records defined in [`schema_reader_core`].
//!
//! # Architecture
//!
//! - **`reader`** — the [`SchemaReader`] trait and [`ProviderKind`] selection
//! - **`ingres`** — [`IngresSchemaReader`] and its catalog SQL
//! - **`connection`** — the [`CatalogConnection`] seam, implemented for
//!   `rusqlite::Connection` (and `odbc_api::Connection` with the `odbc`
//!   feature)
//! - **`mirror`** — a SQLite copy of the Ingres catalogs for offline reads
//! - **`config`** — YAML [`ReaderConfig`]
//!
//! # Quick start
//!
//! ```
//! use rusqlite::Connection;
//! use schema_reader_core::TableQuery;
//! use schema_reader_provider::*;
//!
//! let conn = Connection::open_in_memory().unwrap();
//! create_mirror(&conn).unwrap();
//!
//! let mut snapshot = CatalogSnapshot::default();
//! snapshot.constraints.push(ConstraintEntry::unique(
//!     "martin", "airline", "uk_airline", "UNIQUE (al_iatacode, al_name)",
//! ));
//! CatalogMirror::new(&conn).seed(&snapshot).unwrap();
//!
//! let reader = reader_for(ProviderKind::Ingres);
//! let keys = reader.unique_keys(&conn, &TableQuery::table("airline")).unwrap();
//! assert_eq!(keys.len(), 2);
//! assert_eq!(keys[0].table_name, "airline");
//! ```

mod config;
mod connection;
mod error;
mod ingres;
mod mirror;
#[cfg(feature = "odbc")]
mod odbc;
mod reader;

pub use config::{ConnectionConfig, ConnectionTarget, ReaderConfig};
pub use connection::{
    CatalogConnection, QueryParams, SCHEMA_OWNER, TABLE_NAME, positional_parameters,
};
pub use error::{ReaderError, Result};
pub use ingres::IngresSchemaReader;
pub use mirror::{
    CatalogMirror, CatalogSnapshot, ConstraintEntry, KeyEntry, MirrorStatus, NAME_WIDTH,
    RefConstraintEntry, SeedReport, create_mirror, drop_mirror, mirror_status, pad_name,
};
#[cfg(feature = "odbc")]
pub use odbc::with_odbc_connection;
pub use reader::{ProviderKind, SchemaReader, reader_for};
