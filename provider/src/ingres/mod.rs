//! Ingres catalog reader.
//!
//! Ingres exposes constraint metadata through three standard catalogs:
//!
//! - `iikeys` — one row per primary-key column, with its key position.
//! - `iiconstraints` — one row per constraint; `constraint_type` is `P`,
//!   `U`, `C` or `R`, and `text_segment` holds the definition text.
//! - `iiref_constraints` — links each referential constraint to the unique
//!   or primary constraint it references.
//!
//! Name columns are fixed-width `char(32)` and come back blank-padded, so
//! every name is trimmed inside the SQL. Unique and foreign-key columns are
//! not stored separately; they are decoded from `text_segment`.
//!
//! Sequences and identity columns have no usable catalog here and are not
//! read.

use schema_reader_core::{
    CatalogRow, CheckConstraintRow, ForeignKeyRow, PrimaryKeyRow, QueryKind, TableQuery,
    UniqueKeyRow, decode_column_lists, records_from_rows,
};
use tracing::debug;

use crate::connection::{CatalogConnection, QueryParams};
use crate::error::Result;
use crate::reader::{ProviderKind, SchemaReader};

const PRIMARY_KEYS_SQL: &str = include_str!("sql/primary_keys.sql");
const CHECK_CONSTRAINTS_SQL: &str = include_str!("sql/check_constraints.sql");
const UNIQUE_CONSTRAINTS_SQL: &str = include_str!("sql/unique_constraints.sql");
const FOREIGN_KEYS_SQL: &str = include_str!("sql/foreign_keys.sql");

/// [`SchemaReader`] for Ingres.
///
/// # Examples
///
/// ```no_run
/// use rusqlite::Connection;
/// use schema_reader_core::TableQuery;
/// use schema_reader_provider::{IngresSchemaReader, SchemaReader};
///
/// let conn = Connection::open("catalog.db").unwrap();
/// let reader = IngresSchemaReader::new();
///
/// let query = TableQuery::table("airline").with_owner("martin");
/// for fk in reader.foreign_keys(&conn, &query).unwrap() {
///     println!("{} -> {:?}", fk.constraint_name, fk.column_name);
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IngresSchemaReader;

impl IngresSchemaReader {
    pub fn new() -> Self {
        Self
    }

    /// The catalog SQL issued for `kind`.
    pub fn sql(kind: QueryKind) -> &'static str {
        match kind {
            QueryKind::PrimaryKeys => PRIMARY_KEYS_SQL,
            QueryKind::CheckConstraints => CHECK_CONSTRAINTS_SQL,
            QueryKind::UniqueConstraints => UNIQUE_CONSTRAINTS_SQL,
            QueryKind::ForeignKeys => FOREIGN_KEYS_SQL,
        }
    }

    fn run(
        &self,
        kind: QueryKind,
        conn: &dyn CatalogConnection,
        query: &TableQuery,
    ) -> Result<Vec<CatalogRow>> {
        debug!(
            "Ingres {} query: table={:?} owner={:?}",
            kind.collection_name(),
            query.table,
            query.owner
        );
        let rows = conn.query(Self::sql(kind), &QueryParams::from(query))?;
        debug!("Ingres {} query returned {} rows", kind.collection_name(), rows.len());
        Ok(rows)
    }
}

impl SchemaReader for IngresSchemaReader {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Ingres
    }

    fn primary_keys(
        &self,
        conn: &dyn CatalogConnection,
        query: &TableQuery,
    ) -> Result<Vec<PrimaryKeyRow>> {
        let rows = self.run(QueryKind::PrimaryKeys, conn, query)?;
        Ok(records_from_rows(&rows)?)
    }

    fn check_constraints(
        &self,
        conn: &dyn CatalogConnection,
        query: &TableQuery,
    ) -> Result<Vec<CheckConstraintRow>> {
        let rows = self.run(QueryKind::CheckConstraints, conn, query)?;
        Ok(records_from_rows(&rows)?)
    }

    fn unique_keys(
        &self,
        conn: &dyn CatalogConnection,
        query: &TableQuery,
    ) -> Result<Vec<UniqueKeyRow>> {
        let rows = self.run(QueryKind::UniqueConstraints, conn, query)?;
        let keys: Vec<UniqueKeyRow> = records_from_rows(&rows)?;
        Ok(decode_column_lists(keys)?)
    }

    fn foreign_keys(
        &self,
        conn: &dyn CatalogConnection,
        query: &TableQuery,
    ) -> Result<Vec<ForeignKeyRow>> {
        let rows = self.run(QueryKind::ForeignKeys, conn, query)?;
        let keys: Vec<ForeignKeyRow> = records_from_rows(&rows)?;
        Ok(decode_column_lists(keys)?)
    }
}
