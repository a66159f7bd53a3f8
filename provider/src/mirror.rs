//! SQLite mirror of the Ingres constraint catalogs.
//!
//! The mirror has the same table and column names as `iikeys`,
//! `iiconstraints` and `iiref_constraints`, so the Ingres catalog SQL runs
//! against it unchanged. Name columns are stored blank-padded to the
//! catalogs' `char(32)` width, the way Ingres returns them.
//!
//! A mirror is filled from a [`CatalogSnapshot`] (YAML) and is useful for
//! reading an exported catalog offline.
//!
//! # Example
//!
//! ```
//! use rusqlite::Connection;
//! use schema_reader_provider::{CatalogMirror, CatalogSnapshot, ConstraintEntry};
//!
//! let conn = Connection::open_in_memory().unwrap();
//! let mirror = CatalogMirror::new(&conn);
//! mirror.create().unwrap();
//!
//! let mut snapshot = CatalogSnapshot::default();
//! snapshot.constraints.push(ConstraintEntry::unique(
//!     "martin", "airline", "uk_airline", "UNIQUE (al_iatacode)",
//! ));
//! let report = mirror.seed(&snapshot).unwrap();
//! assert_eq!(report.constraints, 1);
//! ```

use std::io::BufReader;
use std::path::Path;

use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::error::{ReaderError, Result};

/// Width of Ingres `char(32)` name columns.
pub const NAME_WIDTH: usize = 32;

const CATALOG_TABLES: [&str; 3] = ["iikeys", "iiconstraints", "iiref_constraints"];

const CREATE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS iikeys (
    constraint_name TEXT NOT NULL,
    schema_name TEXT NOT NULL,
    table_name TEXT NOT NULL,
    column_name TEXT NOT NULL,
    key_position INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS iiconstraints (
    constraint_name TEXT NOT NULL,
    schema_name TEXT NOT NULL,
    table_name TEXT NOT NULL,
    constraint_type TEXT NOT NULL CHECK (constraint_type IN ('P', 'U', 'C', 'R')),
    create_date TEXT,
    text_sequence INTEGER NOT NULL DEFAULT 1,
    text_segment TEXT,
    system_generated TEXT NOT NULL DEFAULT 'N'
);

CREATE TABLE IF NOT EXISTS iiref_constraints (
    ref_constraint_name TEXT NOT NULL,
    ref_schema_name TEXT NOT NULL,
    ref_table_name TEXT NOT NULL,
    unique_constraint_name TEXT NOT NULL,
    unique_schema_name TEXT NOT NULL,
    unique_table_name TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_iikeys_table ON iikeys(table_name);
CREATE INDEX IF NOT EXISTS idx_iiconstraints_table ON iiconstraints(table_name);
"#;

const DROP_SQL: &str = r#"
DROP TABLE IF EXISTS iiref_constraints;
DROP TABLE IF EXISTS iiconstraints;
DROP TABLE IF EXISTS iikeys;
"#;

/// Pads a name to the catalogs' fixed column width.
pub fn pad_name(name: &str) -> String {
    format!("{name:<NAME_WIDTH$}")
}

/// One `iikeys` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    pub constraint_name: String,
    pub schema_name: String,
    pub table_name: String,
    pub column_name: String,
    pub key_position: i64,
}

/// One `iiconstraints` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintEntry {
    pub constraint_name: String,
    pub schema_name: String,
    pub table_name: String,
    /// `P`, `U`, `C` or `R`.
    pub constraint_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_segment: Option<String>,
}

impl ConstraintEntry {
    /// A unique constraint with its definition text.
    pub fn unique(schema: &str, table: &str, name: &str, text: &str) -> Self {
        Self::new(schema, table, name, "U", Some(text))
    }

    /// A check constraint with its expression text.
    pub fn check(schema: &str, table: &str, name: &str, text: &str) -> Self {
        Self::new(schema, table, name, "C", Some(text))
    }

    /// A referential constraint with its definition text.
    pub fn referential(schema: &str, table: &str, name: &str, text: &str) -> Self {
        Self::new(schema, table, name, "R", Some(text))
    }

    pub fn new(
        schema: &str,
        table: &str,
        name: &str,
        constraint_type: &str,
        text_segment: Option<&str>,
    ) -> Self {
        Self {
            constraint_name: name.to_string(),
            schema_name: schema.to_string(),
            table_name: table.to_string(),
            constraint_type: constraint_type.to_string(),
            text_segment: text_segment.map(String::from),
        }
    }
}

/// One `iiref_constraints` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefConstraintEntry {
    pub ref_constraint_name: String,
    pub ref_schema_name: String,
    pub ref_table_name: String,
    pub unique_constraint_name: String,
    pub unique_schema_name: String,
    pub unique_table_name: String,
}

/// An exported set of catalog rows, loadable from YAML.
///
/// ```yaml
/// keys:
///   - { constraint_name: pk_airline, schema_name: martin, table_name: airline,
///       column_name: al_id, key_position: 1 }
/// constraints:
///   - { constraint_name: uk_airline, schema_name: martin, table_name: airline,
///       constraint_type: U, text_segment: "UNIQUE (al_iatacode)" }
/// ref_constraints: []
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub keys: Vec<KeyEntry>,
    #[serde(default)]
    pub constraints: Vec<ConstraintEntry>,
    #[serde(default)]
    pub ref_constraints: Vec<RefConstraintEntry>,
}

impl CatalogSnapshot {
    /// Loads a snapshot from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::IoError`] if the file cannot be read, or
    /// [`ReaderError::YamlError`] if it is not a valid snapshot.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let snapshot = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(snapshot)
    }
}

/// Row counts inserted by [`CatalogMirror::seed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub keys: usize,
    pub constraints: usize,
    pub ref_constraints: usize,
}

/// Current state of a mirror, returned by [`CatalogMirror::status`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorStatus {
    pub tables_exist: bool,
    pub key_count: usize,
    pub constraint_count: usize,
    pub ref_constraint_count: usize,
}

/// Lifecycle operations on a catalog mirror held in a borrowed connection.
pub struct CatalogMirror<'a> {
    conn: &'a Connection,
}

impl<'a> CatalogMirror<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Creates the catalog tables. Safe to call on an existing mirror.
    pub fn create(&self) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(CREATE_SQL)
            .map_err(|e| ReaderError::MirrorError(format!("failed to create catalogs: {e}")))?;
        tx.commit()?;
        Ok(())
    }

    /// Drops the catalog tables if they exist.
    pub fn drop_tables(&self) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(DROP_SQL)
            .map_err(|e| ReaderError::MirrorError(format!("failed to drop catalogs: {e}")))?;
        tx.commit()?;
        Ok(())
    }

    /// Inserts every row of `snapshot` in one transaction, padding names.
    pub fn seed(&self, snapshot: &CatalogSnapshot) -> Result<SeedReport> {
        let tx = self.conn.unchecked_transaction()?;
        let mut report = SeedReport::default();

        for key in &snapshot.keys {
            tx.execute(
                "INSERT INTO iikeys (constraint_name, schema_name, table_name, column_name, key_position)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    pad_name(&key.constraint_name),
                    pad_name(&key.schema_name),
                    pad_name(&key.table_name),
                    pad_name(&key.column_name),
                    key.key_position,
                ],
            )?;
            report.keys += 1;
        }

        for constraint in &snapshot.constraints {
            tx.execute(
                "INSERT INTO iiconstraints (constraint_name, schema_name, table_name, constraint_type, text_segment)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    pad_name(&constraint.constraint_name),
                    pad_name(&constraint.schema_name),
                    pad_name(&constraint.table_name),
                    constraint.constraint_type,
                    constraint.text_segment,
                ],
            )?;
            report.constraints += 1;
        }

        for reference in &snapshot.ref_constraints {
            tx.execute(
                "INSERT INTO iiref_constraints (ref_constraint_name, ref_schema_name, ref_table_name,
                     unique_constraint_name, unique_schema_name, unique_table_name)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    pad_name(&reference.ref_constraint_name),
                    pad_name(&reference.ref_schema_name),
                    pad_name(&reference.ref_table_name),
                    pad_name(&reference.unique_constraint_name),
                    pad_name(&reference.unique_schema_name),
                    pad_name(&reference.unique_table_name),
                ],
            )?;
            report.ref_constraints += 1;
        }

        tx.commit()?;
        Ok(report)
    }

    /// Reports whether the catalogs exist and how many rows each holds.
    pub fn status(&self) -> Result<MirrorStatus> {
        let mut existing = 0;
        for table in CATALOG_TABLES {
            let count: i64 = self.conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |row| row.get(0),
            )?;
            existing += usize::from(count > 0);
        }

        if existing < CATALOG_TABLES.len() {
            return Ok(MirrorStatus::default());
        }

        Ok(MirrorStatus {
            tables_exist: true,
            key_count: self.count_rows("iikeys")?,
            constraint_count: self.count_rows("iiconstraints")?,
            ref_constraint_count: self.count_rows("iiref_constraints")?,
        })
    }

    fn count_rows(&self, table: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Creates the catalog tables in `conn`.
pub fn create_mirror(conn: &Connection) -> Result<()> {
    CatalogMirror::new(conn).create()
}

/// Drops the catalog tables from `conn`.
pub fn drop_mirror(conn: &Connection) -> Result<()> {
    CatalogMirror::new(conn).drop_tables()
}

/// Row counts per catalog table in `conn`.
pub fn mirror_status(conn: &Connection) -> Result<MirrorStatus> {
    CatalogMirror::new(conn).status()
}
