//! Reader configuration.
//!
//! A YAML file naming the engine, how to reach its catalog, and which tables
//! to read.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! provider: ingres
//! connection:
//!   sqlite: catalog.db
//! owner: martin
//! tables:
//!   - airline
//!   - country
//! exclude:
//!   - audit_log
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use schema_reader_core::TableQuery;
use serde::{Deserialize, Serialize};

use crate::error::{ReaderError, Result};
use crate::reader::ProviderKind;

/// Where the catalog lives. Exactly one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Path to a SQLite catalog mirror.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqlite: Option<PathBuf>,
    /// ODBC connection string for a live server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odbc: Option<String>,
}

/// A resolved [`ConnectionConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    Sqlite(PathBuf),
    Odbc(String),
}

impl ConnectionConfig {
    /// Resolves the single configured target.
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::InvalidConfig`] when both or neither of
    /// `sqlite` and `odbc` are set.
    pub fn target(&self) -> Result<ConnectionTarget> {
        match (&self.sqlite, &self.odbc) {
            (Some(path), None) => Ok(ConnectionTarget::Sqlite(path.clone())),
            (None, Some(cs)) => Ok(ConnectionTarget::Odbc(cs.clone())),
            (Some(_), Some(_)) => Err(ReaderError::InvalidConfig(
                "connection must set only one of `sqlite` or `odbc`".to_string(),
            )),
            (None, None) => Err(ReaderError::InvalidConfig(
                "connection must set `sqlite` or `odbc`".to_string(),
            )),
        }
    }
}

/// Top-level reader configuration.
///
/// # Examples
///
/// ```no_run
/// use schema_reader_provider::ReaderConfig;
///
/// let config = ReaderConfig::load("schema-reader.yml").unwrap();
/// for query in config.table_queries() {
///     println!("{:?}", query.table);
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    pub provider: ProviderKind,
    pub connection: ConnectionConfig,
    /// Owning schema filter applied to every query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Tables to read (empty = every table, in one unfiltered query).
    #[serde(default)]
    pub tables: Vec<String>,
    /// Tables whose rows are dropped from results.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl ReaderConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::ReaderError::IoError) if the file cannot be
    /// read, or [`YamlError`](crate::ReaderError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// One [`TableQuery`] per configured table, or a single unfiltered one.
    ///
    /// # Examples
    ///
    /// ```
    /// # let yaml = r#"
    /// # version: "1.0"
    /// # provider: ingres
    /// # connection: { sqlite: catalog.db }
    /// # owner: martin
    /// # tables: [airline, country]
    /// # "#;
    /// # let config: schema_reader_provider::ReaderConfig = serde_yaml::from_str(yaml).unwrap();
    /// let queries = config.table_queries();
    /// assert_eq!(queries.len(), 2);
    /// assert_eq!(queries[1].table.as_deref(), Some("country"));
    /// assert_eq!(queries[1].owner.as_deref(), Some("martin"));
    /// ```
    pub fn table_queries(&self) -> Vec<TableQuery> {
        if self.tables.is_empty() {
            return vec![TableQuery::all().owned_by(self.owner.clone())];
        }
        self.tables
            .iter()
            .filter(|table| !self.is_excluded(table))
            .map(|table| TableQuery::table(table.as_str()).owned_by(self.owner.clone()))
            .collect()
    }

    /// Returns `true` if `table` is in the exclusion list.
    pub fn is_excluded(&self, table: &str) -> bool {
        self.exclude.iter().any(|t| t == table)
    }
}
