//! The schema reader capability set and provider selection.
//!
//! Every database engine gets one [`SchemaReader`] implementation. Callers
//! pick it by engine identifier through [`ProviderKind`] and
//! [`reader_for`], then drive it with a borrowed connection.

use std::fmt;
use std::str::FromStr;

use schema_reader_core::{
    CatalogRows, CheckConstraintRow, ForeignKeyRow, PrimaryKeyRow, QueryKind, TableConstraints,
    TableQuery, UniqueKeyRow,
};
use serde::{Deserialize, Serialize};

use crate::connection::CatalogConnection;
use crate::error::{ReaderError, Result};
use crate::ingres::IngresSchemaReader;

/// Reads constraint metadata from one engine's system catalogs.
///
/// Each method performs a single round trip on `conn` and returns freshly
/// built rows owned by the caller.
pub trait SchemaReader {
    /// The engine this reader understands.
    fn provider(&self) -> ProviderKind;

    /// One row per primary-key column.
    fn primary_keys(
        &self,
        conn: &dyn CatalogConnection,
        query: &TableQuery,
    ) -> Result<Vec<PrimaryKeyRow>>;

    /// One row per check constraint.
    fn check_constraints(
        &self,
        conn: &dyn CatalogConnection,
        query: &TableQuery,
    ) -> Result<Vec<CheckConstraintRow>>;

    /// One row per (unique constraint, column) pair.
    fn unique_keys(
        &self,
        conn: &dyn CatalogConnection,
        query: &TableQuery,
    ) -> Result<Vec<UniqueKeyRow>>;

    /// One row per (foreign key, referencing column) pair.
    fn foreign_keys(
        &self,
        conn: &dyn CatalogConnection,
        query: &TableQuery,
    ) -> Result<Vec<ForeignKeyRow>>;

    /// Runs the query for `kind` and tags the result.
    fn read(
        &self,
        kind: QueryKind,
        conn: &dyn CatalogConnection,
        query: &TableQuery,
    ) -> Result<CatalogRows> {
        Ok(match kind {
            QueryKind::PrimaryKeys => CatalogRows::PrimaryKeys(self.primary_keys(conn, query)?),
            QueryKind::CheckConstraints => {
                CatalogRows::CheckConstraints(self.check_constraints(conn, query)?)
            }
            QueryKind::UniqueConstraints => {
                CatalogRows::UniqueConstraints(self.unique_keys(conn, query)?)
            }
            QueryKind::ForeignKeys => CatalogRows::ForeignKeys(self.foreign_keys(conn, query)?),
        })
    }

    /// Runs all four queries for `query`.
    fn read_constraints(
        &self,
        conn: &dyn CatalogConnection,
        query: &TableQuery,
    ) -> Result<TableConstraints> {
        let mut constraints = TableConstraints::new(query.clone());
        for kind in QueryKind::ALL {
            constraints.insert(self.read(kind, conn, query)?);
        }
        Ok(constraints)
    }
}

/// Database engines with a [`SchemaReader`].
///
/// # Examples
///
/// ```
/// use schema_reader_provider::ProviderKind;
///
/// assert_eq!("Ingres.Client".parse::<ProviderKind>().unwrap(), ProviderKind::Ingres);
/// assert_eq!(ProviderKind::from_name("INGRES").unwrap(), ProviderKind::Ingres);
/// assert!(ProviderKind::from_name("Oracle.DataAccess.Client").is_err());
/// ```
///
/// Deserialization goes through [`ProviderKind::from_name`], so a config file
/// accepts the same identifiers as the command line. Serialization writes
/// the short [`name`](ProviderKind::name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ProviderKind {
    /// Ingres / Actian X, read through `iikeys`, `iiconstraints` and
    /// `iiref_constraints`.
    Ingres,
}

impl ProviderKind {
    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            ProviderKind::Ingres => "ingres",
        }
    }

    /// Resolves an engine identifier: the short name or the ADO.NET-style
    /// invariant provider name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::UnsupportedProvider`] for anything else.
    pub fn from_name(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("ingres") || name.eq_ignore_ascii_case("ingres.client") {
            return Ok(ProviderKind::Ingres);
        }
        Err(ReaderError::UnsupportedProvider(name.to_string()))
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for ProviderKind {
    type Error = ReaderError;

    fn try_from(name: String) -> Result<Self> {
        Self::from_name(&name)
    }
}

impl FromStr for ProviderKind {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

/// Returns the reader for `kind`.
pub fn reader_for(kind: ProviderKind) -> Box<dyn SchemaReader> {
    match kind {
        ProviderKind::Ingres => Box::new(IngresSchemaReader::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_is_rejected() {
        let err = ProviderKind::from_name("System.Data.SqlClient").unwrap_err();
        assert!(matches!(
            err,
            ReaderError::UnsupportedProvider(name) if name == "System.Data.SqlClient"
        ));
    }

    #[test]
    fn test_reader_for_reports_its_provider() {
        let reader = reader_for(ProviderKind::Ingres);
        assert_eq!(reader.provider(), ProviderKind::Ingres);
    }

    #[test]
    fn test_deserialize_accepts_every_identifier() {
        for name in ["ingres", "Ingres", "Ingres.Client", "INGRES.CLIENT"] {
            let kind: ProviderKind = serde_yaml::from_str(name).unwrap();
            assert_eq!(kind, ProviderKind::Ingres, "{name}");
        }
        assert!(serde_yaml::from_str::<ProviderKind>("Oracle.DataAccess.Client").is_err());
    }

    #[test]
    fn test_serializes_short_name() {
        let yaml = serde_yaml::to_string(&ProviderKind::Ingres).unwrap();
        assert_eq!(yaml.trim(), "ingres");
    }

    #[test]
    fn test_provider_name_round_trips() {
        let kind = ProviderKind::Ingres;
        assert_eq!(kind.to_string().parse::<ProviderKind>().unwrap(), kind);
    }
}
