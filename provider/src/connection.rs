//! The connection seam between schema readers and database drivers.
//!
//! Readers never open, pool, or close connections. They borrow an already
//! open [`CatalogConnection`] for one round trip per query and hand the rows
//! back to the caller.
//!
//! Catalog SQL is written with two named bind parameters, [`TABLE_NAME`] and
//! [`SCHEMA_OWNER`]. Backends with native named parameters (SQLite) bind
//! them directly; positional backends rewrite them with
//! [`positional_parameters`].

use std::sync::LazyLock;

use regex::Regex;
use rusqlite::Connection;
use rusqlite::types::ValueRef;
use schema_reader_core::{CatalogRow, CatalogValue, TableQuery};

use crate::error::Result;

/// Bind parameter for the table name filter.
pub const TABLE_NAME: &str = "@tableName";

/// Bind parameter for the owning schema filter.
pub const SCHEMA_OWNER: &str = "@schemaOwner";

static NAMED_PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@[A-Za-z_][A-Za-z0-9_]*").expect("static regex must compile")
});

/// Values for the named bind parameters of a catalog query.
///
/// `None` is bound as SQL NULL, which the catalog SQL treats as "match any".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryParams<'a> {
    pub table_name: Option<&'a str>,
    pub schema_owner: Option<&'a str>,
}

impl<'a> QueryParams<'a> {
    /// Looks up a bind value by parameter name (`@tableName` or
    /// `@schemaOwner`). Unknown names bind NULL.
    pub fn value(&self, name: &str) -> Option<&'a str> {
        if name.eq_ignore_ascii_case(TABLE_NAME) {
            self.table_name
        } else if name.eq_ignore_ascii_case(SCHEMA_OWNER) {
            self.schema_owner
        } else {
            None
        }
    }
}

impl<'a> From<&'a TableQuery> for QueryParams<'a> {
    fn from(query: &'a TableQuery) -> Self {
        Self {
            table_name: query.table.as_deref(),
            schema_owner: query.owner.as_deref(),
        }
    }
}

/// An open connection that can run a parameterized catalog query.
pub trait CatalogConnection {
    /// Executes `sql` with `params` bound and returns every result row.
    ///
    /// # Errors
    ///
    /// Driver failures (connectivity, syntax, permissions) are returned as
    /// they come from the driver.
    fn query(&self, sql: &str, params: &QueryParams<'_>) -> Result<Vec<CatalogRow>>;
}

impl CatalogConnection for Connection {
    fn query(&self, sql: &str, params: &QueryParams<'_>) -> Result<Vec<CatalogRow>> {
        let mut stmt = self.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut bound = Vec::new();
        for name in [TABLE_NAME, SCHEMA_OWNER] {
            if stmt.parameter_index(name)?.is_some() {
                bound.push((name, params.value(name)));
            }
        }
        let named: Vec<(&str, &dyn rusqlite::ToSql)> = bound
            .iter()
            .map(|(name, value)| (*name, value as &dyn rusqlite::ToSql))
            .collect();

        let mut rows = stmt.query(named.as_slice())?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let mut catalog_row = CatalogRow::new();
            for (idx, column) in columns.iter().enumerate() {
                catalog_row.push(column.clone(), sqlite_value(row.get_ref(idx)?));
            }
            result.push(catalog_row);
        }
        Ok(result)
    }
}

fn sqlite_value(value: ValueRef<'_>) -> CatalogValue {
    match value {
        ValueRef::Null => CatalogValue::Null,
        ValueRef::Integer(i) => CatalogValue::Integer(i),
        ValueRef::Real(f) => CatalogValue::Text(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            CatalogValue::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Rewrites `@name` parameters to positional `?` markers.
///
/// Returns the rewritten SQL and the parameter names in the order their
/// markers appear, so a parameter used twice is bound twice.
///
/// # Examples
///
/// ```
/// use schema_reader_provider::positional_parameters;
///
/// let (sql, names) = positional_parameters("WHERE (t = @tableName OR @tableName IS NULL)");
/// assert_eq!(sql, "WHERE (t = ? OR ? IS NULL)");
/// assert_eq!(names, vec!["@tableName", "@tableName"]);
/// ```
pub fn positional_parameters(sql: &str) -> (String, Vec<String>) {
    let names = NAMED_PARAMETER
        .find_iter(sql)
        .map(|m| m.as_str().to_string())
        .collect();
    let rewritten = NAMED_PARAMETER.replace_all(sql, "?").into_owned();
    (rewritten, names)
}
