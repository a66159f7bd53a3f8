//! Typed catalog records.
//!
//! Each catalog query kind has its own record type carrying exactly the
//! logical columns that query produces. Records are built from untyped
//! [`CatalogRow`]s and serialize with [`serde`] under the same column names
//! the catalog query uses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogRow, FromCatalogRow};
use crate::decode::ConstraintText;
use crate::error::{CatalogError, Result};

/// Filter applied to every catalog query.
///
/// `None` in either field means "match any": the corresponding bind
/// parameter is sent as NULL and the query's `@param IS NULL` escape makes
/// the filter clause true.
///
/// # Examples
///
/// ```
/// use schema_reader_core::TableQuery;
///
/// let everything = TableQuery::all();
/// assert!(everything.table.is_none() && everything.owner.is_none());
///
/// let one = TableQuery::table("airline").with_owner("martin");
/// assert_eq!(one.table.as_deref(), Some("airline"));
/// assert_eq!(one.owner.as_deref(), Some("martin"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuery {
    /// Table name filter.
    pub table: Option<String>,
    /// Owning schema filter.
    pub owner: Option<String>,
}

impl TableQuery {
    /// A query matching every table in every schema.
    pub fn all() -> Self {
        Self::default()
    }

    /// A query for a single table in any schema.
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            owner: None,
        }
    }

    /// Restricts the query to one owning schema.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Sets or clears the owner filter.
    pub fn owned_by(mut self, owner: Option<String>) -> Self {
        self.owner = owner;
        self
    }
}

/// The four catalog queries a schema reader answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryKind {
    PrimaryKeys,
    CheckConstraints,
    UniqueConstraints,
    ForeignKeys,
}

impl QueryKind {
    /// All query kinds, in the order readers run them.
    pub const ALL: [QueryKind; 4] = [
        QueryKind::PrimaryKeys,
        QueryKind::CheckConstraints,
        QueryKind::UniqueConstraints,
        QueryKind::ForeignKeys,
    ];

    /// Stable kebab-case label, used on the command line.
    pub fn label(self) -> &'static str {
        match self {
            QueryKind::PrimaryKeys => "primary-keys",
            QueryKind::CheckConstraints => "check-constraints",
            QueryKind::UniqueConstraints => "unique-constraints",
            QueryKind::ForeignKeys => "foreign-keys",
        }
    }

    /// Name of the result collection handed to the schema model.
    pub fn collection_name(self) -> &'static str {
        match self {
            QueryKind::PrimaryKeys => "PrimaryKeys",
            QueryKind::CheckConstraints => "CheckKeys",
            QueryKind::UniqueConstraints => "UniqueKeys",
            QueryKind::ForeignKeys => "ForeignKeys",
        }
    }

    /// Whether result rows carry constraint text that must be decoded into
    /// one row per column.
    pub fn decodes_columns(self) -> bool {
        matches!(self, QueryKind::UniqueConstraints | QueryKind::ForeignKeys)
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for QueryKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        QueryKind::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown query kind: {s}"))
    }
}

/// One column of a primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKeyRow {
    pub constraint_name: String,
    pub table_name: String,
    pub schema_name: String,
    pub column_name: String,
    /// 1-based position of the column within the key.
    pub ordinal_position: i64,
}

impl FromCatalogRow for PrimaryKeyRow {
    fn from_catalog_row(row: &CatalogRow) -> Result<Self> {
        Ok(Self {
            constraint_name: row.required_text("constraint_name")?,
            table_name: row.required_text("table_name")?,
            schema_name: row.required_text("schema_name")?,
            column_name: row.required_text("column_name")?,
            ordinal_position: row
                .integer("ordinal_position")?
                .ok_or_else(|| CatalogError::NullValue("ordinal_position".to_string()))?,
        })
    }
}

/// A check constraint and its free-text expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConstraintRow {
    pub constraint_name: String,
    pub table_name: String,
    pub schema_name: String,
    /// Expression text exactly as the catalog stores it.
    #[serde(rename = "Expression")]
    pub expression: Option<String>,
}

impl FromCatalogRow for CheckConstraintRow {
    fn from_catalog_row(row: &CatalogRow) -> Result<Self> {
        Ok(Self {
            constraint_name: row.required_text("constraint_name")?,
            table_name: row.required_text("table_name")?,
            schema_name: row.required_text("schema_name")?,
            expression: row.text("Expression")?,
        })
    }
}

/// One column of a unique constraint.
///
/// Rows come out of the catalog with only `text_segment` set; `column_name`
/// is filled in by [`decode_column_lists`](crate::decode_column_lists).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueKeyRow {
    pub constraint_name: String,
    pub table_name: String,
    pub schema_name: String,
    /// Constraint definition, e.g. `UNIQUE (al_iatacode, al_name)`.
    pub text_segment: Option<String>,
    pub column_name: Option<String>,
}

impl FromCatalogRow for UniqueKeyRow {
    fn from_catalog_row(row: &CatalogRow) -> Result<Self> {
        Ok(Self {
            constraint_name: row.required_text("constraint_name")?,
            table_name: row.required_text("table_name")?,
            schema_name: row.required_text("schema_name")?,
            text_segment: row.text("text_segment")?,
            column_name: None,
        })
    }
}

impl ConstraintText for UniqueKeyRow {
    fn constraint_name(&self) -> &str {
        &self.constraint_name
    }

    fn text_segment(&self) -> Option<&str> {
        self.text_segment.as_deref()
    }

    fn set_column_name(&mut self, column: String) {
        self.column_name = Some(column);
    }
}

/// One referencing column of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRow {
    /// Name of the referencing constraint.
    pub constraint_name: String,
    pub table_name: String,
    pub schema_name: String,
    /// The primary or unique constraint being referenced.
    pub unique_constraint_name: Option<String>,
    /// The referenced table.
    pub fk_table: Option<String>,
    /// Constraint definition, e.g.
    /// `FOREIGN KEY (al_ccode) REFERENCES "martin".country(ct_code)`.
    pub text_segment: Option<String>,
    pub column_name: Option<String>,
}

impl FromCatalogRow for ForeignKeyRow {
    fn from_catalog_row(row: &CatalogRow) -> Result<Self> {
        Ok(Self {
            constraint_name: row.required_text("constraint_name")?,
            table_name: row.required_text("table_name")?,
            schema_name: row.required_text("schema_name")?,
            unique_constraint_name: row.text("unique_constraint_name")?,
            fk_table: row.text("fk_table")?,
            text_segment: row.text("text_segment")?,
            column_name: None,
        })
    }
}

impl ConstraintText for ForeignKeyRow {
    fn constraint_name(&self) -> &str {
        &self.constraint_name
    }

    fn text_segment(&self) -> Option<&str> {
        self.text_segment.as_deref()
    }

    fn set_column_name(&mut self, column: String) {
        self.column_name = Some(column);
    }
}

/// The result of one catalog query, tagged by its [`QueryKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rows", rename_all = "kebab-case")]
pub enum CatalogRows {
    PrimaryKeys(Vec<PrimaryKeyRow>),
    CheckConstraints(Vec<CheckConstraintRow>),
    UniqueConstraints(Vec<UniqueKeyRow>),
    ForeignKeys(Vec<ForeignKeyRow>),
}

impl CatalogRows {
    /// The query kind that produced these rows.
    pub fn kind(&self) -> QueryKind {
        match self {
            CatalogRows::PrimaryKeys(_) => QueryKind::PrimaryKeys,
            CatalogRows::CheckConstraints(_) => QueryKind::CheckConstraints,
            CatalogRows::UniqueConstraints(_) => QueryKind::UniqueConstraints,
            CatalogRows::ForeignKeys(_) => QueryKind::ForeignKeys,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            CatalogRows::PrimaryKeys(rows) => rows.len(),
            CatalogRows::CheckConstraints(rows) => rows.len(),
            CatalogRows::UniqueConstraints(rows) => rows.len(),
            CatalogRows::ForeignKeys(rows) => rows.len(),
        }
    }

    /// Returns `true` if the query returned nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keeps only rows for which `keep(table_name)` is true.
    pub fn retain_tables(&mut self, mut keep: impl FnMut(&str) -> bool) {
        match self {
            CatalogRows::PrimaryKeys(rows) => rows.retain(|r| keep(&r.table_name)),
            CatalogRows::CheckConstraints(rows) => rows.retain(|r| keep(&r.table_name)),
            CatalogRows::UniqueConstraints(rows) => rows.retain(|r| keep(&r.table_name)),
            CatalogRows::ForeignKeys(rows) => rows.retain(|r| keep(&r.table_name)),
        }
    }
}

/// Every constraint the catalog holds for one [`TableQuery`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConstraints {
    pub query: TableQuery,
    pub primary_keys: Vec<PrimaryKeyRow>,
    pub check_constraints: Vec<CheckConstraintRow>,
    pub unique_keys: Vec<UniqueKeyRow>,
    pub foreign_keys: Vec<ForeignKeyRow>,
}

impl TableConstraints {
    /// Creates an empty set for `query`.
    pub fn new(query: TableQuery) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    /// Stores a query result in the matching field, replacing what was there.
    pub fn insert(&mut self, rows: CatalogRows) {
        match rows {
            CatalogRows::PrimaryKeys(rows) => self.primary_keys = rows,
            CatalogRows::CheckConstraints(rows) => self.check_constraints = rows,
            CatalogRows::UniqueConstraints(rows) => self.unique_keys = rows,
            CatalogRows::ForeignKeys(rows) => self.foreign_keys = rows,
        }
    }

    /// Total rows across all four kinds.
    pub fn row_count(&self) -> usize {
        self.primary_keys.len()
            + self.check_constraints.len()
            + self.unique_keys.len()
            + self.foreign_keys.len()
    }

    /// Keeps only rows for which `keep(table_name)` is true, in every kind.
    pub fn retain_tables(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.primary_keys.retain(|r| keep(&r.table_name));
        self.check_constraints.retain(|r| keep(&r.table_name));
        self.unique_keys.retain(|r| keep(&r.table_name));
        self.foreign_keys.retain(|r| keep(&r.table_name));
    }
}
