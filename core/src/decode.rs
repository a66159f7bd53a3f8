//! Decoding of column lists embedded in constraint definition text.
//!
//! Unique and foreign-key constraints come back from the catalog as one row
//! per constraint with the participating columns encoded in the definition
//! text:
//!
//! ```text
//! UNIQUE (al_iatacode, "Al Name")
//! FOREIGN KEY (al_ccode) REFERENCES "martin".country(ct_code)
//! ```
//!
//! Only the first parenthesized group is read. For a foreign key that is the
//! referencing column list; the referenced table's columns are ignored.
//!
//! # Examples
//!
//! ```
//! use schema_reader_core::parse_column_list;
//!
//! let columns = parse_column_list("pk", "UNIQUE (a, \"b c\")").unwrap();
//! assert_eq!(columns, vec!["a", "b c"]);
//! ```

use crate::error::{CatalogError, Result};

/// Access to the constraint text of a record that decodes into one row per
/// column.
pub trait ConstraintText: Clone {
    /// Name of the constraint, used in error reports.
    fn constraint_name(&self) -> &str;

    /// The raw definition text, if the catalog had any.
    fn text_segment(&self) -> Option<&str>;

    /// Stores the decoded column for this row.
    fn set_column_name(&mut self, column: String);
}

/// Extracts the column names from the first `( ... )` group of `text`.
///
/// Elements are split on `,` and stripped of surrounding double quotes and
/// spaces; spaces inside a quoted name are kept.
///
/// # Errors
///
/// Returns [`CatalogError::MalformedConstraintText`] when `text` has no `(`,
/// or no `)` after the first `(`.
pub fn parse_column_list(constraint: &str, text: &str) -> Result<Vec<String>> {
    let malformed = || CatalogError::MalformedConstraintText {
        constraint: constraint.to_string(),
        text: text.to_string(),
    };

    let open = text.find('(').ok_or_else(malformed)?;
    let list = &text[open + 1..];
    let close = list.find(')').ok_or_else(malformed)?;

    Ok(list[..close]
        .split(',')
        .map(|column| column.trim_matches(|c| c == '"' || c == ' ').to_string())
        .collect())
}

/// Expands rows so there is exactly one row per (constraint, column) pair.
///
/// Each input row keeps its position and receives the first column of its
/// list. Rows for the remaining columns are clones placed after all input
/// rows, in input order and then left-to-right column order. Rows whose text
/// is absent or empty pass through untouched with no column set.
///
/// # Examples
///
/// ```
/// use schema_reader_core::{decode_column_lists, UniqueKeyRow};
///
/// let row = UniqueKeyRow {
///     constraint_name: "uk_route".into(),
///     table_name: "route".into(),
///     schema_name: "martin".into(),
///     text_segment: Some("UNIQUE (rt_airline, rt_flight_num)".into()),
///     column_name: None,
/// };
///
/// let rows = decode_column_lists(vec![row]).unwrap();
/// let columns: Vec<_> = rows.iter().map(|r| r.column_name.as_deref().unwrap()).collect();
/// assert_eq!(columns, vec!["rt_airline", "rt_flight_num"]);
/// ```
///
/// # Errors
///
/// Propagates [`CatalogError::MalformedConstraintText`] from
/// [`parse_column_list`].
pub fn decode_column_lists<R: ConstraintText>(rows: Vec<R>) -> Result<Vec<R>> {
    let mut heads = Vec::with_capacity(rows.len());
    let mut extra = Vec::new();

    for row in rows {
        let (head, clones) = split_row(row)?;
        heads.push(head);
        extra.extend(clones);
    }

    heads.extend(extra);
    Ok(heads)
}

/// Decodes one row into its head row plus clones for columns 2..n.
fn split_row<R: ConstraintText>(mut row: R) -> Result<(R, Vec<R>)> {
    let columns = match row.text_segment() {
        Some(text) if !text.is_empty() => Some(parse_column_list(row.constraint_name(), text)?),
        _ => None,
    };
    let Some(columns) = columns else {
        return Ok((row, Vec::new()));
    };

    let mut columns = columns.into_iter();
    let first = columns.next().unwrap_or_default();

    let clones = columns
        .map(|column| {
            let mut clone = row.clone();
            clone.set_column_name(column);
            clone
        })
        .collect();

    row.set_column_name(first);
    Ok((row, clones))
}
