//! ODBC backend for live Ingres servers.
//!
//! ODBC only understands positional `?` markers, so the catalog SQL is
//! rewritten with [`positional_parameters`] and each marker is bound as
//! nullable text. Results are fetched as text; integer columns are parsed
//! when records are built.

use odbc_api::buffers::TextRowSet;
use odbc_api::{ConnectionOptions, Cursor, Environment, IntoParameter, ResultSetMetadata};
use schema_reader_core::{CatalogRow, CatalogValue};
use tracing::debug;

use crate::connection::{CatalogConnection, QueryParams, positional_parameters};
use crate::error::Result;

/// Rows fetched per round trip.
const BATCH_SIZE: usize = 256;

/// Upper bound on a text cell. `text_segment` is `varchar(240)` on Ingres.
const MAX_TEXT_LEN: usize = 4096;

/// Rewrites `sql` for ODBC and lists the value for each `?`, in marker order.
fn positional_values<'a>(sql: &str, params: &QueryParams<'a>) -> (String, Vec<Option<&'a str>>) {
    let (sql, names) = positional_parameters(sql);
    let values = names.iter().map(|name| params.value(name)).collect();
    (sql, values)
}

impl CatalogConnection for odbc_api::Connection<'_> {
    fn query(&self, sql: &str, params: &QueryParams<'_>) -> Result<Vec<CatalogRow>> {
        let (sql, values) = positional_values(sql, params);
        let values: Vec<_> = values.into_iter().map(IntoParameter::into_parameter).collect();

        let mut rows = Vec::new();
        let Some(mut cursor) = self.execute(&sql, values.as_slice())? else {
            return Ok(rows);
        };

        let columns: Vec<String> = cursor
            .column_names()?
            .collect::<std::result::Result<_, _>>()?;

        let mut buffers = TextRowSet::for_cursor(BATCH_SIZE, &mut cursor, Some(MAX_TEXT_LEN))?;
        let mut row_cursor = cursor.bind_buffer(&mut buffers)?;
        while let Some(batch) = row_cursor.fetch()? {
            for row_idx in 0..batch.num_rows() {
                let mut row = CatalogRow::new();
                for (col_idx, column) in columns.iter().enumerate() {
                    let value = match batch.at(col_idx, row_idx) {
                        Some(bytes) => {
                            CatalogValue::Text(String::from_utf8_lossy(bytes).into_owned())
                        }
                        None => CatalogValue::Null,
                    };
                    row.push(column.clone(), value);
                }
                rows.push(row);
            }
        }
        Ok(rows)
    }
}

/// Opens an ODBC connection for the duration of `f`.
///
/// The ODBC environment is created per call and dropped with the
/// connection.
///
/// # Examples
///
/// ```no_run
/// use schema_reader_core::TableQuery;
/// use schema_reader_provider::{IngresSchemaReader, SchemaReader, with_odbc_connection};
///
/// let cs = "Driver={Ingres};Server=@localhost,tcp_ip,II;Database=demodb";
/// let keys = with_odbc_connection(cs, |conn| {
///     IngresSchemaReader::new().primary_keys(conn, &TableQuery::all())
/// })
/// .unwrap();
/// println!("{} primary key columns", keys.len());
/// ```
pub fn with_odbc_connection<T>(
    connection_string: &str,
    f: impl FnOnce(&odbc_api::Connection<'_>) -> Result<T>,
) -> Result<T> {
    let env = Environment::new()?;
    let conn = env.connect_with_connection_string(connection_string, ConnectionOptions::default())?;
    debug!("Connected over ODBC");
    f(&conn)
}
