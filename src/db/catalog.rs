//! Catalog inspection for table browsing.
//!
//! Lists user tables from `sqlite_master` and previews the first rows of a
//! table whose existence has been checked against the catalog first.

use super::{Handle, RowSet};
use crate::error::{GatewayError, Result};
use crate::query::executor::map_sql_error;
use crate::query::normalize::{columns_from_first_row, convert_row};
use tracing::debug;

/// Default number of rows returned by [`preview_table`].
pub const DEFAULT_PREVIEW_LIMIT: u32 = 20;

const LIST_TABLES_SQL: &str = "SELECT name FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
     ORDER BY name";

const TABLE_EXISTS_SQL: &str = "SELECT name FROM sqlite_master \
     WHERE type = 'table' AND name = ?";

/// Lists user tables in ascending order, excluding SQLite's internal tables.
pub async fn list_tables(handle: &mut Handle) -> Result<Vec<String>> {
    let tables: Vec<String> = sqlx::query_scalar(LIST_TABLES_SQL)
        .fetch_all(&mut *handle)
        .await
        .map_err(map_sql_error)?;

    debug!(count = tables.len(), "Listed tables");
    Ok(tables)
}

/// Returns true if a table with exactly this name exists.
pub async fn table_exists(handle: &mut Handle, name: &str) -> Result<bool> {
    let found: Option<String> = sqlx::query_scalar(TABLE_EXISTS_SQL)
        .bind(name)
        .fetch_optional(&mut *handle)
        .await
        .map_err(map_sql_error)?;

    // `=` follows the column collation; compare again so the match is exact.
    Ok(found.is_some_and(|found| found == name))
}

/// Returns at most `limit` rows of `name`.
///
/// Fails with `TableNotFound` before reading any rows when the catalog has no
/// such table. Column names come from the first row, so an empty table yields
/// an empty column list.
pub async fn preview_table(handle: &mut Handle, name: &str, limit: u32) -> Result<RowSet> {
    if !table_exists(handle, name).await? {
        return Err(GatewayError::table_not_found(name));
    }

    let sql = format!("SELECT * FROM {} LIMIT {limit}", quote_identifier(name));
    let rows = sqlx::query(&sql)
        .fetch_all(&mut *handle)
        .await
        .map_err(map_sql_error)?;

    let rows: Vec<_> = rows.iter().map(convert_row).collect();
    let columns = columns_from_first_row(&rows);

    debug!(table = name, rows = rows.len(), "Previewed table");
    Ok(RowSet::with_data(columns, rows))
}

/// Wraps a name in double quotes, doubling any embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
