//! Result normalization.
//!
//! Shapes sqlx SQLite rows and execution summaries into [`RowSet`] and
//! [`MutationOutcome`]. Values are passed through using SQLite's storage
//! class of each individual value, never filtered.

use crate::db::{MutationOutcome, Row, RowSet, Value};
use sqlx::sqlite::{SqliteQueryResult, SqliteRow};
use sqlx::{Column, Row as SqlxRow, TypeInfo, ValueRef};

/// Status message reported for every successful mutation.
pub const MUTATION_MESSAGE: &str = "Query executed successfully";

/// Builds a row set from driver rows.
///
/// `columns` is the statement's column metadata. When it is empty the names
/// are taken from the first row, and stay empty when there are no rows.
pub fn normalize_rows(columns: Vec<String>, rows: &[SqliteRow]) -> RowSet {
    let rows: Vec<Row> = rows.iter().map(convert_row).collect();
    let columns = if columns.is_empty() {
        columns_from_first_row(&rows)
    } else {
        columns
    };
    RowSet::with_data(columns, rows)
}

/// Derives column names from the keys of the first row.
pub fn columns_from_first_row(rows: &[Row]) -> Vec<String> {
    rows.first()
        .map(|row| row.columns().map(String::from).collect())
        .unwrap_or_default()
}

/// Builds a mutation outcome from an execution summary.
///
/// `changed` says whether the connection's total change counter moved while
/// the statement ran. SQLite leaves the last-statement counters alone for
/// statements that touch no rows (DDL among them), so an unchanged counter
/// means zero changes and no inserted row.
pub fn normalize_mutation(result: &SqliteQueryResult, changed: bool) -> MutationOutcome {
    let (changes, rowid) = if changed {
        (result.rows_affected(), result.last_insert_rowid())
    } else {
        (0, 0)
    };
    MutationOutcome {
        message: MUTATION_MESSAGE.to_string(),
        changes,
        last_insert_rowid: (rowid != 0).then_some(rowid),
    }
}

/// Converts a sqlx SqliteRow to our Row type.
pub fn convert_row(row: &SqliteRow) -> Row {
    row.columns()
        .iter()
        .map(|col| (col.name().to_string(), convert_value(row, col.ordinal())))
        .collect()
}

/// Converts a single column value using the value's own storage class.
fn convert_value(row: &SqliteRow, index: usize) -> Value {
    let storage_class = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_uppercase(),
        Err(_) => return Value::Null,
    };

    match storage_class.as_str() {
        "INTEGER" | "BIGINT" | "INT8" | "BOOLEAN" => row
            .try_get::<i64, _>(index)
            .map(Value::Int)
            .unwrap_or_else(|_| decode_fallback(row, index)),

        "REAL" | "FLOAT" | "DOUBLE" => row
            .try_get::<f64, _>(index)
            .map(Value::Float)
            .unwrap_or_else(|_| decode_fallback(row, index)),

        "BLOB" => row
            .try_get::<Vec<u8>, _>(index)
            .map(Value::Blob)
            .unwrap_or_else(|_| decode_fallback(row, index)),

        _ => decode_fallback(row, index),
    }
}

/// Tries text, then integer, then real, then raw bytes.
fn decode_fallback(row: &SqliteRow, index: usize) -> Value {
    if let Ok(s) = row.try_get::<String, _>(index) {
        return Value::Text(s);
    }
    if let Ok(i) = row.try_get::<i64, _>(index) {
        return Value::Int(i);
    }
    if let Ok(f) = row.try_get::<f64, _>(index) {
        return Value::Float(f);
    }
    row.try_get::<Vec<u8>, _>(index)
        .map(Value::Blob)
        .unwrap_or(Value::Null)
}
