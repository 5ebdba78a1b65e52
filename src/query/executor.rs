//! Statement execution.
//!
//! Runs one classified statement on an open handle. Text holding zero or
//! several statements is rejected before anything runs. Data queries are
//! fully materialized; mutations are executed once. Nothing is retried and
//! no transaction is opened beyond what the statement itself implies.

use crate::db::{Handle, QueryResult};
use crate::error::{GatewayError, Result};
use sqlx::{Column, Executor, Statement};
use tracing::debug;

use super::classify::StatementClass;
use super::normalize::{normalize_mutation, normalize_rows};
use super::statements::ensure_single_statement;

/// Executes a statement according to its classification.
pub async fn execute(
    handle: &mut Handle,
    sql: &str,
    classification: StatementClass,
) -> Result<QueryResult> {
    ensure_single_statement(sql)?;
    let statement = (&mut *handle).prepare(sql).await.map_err(map_sql_error)?;

    match classification {
        StatementClass::DataQuery => {
            let columns: Vec<String> = statement
                .columns()
                .iter()
                .map(|col| col.name().to_string())
                .collect();

            let rows = statement
                .query()
                .fetch_all(&mut *handle)
                .await
                .map_err(map_sql_error)?;

            debug!(rows = rows.len(), columns = columns.len(), "Data query finished");
            Ok(QueryResult::Rows(normalize_rows(columns, &rows)))
        }
        StatementClass::Mutation => {
            let before = total_changes(handle).await?;
            let result = statement
                .query()
                .execute(&mut *handle)
                .await
                .map_err(map_sql_error)?;
            let changed = total_changes(handle).await? != before;

            let outcome = normalize_mutation(&result, changed);
            debug!(changes = outcome.changes, "Mutation finished");
            Ok(QueryResult::Mutation(outcome))
        }
    }
}

/// Rows changed by every statement run on this handle so far.
async fn total_changes(handle: &mut Handle) -> Result<i64> {
    sqlx::query_scalar("SELECT total_changes()")
        .fetch_one(&mut *handle)
        .await
        .map_err(map_sql_error)
}

/// Maps a sqlx error raised while preparing or running a statement.
///
/// Database diagnostics become `Sql` with the engine's own message; failures
/// below the SQL layer (I/O, a crashed worker) are `Unexpected`.
pub fn map_sql_error(error: sqlx::Error) -> GatewayError {
    match &error {
        sqlx::Error::Database(db) => GatewayError::sql(db.message()),
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::TypeNotFound { .. } => GatewayError::sql(error.to_string()),
        _ => GatewayError::unexpected(error.to_string()),
    }
}
