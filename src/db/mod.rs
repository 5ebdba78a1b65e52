//! Storage access for the playground database.
//!
//! Opens one SQLite connection per request against a file that must already
//! exist, and maps driver failures into gateway error kinds.

pub mod catalog;
pub mod seed;
mod types;

pub use types::{MutationOutcome, QueryResult, Row, RowSet, Value};

use crate::error::{GatewayError, OpenFailureReason, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// An open connection scoped to a single request.
pub type Handle = SqliteConnection;

/// How a handle may touch the database file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccessMode {
    ReadOnly,
    ReadWrite,
}

/// Opens an existing database file read-only.
pub async fn open_for_read(path: &Path) -> Result<Handle> {
    open(path, AccessMode::ReadOnly).await
}

/// Opens an existing database file read-write. Never creates the file.
pub async fn open_for_read_write(path: &Path) -> Result<Handle> {
    open(path, AccessMode::ReadWrite).await
}

/// Opens an existing database file in the given mode.
///
/// Returns `StorageNotInitialized` when the file is absent and
/// `StorageOpenFailure` when it exists but cannot be used.
async fn open(path: &Path, mode: AccessMode) -> Result<Handle> {
    match tokio::fs::try_exists(path).await {
        Ok(true) => {}
        Ok(false) => return Err(GatewayError::StorageNotInitialized(path.to_path_buf())),
        Err(e) => {
            return Err(GatewayError::open_failure(
                reason_from_io(e.kind()),
                format!("{}: {e}", path.display()),
            ))
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .read_only(mode == AccessMode::ReadOnly)
        .create_if_missing(false);

    let mut handle = SqliteConnection::connect_with(&options)
        .await
        .map_err(|e| map_open_error(e, path))?;

    // Force a header read so a damaged file fails here rather than mid-query.
    if let Err(e) = sqlx::query("SELECT count(*) FROM sqlite_master")
        .fetch_one(&mut handle)
        .await
    {
        close_handle(handle).await;
        return Err(map_open_error(e, path));
    }

    debug!(path = %path.display(), ?mode, "Opened database handle");
    Ok(handle)
}

/// Closes a handle. A close failure is logged and otherwise ignored so it
/// never replaces an error the caller is already reporting.
pub async fn close_handle(handle: Handle) {
    if let Err(e) = handle.close().await {
        warn!("Failed to close database handle: {e}");
    }
}

/// Maps a sqlx error raised while opening into a storage error.
fn map_open_error(error: sqlx::Error, path: &Path) -> GatewayError {
    let reason = match &error {
        sqlx::Error::Io(io) => reason_from_io(io.kind()),
        sqlx::Error::Database(db) => reason_from_code(db.code().as_deref()),
        _ => OpenFailureReason::Other,
    };
    GatewayError::open_failure(reason, format!("{}: {error}", path.display()))
}

fn reason_from_io(kind: ErrorKind) -> OpenFailureReason {
    match kind {
        ErrorKind::PermissionDenied => OpenFailureReason::PermissionDenied,
        _ => OpenFailureReason::Other,
    }
}

/// Classifies a SQLite result code. Extended codes carry the primary code in
/// their low byte.
fn reason_from_code(code: Option<&str>) -> OpenFailureReason {
    let Some(code) = code.and_then(|c| c.parse::<i32>().ok()) else {
        return OpenFailureReason::Other;
    };

    match code & 0xff {
        // SQLITE_BUSY, SQLITE_LOCKED
        5 | 6 => OpenFailureReason::Locked,
        // SQLITE_CORRUPT, SQLITE_NOTADB
        11 | 26 => OpenFailureReason::Corrupt,
        // SQLITE_PERM, SQLITE_READONLY, SQLITE_AUTH
        3 | 8 | 23 => OpenFailureReason::PermissionDenied,
        _ => OpenFailureReason::Other,
    }
}
