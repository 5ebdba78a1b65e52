//! The query execution gateway.
//!
//! Each operation opens its own handle, runs, and closes the handle before
//! returning, whichever way the operation ends. No state is kept between
//! calls.

use crate::config::DatabaseConfig;
use crate::db::{self, catalog, seed, QueryResult, RowSet};
use crate::error::{GatewayError, Result};
use crate::query::{self, classify};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Message reported by [`Gateway::list_tables`] when there is no database yet.
pub const NOT_INITIALIZED_MESSAGE: &str = "Database not initialized. Run /api/init-db first.";

/// Table names, or an empty list with a reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableListing {
    pub tables: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The first rows of one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePreview {
    pub table: String,

    #[serde(flatten)]
    pub rows: RowSet,
}

/// Entry point for all database work requested by callers.
#[derive(Debug, Clone)]
pub struct Gateway {
    db_path: PathBuf,
    preview_limit: u32,
}

impl Gateway {
    /// Creates a gateway for the database at `db_path`.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            preview_limit: catalog::DEFAULT_PREVIEW_LIMIT,
        }
    }

    /// Creates a gateway from the database section of the configuration.
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::new(&config.path).with_preview_limit(config.preview_limit)
    }

    /// Sets the maximum number of rows returned by a table preview.
    pub fn with_preview_limit(mut self, limit: u32) -> Self {
        self.preview_limit = limit;
        self
    }

    /// Returns the database file path.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Classifies and runs arbitrary SQL text against the database.
    ///
    /// The handle is opened read-write; the file must already exist.
    pub async fn run_query(&self, sql: Option<&str>) -> Result<QueryResult> {
        let sql = require_text(sql, "Query is required and must be a string")?;
        let classification = classify(sql);
        info!(
            %classification,
            keyword = query::classify::leading_keyword(sql).unwrap_or_default(),
            "Running query"
        );
        debug!(sql, "Query text");

        let mut handle = db::open_for_read_write(&self.db_path).await?;
        let result = query::execute(&mut handle, sql, classification).await;
        db::close_handle(handle).await;

        if let Err(e) = &result {
            warn!("{}: {e}", e.category());
        }
        result
    }

    /// Lists user tables.
    ///
    /// A missing database file is a normal state, reported as an empty list
    /// with a message rather than an error.
    pub async fn list_tables(&self) -> Result<TableListing> {
        let mut handle = match db::open_for_read(&self.db_path).await {
            Ok(handle) => handle,
            Err(GatewayError::StorageNotInitialized(path)) => {
                info!(path = %path.display(), "Database not initialized");
                return Ok(TableListing {
                    tables: Vec::new(),
                    message: Some(NOT_INITIALIZED_MESSAGE.to_string()),
                });
            }
            Err(e) => return Err(e),
        };

        let tables = catalog::list_tables(&mut handle).await;
        db::close_handle(handle).await;

        Ok(TableListing {
            tables: tables?,
            message: None,
        })
    }

    /// Returns the first rows of a table, up to the configured preview limit.
    pub async fn preview_table(&self, name: Option<&str>) -> Result<TablePreview> {
        let name = require_text(name, "Table name is required")?;

        let mut handle = db::open_for_read(&self.db_path).await?;
        let rows = catalog::preview_table(&mut handle, name, self.preview_limit).await;
        db::close_handle(handle).await;

        Ok(TablePreview {
            table: name.to_string(),
            rows: rows?,
        })
    }

    /// Drops and recreates the database with its fixed reference data.
    pub async fn initialize_storage(&self) -> Result<seed::SeedReport> {
        seed::initialize(&self.db_path).await
    }
}

/// Rejects absent or blank input before any database access.
fn require_text<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(GatewayError::invalid_request(message)),
    }
}
