//! Error types for the playground gateway.
//!
//! Every driver failure is mapped into [`GatewayError`] before it leaves a
//! public operation, so callers only ever branch on these kinds.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why an existing database file could not be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenFailureReason {
    /// Another connection holds a lock the open needed.
    Locked,
    /// The file is not a database or is damaged.
    Corrupt,
    /// The process lacks permission to read or write the file.
    PermissionDenied,
    /// Anything else the driver reported.
    Other,
}

impl fmt::Display for OpenFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked => write!(f, "locked"),
            Self::Corrupt => write!(f, "corrupt"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::Other => write!(f, "open failed"),
        }
    }
}

/// Main error type for gateway operations.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Missing or malformed caller input.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The database file does not exist yet.
    #[error("Database not initialized at {}. Run initialization first.", .0.display())]
    StorageNotInitialized(PathBuf),

    /// The database file exists but could not be opened.
    #[error("Failed to open database ({reason}): {detail}")]
    StorageOpenFailure {
        reason: OpenFailureReason,
        detail: String,
    },

    /// Statement preparation or execution failed; carries the driver diagnostic.
    #[error("SQL Error: {0}")]
    Sql(String),

    /// Catalog lookup miss.
    #[error("Table '{0}' does not exist")]
    TableNotFound(String),

    /// Configuration errors (invalid config file, bad values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Anything not otherwise classified.
    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

impl GatewayError {
    /// Creates an invalid request error with the given message.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Creates a storage open failure.
    pub fn open_failure(reason: OpenFailureReason, detail: impl Into<String>) -> Self {
        Self::StorageOpenFailure {
            reason,
            detail: detail.into(),
        }
    }

    /// Creates a SQL error with the given diagnostic.
    pub fn sql(msg: impl Into<String>) -> Self {
        Self::Sql(msg.into())
    }

    /// Creates a table-not-found error for the given name.
    pub fn table_not_found(name: impl Into<String>) -> Self {
        Self::TableNotFound(name.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an unexpected failure with the given message.
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "Invalid Request",
            Self::StorageNotInitialized(_) => "Database Not Initialized",
            Self::StorageOpenFailure { .. } => "Storage Error",
            Self::Sql(_) => "Query Error",
            Self::TableNotFound(_) => "Table Not Found",
            Self::Config(_) => "Configuration Error",
            Self::Unexpected(_) => "Internal Error",
        }
    }

    /// Returns a stable machine-readable identifier for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::StorageNotInitialized(_) => "storage_not_initialized",
            Self::StorageOpenFailure { .. } => "storage_open_failure",
            Self::Sql(_) => "sql_error",
            Self::TableNotFound(_) => "table_not_found",
            Self::Config(_) => "config",
            Self::Unexpected(_) => "unexpected_failure",
        }
    }
}

/// Result type alias using GatewayError.
pub type Result<T> = std::result::Result<T, GatewayError>;
