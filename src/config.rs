//! Configuration management for the playground.
//!
//! Loads settings from a TOML file, then applies environment overrides.
//! Command-line flags are applied last by the binary.

use crate::db::catalog::DEFAULT_PREVIEW_LIMIT;
use crate::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Environment variable overriding the database path.
pub const ENV_DB_PATH: &str = "PLAYGROUND_DB_PATH";

/// Environment variable overriding the server bind address.
pub const ENV_BIND: &str = "PLAYGROUND_BIND";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Database file settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Database file settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// Path to the database file; relative paths resolve against the
    /// working directory.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// Maximum rows returned by a table preview.
    #[serde(default = "default_preview_limit")]
    pub preview_limit: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("app.db")
}

fn default_preview_limit() -> u32 {
    DEFAULT_PREVIEW_LIMIT
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            preview_limit: default_preview_limit(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Address the server listens on.
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl ServerConfig {
    /// Parses the bind address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind.parse().map_err(|e| {
            GatewayError::config(format!("Invalid bind address '{}': {e}", self.bind))
        })
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sql-playground")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| GatewayError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            GatewayError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `PLAYGROUND_DB_PATH` and `PLAYGROUND_BIND` when set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_DB_PATH).filter(|v| !v.is_empty()) {
            self.database.path = PathBuf::from(path);
        }
        if let Some(bind) = lookup(ENV_BIND).filter(|v| !v.is_empty()) {
            self.server.bind = bind;
        }
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if self.database.preview_limit == 0 {
            return Err(GatewayError::config("database.preview_limit must be at least 1"));
        }
        self.server.socket_addr()?;
        Ok(())
    }
}
