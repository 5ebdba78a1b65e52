//! Command-line argument parsing.

use clap::{Parser, Subcommand};
use sql_playground::config::Config;
use std::path::PathBuf;

/// A query gateway for a seeded SQLite practice database.
#[derive(Parser, Debug)]
#[command(name = "sql-playground")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Database file path (overrides config and PLAYGROUND_DB_PATH)
    #[arg(short = 'd', long, global = true, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API server
    Serve {
        /// Address to listen on (overrides config and PLAYGROUND_BIND)
        #[arg(short = 'b', long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Drop and recreate the database with its reference data
    Init,

    /// Run one SQL statement and print the result as JSON
    Query {
        /// SQL text
        #[arg(value_name = "SQL")]
        sql: String,
    },

    /// List user tables as JSON
    Tables,

    /// Print the first rows of a table as JSON
    Preview {
        /// Table name (case-sensitive)
        #[arg(value_name = "TABLE")]
        table: String,

        /// Maximum rows to print
        #[arg(short = 'n', long, value_name = "N")]
        limit: Option<u32>,
    },
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Applies command-line overrides, which take precedence over everything.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(path) = &self.database {
            config.database.path = path.clone();
        }
        if let Command::Serve { bind: Some(bind) } = &self.command {
            config.server.bind = bind.clone();
        }
        if let Command::Preview {
            limit: Some(limit), ..
        } = &self.command
        {
            config.database.preview_limit = *limit;
        }
    }
}
