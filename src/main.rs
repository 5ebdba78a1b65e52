//! SQL Playground - a query gateway for a seeded SQLite practice database.

mod cli;

use anyhow::Context;
use cli::{Cli, Command};
use serde::Serialize;
use sql_playground::config::Config;
use sql_playground::error::GatewayError;
use sql_playground::gateway::Gateway;
use sql_playground::{logging, server};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    match &cli.log_file {
        Some(path) => logging::init_file_logging(path),
        None => logging::init_stderr_logging(),
    }

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<GatewayError>() {
            Some(gateway_err) => error!("{}: {e:#}", gateway_err.category()),
            None => error!("{e:#}"),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Precedence: CLI flags, then environment, then config file, then defaults.
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)
        .with_context(|| format!("Could not load {}", config_path.display()))?;
    config.apply_env_overrides();
    cli.apply_overrides(&mut config);
    config.validate()?;

    let gateway = Gateway::from_config(&config.database);
    info!("Database: {}", gateway.db_path().display());

    match cli.command {
        Command::Serve { .. } => {
            let addr = config.server.socket_addr()?;
            server::serve(addr, gateway).await?;
        }
        Command::Init => print_json(&gateway.initialize_storage().await?)?,
        Command::Query { sql } => print_json(&gateway.run_query(Some(&sql)).await?)?,
        Command::Tables => print_json(&gateway.list_tables().await?)?,
        Command::Preview { table, .. } => {
            print_json(&gateway.preview_table(Some(&table)).await?)?
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}
