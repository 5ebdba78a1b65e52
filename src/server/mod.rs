//! HTTP surface for the gateway.
//!
//! ## Endpoints
//!
//! - `POST /api/query` - Run `{ "query": "..." }` and return rows or changes
//! - `GET /api/tables` - List user tables
//! - `POST /api/table-preview` - Preview `{ "tableName": "..." }`
//! - `GET|POST /api/init-db` - Recreate and seed the database
//! - `GET /health` - Liveness check

mod handlers;

pub use handlers::ApiError;

use crate::error::{GatewayError, Result};
use crate::gateway::Gateway;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Shared state for the API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub gateway: Arc<Gateway>,
}

/// Creates the API router.
pub fn create_router(gateway: Gateway) -> Router {
    let state = ApiState {
        gateway: Arc::new(gateway),
    };

    Router::new()
        .route("/api/query", post(handlers::run_query))
        .route("/api/tables", get(handlers::list_tables))
        .route("/api/table-preview", post(handlers::preview_table))
        .route(
            "/api/init-db",
            get(handlers::initialize_storage).post(handlers::initialize_storage),
        )
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Binds `addr` and serves the API until Ctrl-C.
pub async fn serve(addr: SocketAddr, gateway: Gateway) -> Result<()> {
    let db_path = gateway.db_path().display().to_string();
    let app = create_router(gateway);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            GatewayError::config(format!(
                "Port {} is already in use. Use --bind to pick a different address.",
                addr.port()
            ))
        } else {
            GatewayError::unexpected(format!("Failed to bind HTTP server to {addr}: {e}"))
        }
    })?;

    info!(addr = %addr, database = %db_path, "Starting HTTP API server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| GatewayError::unexpected(format!("HTTP server failed: {e}")))?;

    info!("HTTP API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
