//! Request handlers and error responses.

use super::ApiState;
use crate::db::QueryResult;
use crate::error::GatewayError;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

/// Error response body: `{ error, kind, detail? }`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,

    /// User-facing message.
    pub error: String,

    /// Machine-readable error kind.
    pub kind: &'static str,

    /// Driver detail, for storage failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        let status = match &err {
            GatewayError::InvalidRequest(_) | GatewayError::Sql(_) => StatusCode::BAD_REQUEST,
            GatewayError::TableNotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::StorageNotInitialized(_)
            | GatewayError::StorageOpenFailure { .. }
            | GatewayError::Config(_)
            | GatewayError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let (error, detail) = match &err {
            GatewayError::InvalidRequest(msg) => (msg.clone(), None),
            GatewayError::StorageOpenFailure { .. } => {
                ("Failed to open database".to_string(), Some(err.to_string()))
            }
            _ => (err.to_string(), None),
        };

        if status.is_server_error() {
            error!("{}: {err}", err.category());
        }

        Self {
            status,
            error,
            kind: err.kind(),
            detail,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Successful body with a leading `success: true`.
#[derive(Serialize)]
struct Success<'a, T: Serialize> {
    success: bool,
    #[serde(flatten)]
    body: &'a T,
}

/// Successful query body, tagged with the result type.
#[derive(Serialize)]
struct QuerySuccess<'a, T: Serialize> {
    success: bool,
    #[serde(rename = "type")]
    result_type: &'static str,
    #[serde(flatten)]
    body: &'a T,
}

/// Reads one string field from a JSON body.
///
/// Returns `Ok(None)` for a missing or non-string field so the gateway can
/// reject it with its own message.
fn string_field(body: &[u8], field: &str) -> Result<Option<String>, ApiError> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
        ApiError::from(GatewayError::invalid_request(format!(
            "Request body must be valid JSON: {e}"
        )))
    })?;

    Ok(value
        .get(field)
        .and_then(serde_json::Value::as_str)
        .map(String::from))
}

/// `POST /api/query`
pub(super) async fn run_query(State(state): State<ApiState>, body: Bytes) -> Response {
    let sql = match string_field(&body, "query") {
        Ok(sql) => sql,
        Err(e) => return e.into_response(),
    };

    match state.gateway.run_query(sql.as_deref()).await {
        Ok(result) => {
            let result_type = result.type_label();
            match result {
                QueryResult::Rows(rows) => Json(QuerySuccess {
                    success: true,
                    result_type,
                    body: &rows,
                })
                .into_response(),
                QueryResult::Mutation(outcome) => Json(QuerySuccess {
                    success: true,
                    result_type,
                    body: &outcome,
                })
                .into_response(),
            }
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// `GET /api/tables`
pub(super) async fn list_tables(State(state): State<ApiState>) -> Response {
    match state.gateway.list_tables().await {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// `POST /api/table-preview`
pub(super) async fn preview_table(State(state): State<ApiState>, body: Bytes) -> Response {
    let name = match string_field(&body, "tableName") {
        Ok(name) => name,
        Err(e) => return e.into_response(),
    };

    match state.gateway.preview_table(name.as_deref()).await {
        Ok(preview) => (
            StatusCode::OK,
            Json(Success {
                success: true,
                body: &preview,
            }),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// `GET|POST /api/init-db`
pub(super) async fn initialize_storage(State(state): State<ApiState>) -> Response {
    match state.gateway.initialize_storage().await {
        Ok(report) => {
            info!(row_counts = ?report.row_counts, "Storage initialized");
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Database initialized successfully",
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!("{}: {e}", e.category());
            let message = match e {
                GatewayError::Unexpected(message) => message,
                other => other.to_string(),
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": message })),
            )
                .into_response()
        }
    }
}

/// `GET /health`
pub(super) async fn health() -> Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}
