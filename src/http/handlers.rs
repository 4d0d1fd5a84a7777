//! Route handlers for the log API.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::ingest::CreateLog;
use crate::model::{LogEntry, LogId};

/// Body of a successful create.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedLog {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// Handle POST /api/v1/logs
///
/// The body is decoded as JSON whatever `Content-Type` the client sent.
pub async fn create_log(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<CreatedLog>), ApiError> {
    let body = body?;
    let request: CreateLog =
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let id = state.ingest.create(request).await?;
    tracing::debug!(id = %id, "Log created");

    Ok((StatusCode::CREATED, Json(CreatedLog { id: id.to_string() })))
}

/// Handle GET /api/v1/logs/{id}
pub async fn get_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LogEntry>, ApiError> {
    let id: LogId = id.parse().map_err(|_| ApiError::UnknownId(id))?;
    let entry = state.ingest.get(&id).await?;
    Ok(Json(entry))
}

/// Handle GET /healthz
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
