//! Mapping of domain failures to HTTP responses.
//!
//! This is the only place request failures are logged.

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::ingest::IngestError;
use crate::store::StoreError;

/// Error returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body missing, not JSON, or missing fields.
    #[error("invalid request body: {0}")]
    BadRequest(String),

    #[error("request body too large")]
    PayloadTooLarge,

    /// Path id that could never have been issued.
    #[error("log {0} not found")]
    UnknownId(String),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UnknownId(_) => StatusCode::NOT_FOUND,
            ApiError::Ingest(IngestError::InvalidSeverity(_)) => StatusCode::BAD_REQUEST,
            ApiError::Ingest(IngestError::Store(store)) => match store {
                StoreError::Conflict { .. } => StatusCode::CONFLICT,
                StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                StoreError::Unavailable(_)
                | StoreError::Rejected { .. }
                | StoreError::Decode { .. } => StatusCode::BAD_GATEWAY,
                StoreError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %message, "Request failed");
        } else if status == StatusCode::CONFLICT {
            tracing::warn!(status = %status, error = %message, "Request conflicted");
        } else {
            tracing::debug!(status = %status, error = %message, "Request rejected");
        }

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
