//! HTTP error taxonomy shared by handlers and state operations.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::llm::LlmError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by the HTTP API. Each variant maps to exactly one status
/// code; state operations return these directly so handlers stay thin.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Failed to generate questions")]
    Upstream(#[from] LlmError),
}

/// JSON error body: `{ "error": ..., "details": ... }`
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            // Model output that failed validation carries its message
            // verbatim; transport failures keep a stable error string with
            // the cause in `details`.
            ApiError::Upstream(LlmError::ParseError(msg)) => ErrorBody {
                error: msg.clone(),
                details: None,
            },
            ApiError::Upstream(inner) => ErrorBody {
                error: self.to_string(),
                details: Some(inner.to_string()),
            },
            _ => ErrorBody {
                error: self.to_string(),
                details: None,
            },
        };

        if status.is_server_error() {
            tracing::error!("{}: {}", status, body.error);
        }

        (status, Json(body)).into_response()
    }
}
