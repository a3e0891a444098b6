//! Error bodies and the `VotingError` to HTTP status mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::voting::{ErrorKind, VotingError};

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: "An internal error occurred".to_string(),
        }
    }
}

/// 400 for a path id that does not parse.
pub fn invalid_id(resource: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(format!("Invalid {} ID", resource))),
    )
        .into_response()
}

/// Status code a voting error is reported with.
pub fn status_for(error: &VotingError) -> StatusCode {
    if matches!(error, VotingError::Validation(_)) {
        return StatusCode::BAD_REQUEST;
    }
    match error.kind() {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Business => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Infrastructure | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Converts a voting error into a response. Server-side failures are
/// logged here and reach the caller as an opaque 500.
pub fn voting_error_response(error: VotingError) -> Response {
    let status = status_for(&error);

    if status.is_server_error() {
        tracing::error!(error = %error, code = %error.code(), "Request failed");
        return (status, Json(ErrorResponse::internal())).into_response();
    }

    let body = ErrorResponse {
        code: error.code().to_string(),
        message: error.to_string(),
    };
    (status, Json(body)).into_response()
}
