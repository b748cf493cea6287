//! Backend error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Message returned when `POST /query/test-data` receives anything but 100.
pub const NUM_MUST_BE_100: &str = "num must be 100";

/// Errors surfaced to HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The request was well-formed but violates a rule (400).
    #[error("{0}")]
    BadRequest(String),

    /// Missing, malformed or unknown credentials (401).
    #[error("{0}")]
    Unauthorized(String),
}

impl BackendError {
    /// The HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

/// `{ statusCode, message, error }`, the shape clients read `message` from.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: u16,
    message: String,
    error: &'static str,
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            status_code: status.as_u16(),
            message: self.to_string(),
            error: status.canonical_reason().unwrap_or("Error"),
        };
        (status, Json(body)).into_response()
    }
}
