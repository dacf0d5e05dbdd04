use crate::application::{ConfluenceError, IngestError};
use crate::presentation::rest::dto::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError {
            status,
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "Missing or incorrect webhook secret",
        )
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not found", "No route for this path")
    }

    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Storage unavailable",
            message,
        )
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::bad_request("Invalid JSON payload", message)
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::InvalidPayload(msg) => Self::bad_request("Invalid payload", msg),
            IngestError::InvalidTimestamp(msg) => Self::bad_request("Invalid timestamp", msg),
            IngestError::StorageUnavailable(e) => Self::storage_unavailable(e.to_string()),
        }
    }
}

impl From<ConfluenceError> for ApiError {
    fn from(err: ConfluenceError) -> Self {
        match err {
            ConfluenceError::InvalidQuery(msg) => Self::bad_request("Invalid query", msg),
            ConfluenceError::StorageUnavailable(e) => Self::storage_unavailable(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::warn!(status = %self.status, error = %self.error, message = %self.message, "Request failed");
        }
        let body = Json(ErrorResponse::new(self.error, self.message));
        (self.status, body).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API Error {}: {}: {}", self.status, self.error, self.message)
    }
}

impl std::error::Error for ApiError {}
