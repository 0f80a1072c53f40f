use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required field was missing or the body could not be read
    #[error("{0}")]
    Validation(String),

    /// The upload exceeded the configured body limit
    #[error("{0}")]
    PayloadTooLarge(String),

    /// The external service or library failed
    #[error("{0}")]
    Downstream(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Downstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        // `{:#}` keeps the context chain on one line
        ApiError::Downstream(format!("{:#}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
