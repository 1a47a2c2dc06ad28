use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Standard error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed or out-of-range input, rejected before any network call.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Upstream fetch failed for one city (retries exhausted or a
    /// non-retryable status). Scoped to that city; never aborts the batch.
    #[error("Fetch failed for {city}: {reason}")]
    Fetch { city: String, reason: String },

    /// Structural fields missing from weather data (absent `hourly` object,
    /// absent `capitals_weather_cleaned` key). Fatal for the ranking
    /// invocation that encounters it.
    #[error("Malformed weather data: {0}")]
    DataShape(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Configuration(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Fetch { .. } => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::DataShape(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Io(err) => {
                tracing::error!("I/O error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal I/O error".to_string(),
                )
            }
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        (status, axum::Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::DataShape(format!("JSON error: {}", err))
    }
}
