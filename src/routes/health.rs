use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::routes::rankings::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status ("ok" when weather data is loaded, "collecting" before
    /// the first successful refresh cycle)
    pub status: String,
    /// API version
    pub version: String,
    /// Whether a cleaned aggregate is available for ranking requests
    pub data_loaded: bool,
}

/// Health check endpoint.
///
/// Reports whether the first refresh cycle has produced an aggregate yet.
/// Returns "collecting" (still 200) before that, so load balancers can
/// distinguish warm-up from failure.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let data_loaded = state.aggregate.read().await.is_some();

    Json(HealthResponse {
        status: if data_loaded {
            "ok".to_string()
        } else {
            "collecting".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        data_loaded,
    })
}
