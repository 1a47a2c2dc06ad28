//! Collector HTTP endpoints.
//!
//! - GET  /api/v1/collector/status — current state of the background collector
//! - POST /api/v1/collector/refresh — run one refresh cycle now

use axum::extract::State;
use axum::Json;
use std::path::Path;

use crate::capitals;
use crate::errors::AppError;
use crate::routes::rankings::AppState;
use crate::services::collector::{run_refresh, CollectorState, RefreshOutcome, REFRESH_BUDGET};

/// Get the current collector status.
///
/// Returns per-city info from the last refresh cycle (result, cleaned row
/// count) and global info (completion time, duration, success/failure tally).
#[utoipa::path(
    get,
    path = "/api/v1/collector/status",
    tag = "Collector",
    responses(
        (status = 200, description = "Current collector status", body = CollectorState),
    )
)]
pub async fn get_collector_status(State(state): State<AppState>) -> Json<CollectorState> {
    let s = state.collector_state.read().await;
    Json(s.clone())
}

/// Trigger one refresh cycle immediately.
///
/// Runs the same cycle as the background interval; the aggregate is replaced
/// atomically at the collection barrier, so a concurrently running interval
/// cycle and a manual trigger cannot interleave partial data — the last
/// barrier to complete wins wholesale.
#[utoipa::path(
    post,
    path = "/api/v1/collector/refresh",
    tag = "Collector",
    responses(
        (status = 200, description = "Refresh cycle completed", body = RefreshOutcome),
        (status = 500, description = "Refresh cycle failed as a whole", body = crate::errors::ErrorResponse),
    )
)]
pub async fn trigger_refresh(State(state): State<AppState>) -> Result<Json<RefreshOutcome>, AppError> {
    let outcome = run_refresh(
        &state.client,
        capitals::CAPITALS,
        state.config.forecast_days,
        Path::new(&state.config.data_dir),
        REFRESH_BUDGET,
        &state.aggregate,
        &state.collector_state,
    )
    .await?;

    Ok(Json(outcome))
}
