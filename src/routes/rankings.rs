//! Ranking HTTP endpoints.
//!
//! - GET /api/v1/rankings/overall
//! - GET /api/v1/rankings/daily
//! - GET /api/v1/rankings/top-per-day?n=3
//! - GET /api/v1/rankings/best-per-day
//! - GET /api/v1/stats
//!
//! All views are recomputed on demand from the in-memory cleaned aggregate.
//! Before the first successful refresh cycle there is nothing to rank and
//! every endpoint returns 404.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::model::CleanedAggregate;
use crate::services::collector::{SharedAggregate, SharedCollectorState};
use crate::services::open_meteo::OpenMeteoClient;
use crate::services::ranking::{self, CityStats, DailyRankingEntry, RankingEntry};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub aggregate: SharedAggregate,
    pub collector_state: SharedCollectorState,
    pub client: OpenMeteoClient,
    pub config: AppConfig,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct TopPerDayQuery {
    /// Entries to keep per date (default 3)
    pub n: Option<usize>,
}

/// Clone the current aggregate out of the shared state, or 404 when no
/// refresh cycle has succeeded yet.
async fn current_aggregate(state: &AppState) -> Result<CleanedAggregate, AppError> {
    state
        .aggregate
        .read()
        .await
        .clone()
        .ok_or_else(|| AppError::NotFound("no weather data collected yet".to_string()))
}

/// Overall comfort ranking: cities by mean daytime comfort index,
/// position 1 = most comfortable climate.
#[utoipa::path(
    get,
    path = "/api/v1/rankings/overall",
    tag = "Rankings",
    responses(
        (status = 200, description = "Overall ranking", body = [RankingEntry]),
        (status = 404, description = "No weather data collected yet", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_overall_ranking(
    State(state): State<AppState>,
) -> Result<Json<Vec<RankingEntry>>, AppError> {
    let aggregate = current_aggregate(&state).await?;
    Ok(Json(ranking::overall_ranking(&aggregate)))
}

/// Daily ranking: mean daytime comfort per (date, city), dates ascending.
#[utoipa::path(
    get,
    path = "/api/v1/rankings/daily",
    tag = "Rankings",
    responses(
        (status = 200, description = "Daily ranking", body = [DailyRankingEntry]),
        (status = 404, description = "No weather data collected yet", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_daily_ranking(
    State(state): State<AppState>,
) -> Result<Json<Vec<DailyRankingEntry>>, AppError> {
    let aggregate = current_aggregate(&state).await?;
    Ok(Json(ranking::daily_ranking(&aggregate)))
}

/// Top-N cities per day. Dates with fewer reporting cities return all
/// available entries.
#[utoipa::path(
    get,
    path = "/api/v1/rankings/top-per-day",
    tag = "Rankings",
    params(TopPerDayQuery),
    responses(
        (status = 200, description = "Top-N per day", body = [DailyRankingEntry]),
        (status = 400, description = "Invalid n", body = crate::errors::ErrorResponse),
        (status = 404, description = "No weather data collected yet", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_top_per_day(
    State(state): State<AppState>,
    Query(query): Query<TopPerDayQuery>,
) -> Result<Json<Vec<DailyRankingEntry>>, AppError> {
    let n = query.n.unwrap_or(ranking::TOP_N_PER_DAY);
    if n == 0 {
        return Err(AppError::Configuration(
            "n must be at least 1".to_string(),
        ));
    }

    let aggregate = current_aggregate(&state).await?;
    let daily = ranking::daily_ranking(&aggregate);
    Ok(Json(ranking::top_n_per_day(&daily, n)))
}

/// The single most comfortable city for each date.
#[utoipa::path(
    get,
    path = "/api/v1/rankings/best-per-day",
    tag = "Rankings",
    responses(
        (status = 200, description = "Best city per day", body = [DailyRankingEntry]),
        (status = 404, description = "No weather data collected yet", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_best_per_day(
    State(state): State<AppState>,
) -> Result<Json<Vec<DailyRankingEntry>>, AppError> {
    let aggregate = current_aggregate(&state).await?;
    let daily = ranking::daily_ranking(&aggregate);
    Ok(Json(ranking::best_per_day(&daily)))
}

/// Per-city statistics over all rows, day and night.
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    tag = "Rankings",
    responses(
        (status = 200, description = "Per-city statistics", body = [CityStats]),
        (status = 404, description = "No weather data collected yet", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_city_stats(
    State(state): State<AppState>,
) -> Result<Json<Vec<CityStats>>, AppError> {
    let aggregate = current_aggregate(&state).await?;
    Ok(Json(ranking::city_stats(&aggregate)))
}
