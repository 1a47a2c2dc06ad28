//! Background collector: one refresh cycle fetches, cleans, and persists
//! every configured capital, then assembles the aggregates.
//!
//! Architecture:
//! - Each city is one unit of work (fetch → augment metadata → persist raw
//!   → clean); units run concurrently through a bounded fan-out.
//! - A unit failure is caught and logged; it never aborts the other units.
//! - Assembly happens only after the collection barrier. The new aggregates
//!   fully replace the previous ones; on total failure or a blown wall-clock
//!   budget the previous aggregate is kept (last known good).
//! - State is in-memory (`Arc<RwLock<...>>`), exposed via the status endpoint.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use serde::Serialize;
use tokio::sync::RwLock;
use utoipa::ToSchema;

use crate::capitals::Capital;
use crate::errors::AppError;
use crate::model::{CityCleaned, CityMetadata, CleanedAggregate, RawAggregate};
use crate::services::cleaner::clean_hourly_data;
use crate::services::open_meteo::OpenMeteoClient;
use crate::storage;

/// Concurrent fetch cap — one worker per city, the city count is small and fixed.
const MAX_CONCURRENT_FETCHES: usize = 15;

/// Default wall-clock budget for one full refresh cycle.
pub const REFRESH_BUDGET: Duration = Duration::from_secs(300);

// ---------------------------------------------------------------------------
// Collector state (in-memory, shared via Arc<RwLock<>>)
// ---------------------------------------------------------------------------

/// One city's failure in a refresh cycle.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CityFailure {
    pub city: String,
    pub reason: String,
}

/// Status of one city's unit in the last refresh cycle.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CityCollectStatus {
    pub country: String,
    pub city: String,
    /// "ok", "error: ...", or "pending"
    pub result: String,
    /// Cleaned rows produced by this unit.
    pub row_count: usize,
}

/// Global collector state, exposed via the status endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CollectorState {
    pub last_refresh_completed_at: Option<DateTime<Utc>>,
    pub last_refresh_duration_ms: Option<u64>,
    pub total_refreshes: u64,
    pub succeeded: usize,
    pub failures: Vec<CityFailure>,
    pub cities: Vec<CityCollectStatus>,
    /// Set when the last cycle failed as a whole (e.g. blown wall-clock
    /// budget); `None` after a cycle that reached the collection barrier.
    pub last_refresh_error: Option<String>,
}

impl CollectorState {
    pub fn new() -> Self {
        Self {
            last_refresh_completed_at: None,
            last_refresh_duration_ms: None,
            total_refreshes: 0,
            succeeded: 0,
            failures: Vec::new(),
            cities: Vec::new(),
            last_refresh_error: None,
        }
    }
}

impl Default for CollectorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared collector state handle.
pub type SharedCollectorState = Arc<RwLock<CollectorState>>;

/// The last-known-good cleaned aggregate, replaced wholesale after each
/// successful collection barrier. `None` until the first successful cycle.
pub type SharedAggregate = Arc<RwLock<Option<CleanedAggregate>>>;

/// Summary of one refresh cycle: how many cities succeeded, which failed
/// and why.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RefreshOutcome {
    pub succeeded: usize,
    pub failures: Vec<CityFailure>,
}

// ---------------------------------------------------------------------------
// Per-city unit of work
// ---------------------------------------------------------------------------

/// Successful output of one city's unit: the augmented raw payload plus the
/// cleaned record. Owned end-to-end by the unit; no shared mutable state.
struct CityUnit {
    raw: serde_json::Value,
    cleaned: CityCleaned,
}

/// One unit of work: fetch, augment with metadata, persist the per-city raw
/// file, clean.
async fn fetch_clean_persist(
    client: &OpenMeteoClient,
    capital: &Capital,
    days: u8,
    data_dir: &Path,
) -> Result<CityUnit, AppError> {
    let mut raw = client.fetch_hourly(capital, days).await?;

    let metadata = CityMetadata::from(capital);
    let metadata_value = serde_json::to_value(&metadata)
        .map_err(|e| AppError::Internal(format!("metadata serialization failed: {}", e)))?;
    raw.as_object_mut()
        .ok_or_else(|| AppError::DataShape("forecast response is not a JSON object".to_string()))?
        .insert("metadata".to_string(), metadata_value);

    storage::save_json(&raw, &storage::per_city_path(data_dir, capital))?;

    let rows = clean_hourly_data(&raw)?;

    Ok(CityUnit {
        raw,
        cleaned: CityCleaned {
            metadata,
            cleaned_hourly_rows: rows,
        },
    })
}

// ---------------------------------------------------------------------------
// Refresh cycle
// ---------------------------------------------------------------------------

/// Run one full refresh cycle over `capitals` within `budget` of wall-clock
/// time (callers outside tests pass [`REFRESH_BUDGET`]).
///
/// Partial success is the steady state: failed cities are reported in the
/// outcome and simply absent from the aggregate. Only a blown wall-clock
/// budget fails the cycle as a whole; in that case (and on total failure)
/// the previous aggregate is left in place.
pub async fn run_refresh(
    client: &OpenMeteoClient,
    capitals: &[Capital],
    days: u8,
    data_dir: &Path,
    budget: Duration,
    aggregate: &SharedAggregate,
    state: &SharedCollectorState,
) -> Result<RefreshOutcome, AppError> {
    let cycle_start = Utc::now();

    // Fan-out, bounded; `buffered` keeps configured city order so the
    // resulting aggregates are deterministic across cycles.
    let units: Vec<_> = capitals
        .iter()
        .map(|cap| fetch_clean_persist(client, cap, days, data_dir))
        .collect();
    let collect_all = futures::stream::iter(units)
        .buffered(MAX_CONCURRENT_FETCHES)
        .collect::<Vec<_>>();

    let results = match tokio::time::timeout(budget, collect_all).await {
        Ok(results) => results,
        Err(_) => {
            let reason = format!(
                "refresh cycle exceeded its {}s wall-clock budget",
                budget.as_secs()
            );
            tracing::error!("Collector: {}, keeping previous aggregate", reason);
            let duration_ms = (Utc::now() - cycle_start).num_milliseconds().max(0) as u64;
            {
                let mut s = state.write().await;
                s.last_refresh_completed_at = Some(Utc::now());
                s.last_refresh_duration_ms = Some(duration_ms);
                s.total_refreshes += 1;
                s.succeeded = 0;
                s.failures = Vec::new();
                s.cities = Vec::new();
                s.last_refresh_error = Some(reason.clone());
            }
            return Err(AppError::Internal(reason));
        }
    };

    // Collection barrier passed — classify the units.
    let mut raw_payloads = Vec::new();
    let mut cleaned_blocks = Vec::new();
    let mut failures = Vec::new();
    let mut city_statuses = Vec::with_capacity(capitals.len());

    for (capital, result) in capitals.iter().zip(results) {
        match result {
            Ok(unit) => {
                city_statuses.push(CityCollectStatus {
                    country: capital.country.to_string(),
                    city: capital.city.to_string(),
                    result: "ok".to_string(),
                    row_count: unit.cleaned.cleaned_hourly_rows.len(),
                });
                raw_payloads.push(unit.raw);
                cleaned_blocks.push(unit.cleaned);
            }
            Err(e) => {
                tracing::warn!("Collector: unit for {} failed: {}", capital.city, e);
                city_statuses.push(CityCollectStatus {
                    country: capital.country.to_string(),
                    city: capital.city.to_string(),
                    result: format!("error: {}", e),
                    row_count: 0,
                });
                failures.push(CityFailure {
                    city: capital.city.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let succeeded = cleaned_blocks.len();

    if succeeded > 0 {
        let raw_aggregate = RawAggregate {
            capitals_weather: raw_payloads,
        };
        let cleaned_aggregate = CleanedAggregate {
            capitals_weather_cleaned: cleaned_blocks,
        };

        // The cleaned aggregate is the one read back at startup, so it is
        // written first; a raw-aggregate write failure must not leave disk
        // and memory out of step.
        storage::save_json(&cleaned_aggregate, &data_dir.join(storage::CLEANED_FILE))?;
        if let Err(e) = storage::save_json(&raw_aggregate, &data_dir.join(storage::ALL_CAPITALS_FILE)) {
            tracing::warn!("Collector: failed to persist raw aggregate: {}", e);
        }

        // Wholesale replacement — never merged with stale data.
        *aggregate.write().await = Some(cleaned_aggregate);
    } else {
        tracing::error!(
            "Collector: all {} cities failed, keeping previous aggregate",
            capitals.len()
        );
    }

    let duration_ms = (Utc::now() - cycle_start).num_milliseconds().max(0) as u64;
    {
        let mut s = state.write().await;
        s.last_refresh_completed_at = Some(Utc::now());
        s.last_refresh_duration_ms = Some(duration_ms);
        s.total_refreshes += 1;
        s.succeeded = succeeded;
        s.failures = failures.clone();
        s.cities = city_statuses;
        s.last_refresh_error = None;
    }

    tracing::info!(
        "Collector: cycle complete in {}ms — {}/{} cities succeeded",
        duration_ms,
        succeeded,
        capitals.len(),
    );

    Ok(RefreshOutcome { succeeded, failures })
}

/// Run the background collector. Never returns (runs until process exit).
///
/// Should be spawned via `tokio::spawn(run_collector(...))`.
pub async fn run_collector(
    client: OpenMeteoClient,
    capitals: &'static [Capital],
    days: u8,
    data_dir: PathBuf,
    interval: Duration,
    aggregate: SharedAggregate,
    state: SharedCollectorState,
) {
    tracing::info!("Background collector started ({}s interval)", interval.as_secs());

    loop {
        if let Err(e) =
            run_refresh(&client, capitals, days, &data_dir, REFRESH_BUDGET, &aggregate, &state).await
        {
            tracing::error!("Collector: refresh cycle failed: {}", e);
        }
        tokio::time::sleep(interval).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
