//! Ranking engine.
//!
//! Pure derived views over the cleaned aggregate: per-city statistics,
//! the overall comfort ranking, the daily ranking, top-N per day, and
//! best-of-day. Nothing here mutates state or performs I/O; every view is
//! recomputed from the aggregate passed in.
//!
//! Determinism: grouping preserves aggregate (input) order and all sorts
//! are stable, so equal scores keep their input order and repeated
//! invocations produce identical results.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::CleanedAggregate;
use crate::services::scoring;

/// How many entries the per-day leaderboard keeps.
pub const TOP_N_PER_DAY: usize = 3;

/// Per-city weather statistics over all rows, day and night.
///
/// Optional-factor aggregates are `None` when a city reported no values for
/// that factor at all — missing values are excluded, never zero-defaulted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CityStats {
    pub country: String,
    pub city: String,
    pub avg_temperature: f64,
    pub max_temperature: f64,
    pub min_temperature: f64,
    pub avg_humidity: f64,
    pub max_humidity: f64,
    pub min_humidity: f64,
    pub avg_wind: Option<f64>,
    pub max_wind: Option<f64>,
    pub avg_precipitation: Option<f64>,
    /// Sum of observed precipitation; 0.0 when nothing was observed.
    pub total_precipitation: f64,
    pub avg_clouds: Option<f64>,
}

/// One row of the overall comfort ranking. Position 1 = most comfortable.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RankingEntry {
    pub position: usize,
    pub city: String,
    pub comfort_index: f64,
}

/// One row of the daily ranking: mean daytime comfort for (date, city).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyRankingEntry {
    pub date: NaiveDate,
    pub city: String,
    pub comfort_index: f64,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Running aggregate for one optional factor, excluding missing values.
#[derive(Default)]
struct OptionalFactor {
    sum: f64,
    max: Option<f64>,
    count: usize,
}

impl OptionalFactor {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
            self.max = Some(self.max.map_or(v, |m: f64| m.max(v)));
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Per-city statistics over all rows (day and night), grouped by
/// (country, city) in aggregate order. Values rounded to 2 decimals.
pub fn city_stats(aggregate: &CleanedAggregate) -> Vec<CityStats> {
    let mut stats = Vec::new();

    for block in &aggregate.capitals_weather_cleaned {
        let rows = &block.cleaned_hourly_rows;
        if rows.is_empty() {
            continue;
        }

        let mut temp_sum = 0.0;
        let mut temp_max = f64::NEG_INFINITY;
        let mut temp_min = f64::INFINITY;
        let mut hum_sum = 0.0;
        let mut hum_max = f64::NEG_INFINITY;
        let mut hum_min = f64::INFINITY;
        let mut wind = OptionalFactor::default();
        let mut precip = OptionalFactor::default();
        let mut clouds = OptionalFactor::default();

        for row in rows {
            temp_sum += row.temperature_2m;
            temp_max = temp_max.max(row.temperature_2m);
            temp_min = temp_min.min(row.temperature_2m);
            hum_sum += row.relative_humidity_2m;
            hum_max = hum_max.max(row.relative_humidity_2m);
            hum_min = hum_min.min(row.relative_humidity_2m);
            wind.push(row.wind_speed_10m);
            precip.push(row.precipitation);
            clouds.push(row.cloud_cover);
        }

        let n = rows.len() as f64;
        stats.push(CityStats {
            country: block.metadata.country.clone(),
            city: block.metadata.city.clone(),
            avg_temperature: round2(temp_sum / n),
            max_temperature: round2(temp_max),
            min_temperature: round2(temp_min),
            avg_humidity: round2(hum_sum / n),
            max_humidity: round2(hum_max),
            min_humidity: round2(hum_min),
            avg_wind: wind.mean().map(round2),
            max_wind: wind.max.map(round2),
            avg_precipitation: precip.mean().map(round2),
            total_precipitation: round2(precip.sum),
            avg_clouds: clouds.mean().map(round2),
        });
    }

    stats
}

/// Overall ranking: mean daytime comfort index per city, sorted descending,
/// positions 1..N. Stable sort — ties keep aggregate order.
pub fn overall_ranking(aggregate: &CleanedAggregate) -> Vec<RankingEntry> {
    let mut means: Vec<(String, f64)> = Vec::new();

    for block in &aggregate.capitals_weather_cleaned {
        let lat = block.metadata.lat;
        let mut sum = 0.0;
        let mut count = 0usize;

        for row in &block.cleaned_hourly_rows {
            if !scoring::is_daytime(row.hour()) {
                continue;
            }
            sum += scoring::comfort_index(row, lat);
            count += 1;
        }

        if count > 0 {
            means.push((block.metadata.city.clone(), sum / count as f64));
        }
    }

    means.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    means
        .into_iter()
        .enumerate()
        .map(|(i, (city, mean))| RankingEntry {
            position: i + 1,
            city,
            comfort_index: round3(mean),
        })
        .collect()
}

/// Daily ranking: mean daytime comfort per (date, city), dates ascending,
/// cities within a date descending by comfort (stable on ties).
///
/// A date covered by only some cities is expected (timezones shift each
/// city's last covered day differently) and simply yields fewer rows.
pub fn daily_ranking(aggregate: &CleanedAggregate) -> Vec<DailyRankingEntry> {
    // date → (city, mean comfort), cities in aggregate order
    let mut per_date: BTreeMap<NaiveDate, Vec<(String, f64)>> = BTreeMap::new();

    for block in &aggregate.capitals_weather_cleaned {
        let lat = block.metadata.lat;
        let mut city_days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();

        for row in &block.cleaned_hourly_rows {
            if !scoring::is_daytime(row.hour()) {
                continue;
            }
            let entry = city_days.entry(row.date()).or_insert((0.0, 0));
            entry.0 += scoring::comfort_index(row, lat);
            entry.1 += 1;
        }

        for (date, (sum, count)) in city_days {
            per_date
                .entry(date)
                .or_default()
                .push((block.metadata.city.clone(), sum / count as f64));
        }
    }

    let mut entries = Vec::new();
    for (date, mut cities) in per_date {
        cities.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        for (city, mean) in cities {
            entries.push(DailyRankingEntry {
                date,
                city,
                comfort_index: round3(mean),
            });
        }
    }

    entries
}

/// First `n` entries of the daily ranking for each date, in ranked order.
/// Dates with fewer than `n` cities return all available entries.
pub fn top_n_per_day(daily: &[DailyRankingEntry], n: usize) -> Vec<DailyRankingEntry> {
    let mut result = Vec::new();
    let mut current_date: Option<NaiveDate> = None;
    let mut taken = 0usize;

    for entry in daily {
        if current_date != Some(entry.date) {
            current_date = Some(entry.date);
            taken = 0;
        }
        if taken < n {
            result.push(entry.clone());
            taken += 1;
        }
    }

    result
}

/// The single top entry of the daily ranking for each date.
pub fn best_per_day(daily: &[DailyRankingEntry]) -> Vec<DailyRankingEntry> {
    top_n_per_day(daily, 1)
}
