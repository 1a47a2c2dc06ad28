//! Hourly payload cleaning.
//!
//! Flattens Open-Meteo's `hourly` parallel arrays into validated observation
//! rows. The usable length is the minimum across all six arrays, guarding
//! against responses where optional fields are truncated relative to
//! required ones. Rows missing temperature or humidity are dropped; the
//! other factors pass through as explicit nulls.

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::errors::AppError;
use crate::model::CleanedHourlyRow;

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
const TIME_FORMAT_WITH_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

/// The `hourly` object of an Open-Meteo forecast response.
/// Arrays the upstream omitted deserialize as empty, pinning the usable
/// length to zero rather than failing.
#[derive(Debug, Deserialize)]
struct HourlySeries {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    cloud_cover: Vec<Option<f64>>,
}

/// Clean one city's raw hourly payload into chronological observation rows.
///
/// An absent `hourly` object is a structural failure (`DataShape`), not an
/// empty result — there is nothing meaningful to score without it.
pub fn clean_hourly_data(raw: &serde_json::Value) -> Result<Vec<CleanedHourlyRow>, AppError> {
    let hourly_value = raw
        .get("hourly")
        .ok_or_else(|| AppError::DataShape("response missing 'hourly' object".to_string()))?;

    let hourly: HourlySeries = serde_json::from_value(hourly_value.clone())?;

    let min_len = [
        hourly.time.len(),
        hourly.temperature_2m.len(),
        hourly.relative_humidity_2m.len(),
        hourly.precipitation.len(),
        hourly.wind_speed_10m.len(),
        hourly.cloud_cover.len(),
    ]
    .into_iter()
    .min()
    .unwrap_or(0);

    let mut rows = Vec::with_capacity(min_len);

    for i in 0..min_len {
        // Temperature and humidity are the load-bearing fields; a row
        // missing either is dropped entirely.
        let (Some(temp), Some(hum)) = (hourly.temperature_2m[i], hourly.relative_humidity_2m[i])
        else {
            continue;
        };

        let time = parse_local_time(&hourly.time[i])?;

        rows.push(CleanedHourlyRow {
            time,
            temperature_2m: temp,
            relative_humidity_2m: hum,
            precipitation: hourly.precipitation[i],
            wind_speed_10m: hourly.wind_speed_10m[i],
            cloud_cover: hourly.cloud_cover[i],
        });
    }

    Ok(rows)
}

fn parse_local_time(s: &str) -> Result<NaiveDateTime, AppError> {
    NaiveDateTime::parse_from_str(s, TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, TIME_FORMAT_WITH_SECONDS))
        .map_err(|e| AppError::DataShape(format!("unparseable hourly time '{}': {}", s, e)))
}
