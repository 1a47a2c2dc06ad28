//! Core data model: city metadata, cleaned observation rows, and the
//! aggregate shapes persisted to disk (consumed by the dashboard).
//!
//! Timestamps are zone-local naive datetimes: Open-Meteo returns times
//! already shifted to the requested timezone, without an offset suffix.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::capitals::Capital;

/// serde adapter for Open-Meteo's local-time format `YYYY-MM-DDTHH:MM`.
pub mod open_meteo_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M";
    /// Accepted on input only; some tooling re-emits times with seconds.
    const FORMAT_WITH_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&dt.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(&s, FORMAT_WITH_SECONDS))
            .map_err(serde::de::Error::custom)
    }
}

/// City descriptor attached to every persisted payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CityMetadata {
    pub country: String,
    pub city: String,
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
}

impl From<&Capital> for CityMetadata {
    fn from(cap: &Capital) -> Self {
        Self {
            country: cap.country.to_string(),
            city: cap.city.to_string(),
            lat: cap.lat,
            lon: cap.lon,
            timezone: cap.tz.to_string(),
        }
    }
}

/// One validated hourly observation.
///
/// Invariant: temperature and humidity are always present. Precipitation,
/// wind, and cloud cover may be null and are preserved as null in storage;
/// they default to zero only at scoring time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CleanedHourlyRow {
    /// Local time in the city's timezone
    #[serde(with = "open_meteo_time")]
    #[schema(value_type = String, example = "2026-08-30T13:00")]
    pub time: NaiveDateTime,
    /// Air temperature in °C
    pub temperature_2m: f64,
    /// Relative humidity in %
    pub relative_humidity_2m: f64,
    /// Precipitation in mm (null when the source reported no value)
    pub precipitation: Option<f64>,
    /// Wind speed in km/h (null when the source reported no value)
    pub wind_speed_10m: Option<f64>,
    /// Cloud cover in % (null when the source reported no value)
    pub cloud_cover: Option<f64>,
}

impl CleanedHourlyRow {
    pub fn date(&self) -> NaiveDate {
        self.time.date()
    }

    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    pub fn month(&self) -> u32 {
        self.time.month()
    }
}

/// One city's cleaned weather record from a single collection cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CityCleaned {
    pub metadata: CityMetadata,
    pub cleaned_hourly_rows: Vec<CleanedHourlyRow>,
}

/// All cities' cleaned records, keyed by city metadata.
/// Produced fresh by each refresh cycle — fully replaces its predecessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedAggregate {
    pub capitals_weather_cleaned: Vec<CityCleaned>,
}

/// All cities' raw Open-Meteo payloads (each augmented with a `metadata`
/// object), persisted for the dashboard's per-city charts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAggregate {
    pub capitals_weather: Vec<serde_json::Value>,
}
