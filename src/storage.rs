//! JSON file persistence for raw and cleaned weather data.
//!
//! Three shapes are written per refresh cycle: one raw file per city
//! (the Open-Meteo response augmented with a `metadata` object), the
//! all-cities raw aggregate, and the all-cities cleaned aggregate. The
//! dashboard consumes these files; this service never reads the raw ones
//! back.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::capitals::Capital;
use crate::errors::AppError;
use crate::model::CleanedAggregate;

/// File name of the all-cities raw aggregate.
pub const ALL_CAPITALS_FILE: &str = "open_meteo_all_capitals.json";

/// File name of the all-cities cleaned aggregate.
pub const CLEANED_FILE: &str = "open_meteo_all_capitals_CLEANED.json";

/// Path of one city's raw forecast file, e.g. `open_meteo_warsaw.json`.
pub fn per_city_path(data_dir: &Path, capital: &Capital) -> PathBuf {
    data_dir.join(format!("open_meteo_{}.json", capital.slug()))
}

/// Serialize `value` as pretty-printed JSON to `path`, creating parent
/// directories as needed.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Internal(format!("JSON serialization failed: {}", e)))?;
    fs::write(path, text)?;
    Ok(())
}

/// Load a cleaned aggregate from disk, validating the structural root.
///
/// A file without the `capitals_weather_cleaned` key is a `DataShape`
/// error: there is no safe partial ranking without a valid root.
pub fn load_cleaned_aggregate(path: &Path) -> Result<CleanedAggregate, AppError> {
    let text = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;

    if value.get("capitals_weather_cleaned").is_none() {
        return Err(AppError::DataShape(format!(
            "{}: missing 'capitals_weather_cleaned' key",
            path.display()
        )));
    }

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CityCleaned, CityMetadata, CleanedHourlyRow};
    use chrono::NaiveDateTime;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("capitals-comfort-{}-{}", std::process::id(), name))
    }

    fn sample_aggregate() -> CleanedAggregate {
        CleanedAggregate {
            capitals_weather_cleaned: vec![CityCleaned {
                metadata: CityMetadata {
                    country: "Polska".to_string(),
                    city: "Warsaw".to_string(),
                    lat: 52.2297,
                    lon: 21.0122,
                    timezone: "Europe/Warsaw".to_string(),
                },
                cleaned_hourly_rows: vec![
                    CleanedHourlyRow {
                        time: NaiveDateTime::parse_from_str("2026-08-30T07:00", "%Y-%m-%dT%H:%M")
                            .unwrap(),
                        temperature_2m: 18.2,
                        relative_humidity_2m: 60.0,
                        precipitation: Some(0.0),
                        wind_speed_10m: Some(9.4),
                        cloud_cover: Some(40.0),
                    },
                    CleanedHourlyRow {
                        time: NaiveDateTime::parse_from_str("2026-08-30T08:00", "%Y-%m-%dT%H:%M")
                            .unwrap(),
                        temperature_2m: 19.1,
                        relative_humidity_2m: 57.0,
                        precipitation: None,
                        wind_speed_10m: None,
                        cloud_cover: Some(35.0),
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_cleaned_aggregate_round_trip() {
        let path = temp_path("round-trip.json");
        let aggregate = sample_aggregate();

        save_json(&aggregate, &path).unwrap();
        let loaded = load_cleaned_aggregate(&path).unwrap();
        fs::remove_file(&path).ok();

        // Row-for-row identical, including preserved nulls
        assert_eq!(loaded, aggregate);
    }

    #[test]
    fn test_load_missing_root_key_is_data_shape_error() {
        let path = temp_path("bad-root.json");
        fs::write(&path, r#"{"something_else": []}"#).unwrap();

        let err = load_cleaned_aggregate(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert!(matches!(err, AppError::DataShape(_)), "got {:?}", err);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_cleaned_aggregate(&temp_path("does-not-exist.json")).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn test_per_city_path_uses_slug() {
        let cap = crate::capitals::CAPITALS
            .iter()
            .find(|c| c.city == "Warsaw")
            .unwrap();
        let path = per_city_path(Path::new("/data"), cap);
        assert_eq!(path, PathBuf::from("/data/open_meteo_warsaw.json"));
    }
}
