//! Climate comfort scoring model.
//!
//! Five independent factor scores in [0,1], each a clamped linear falloff
//! from an optimum, combined into a weighted comfort index. The temperature
//! factor is seasonal and hemisphere-aware; the other four are fixed
//! year-round. Methodology: in winter the temperature optimum is 10°C with
//! tolerance 8, in summer 22°C with tolerance 10, in shoulder seasons 15°C
//! with tolerance 10.

use crate::model::CleanedHourlyRow;

/// Comfort index weights. They sum to 1.0, so the index stays in [0,1].
const WEIGHT_TEMPERATURE: f64 = 0.35;
const WEIGHT_HUMIDITY: f64 = 0.20;
const WEIGHT_PRECIPITATION: f64 = 0.20;
const WEIGHT_WIND: f64 = 0.15;
const WEIGHT_CLOUD: f64 = 0.10;

/// First local hour that counts as daytime (inclusive).
const DAYTIME_FIRST_HOUR: u32 = 7;
/// Last local hour that counts as daytime (inclusive).
const DAYTIME_LAST_HOUR: u32 = 22;

/// Clamped linear falloff: 1.0 at the optimum, 0.0 at optimum ± tolerance.
fn linear_score(value: f64, optimum: f64, tolerance: f64) -> f64 {
    (1.0 - (value - optimum).abs() / tolerance).clamp(0.0, 1.0)
}

/// Seasonal, hemisphere-aware temperature score.
///
/// The latitude sign selects the hemisphere; the calendar month selects the
/// season band. Southern-hemisphere winter uses the northern summer months
/// and vice versa.
pub fn temperature_score_seasonal(t: f64, month: u32, lat: f64) -> f64 {
    let north = lat >= 0.0;

    let winter: [u32; 3] = if north { [12, 1, 2] } else { [6, 7, 8] };
    let summer: [u32; 3] = if north { [6, 7, 8] } else { [12, 1, 2] };

    let (optimum, tolerance) = if winter.contains(&month) {
        (10.0, 8.0)
    } else if summer.contains(&month) {
        (22.0, 10.0)
    } else {
        (15.0, 10.0)
    };

    linear_score(t, optimum, tolerance)
}

/// Humidity score: optimum 50%, tolerance 30.
pub fn humidity_score(h: f64) -> f64 {
    linear_score(h, 50.0, 30.0)
}

/// Wind score: optimum 0 km/h, tolerance 70. One-sided — only wind above
/// zero is penalised.
pub fn wind_score(w: f64) -> f64 {
    (1.0 - w / 70.0).clamp(0.0, 1.0)
}

/// Precipitation score: optimum 0 mm, tolerance 5. Exact zero short-circuits
/// to 1.0 per the documented methodology (boundary carve-out).
pub fn precipitation_score(p: f64) -> f64 {
    if p == 0.0 {
        1.0
    } else {
        (1.0 - p / 5.0).clamp(0.0, 1.0)
    }
}

/// Cloud cover score: optimum 0%, tolerance 90.
pub fn cloud_score(c: f64) -> f64 {
    (1.0 - c / 90.0).clamp(0.0, 1.0)
}

/// Whether a local hour-of-day participates in comfort ranking.
pub fn is_daytime(hour: u32) -> bool {
    (DAYTIME_FIRST_HOUR..=DAYTIME_LAST_HOUR).contains(&hour)
}

/// Weighted comfort index for one observation.
///
/// Optional factors (precipitation, wind, cloud) missing from the source
/// are treated as 0 here — and only here; storage keeps them null.
pub fn comfort_index(row: &CleanedHourlyRow, lat: f64) -> f64 {
    let temperature = temperature_score_seasonal(row.temperature_2m, row.month(), lat);
    let humidity = humidity_score(row.relative_humidity_2m);
    let precipitation = precipitation_score(row.precipitation.unwrap_or(0.0));
    let wind = wind_score(row.wind_speed_10m.unwrap_or(0.0));
    let cloud = cloud_score(row.cloud_cover.unwrap_or(0.0));

    WEIGHT_TEMPERATURE * temperature
        + WEIGHT_HUMIDITY * humidity
        + WEIGHT_PRECIPITATION * precipitation
        + WEIGHT_WIND * wind
        + WEIGHT_CLOUD * cloud
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn row(
        time: &str,
        temp: f64,
        hum: f64,
        precip: Option<f64>,
        wind: Option<f64>,
        cloud: Option<f64>,
    ) -> CleanedHourlyRow {
        CleanedHourlyRow {
            time: NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M").unwrap(),
            temperature_2m: temp,
            relative_humidity_2m: hum,
            precipitation: precip,
            wind_speed_10m: wind,
            cloud_cover: cloud,
        }
    }

    #[test]
    fn test_humidity_score_optimum_and_bounds() {
        assert_eq!(humidity_score(50.0), 1.0);
        assert_eq!(humidity_score(20.0), 0.0);
        assert_eq!(humidity_score(80.0), 0.0);
        assert_eq!(humidity_score(100.0), 0.0, "clamped below zero");
    }

    #[test]
    fn test_humidity_score_monotonic_from_optimum() {
        let near = humidity_score(55.0);
        let far = humidity_score(70.0);
        assert!(near > far, "{} vs {}", near, far);
        assert!((0.0..=1.0).contains(&near));
        assert!((0.0..=1.0).contains(&far));
    }

    #[test]
    fn test_wind_score_zero_and_tolerance() {
        assert_eq!(wind_score(0.0), 1.0);
        assert_eq!(wind_score(70.0), 0.0);
        assert_eq!(wind_score(100.0), 0.0);
        assert!((wind_score(35.0) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_precipitation_score_exact_zero_short_circuit() {
        // No floating-point falloff at the boundary
        assert_eq!(precipitation_score(0.0), 1.0);
    }

    #[test]
    fn test_precipitation_score_falloff() {
        assert!((precipitation_score(2.5) - 0.5).abs() < 1e-10);
        assert_eq!(precipitation_score(5.0), 0.0);
        assert_eq!(precipitation_score(12.0), 0.0);
    }

    #[test]
    fn test_cloud_score() {
        assert_eq!(cloud_score(0.0), 1.0);
        assert_eq!(cloud_score(90.0), 0.0);
        assert!((cloud_score(45.0) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_temperature_northern_winter_band() {
        // Latitude 52, January: optimum 10, tolerance 8
        assert_eq!(temperature_score_seasonal(10.0, 1, 52.0), 1.0);
        assert_eq!(temperature_score_seasonal(18.0, 1, 52.0), 0.0);
        assert_eq!(temperature_score_seasonal(2.0, 1, 52.0), 0.0);
    }

    #[test]
    fn test_temperature_northern_summer_band() {
        assert_eq!(temperature_score_seasonal(22.0, 7, 52.0), 1.0);
        assert_eq!(temperature_score_seasonal(32.0, 7, 52.0), 0.0);
    }

    #[test]
    fn test_temperature_shoulder_band() {
        assert_eq!(temperature_score_seasonal(15.0, 4, 52.0), 1.0);
        assert_eq!(temperature_score_seasonal(25.0, 10, 52.0), 0.0);
    }

    #[test]
    fn test_temperature_southern_hemisphere_swaps_seasons() {
        // Latitude -35, January = southern summer: optimum 22, tolerance 10
        assert_eq!(temperature_score_seasonal(22.0, 1, -35.0), 1.0);
        // July = southern winter: optimum 10, tolerance 8
        assert_eq!(temperature_score_seasonal(10.0, 7, -35.0), 1.0);
        assert_eq!(temperature_score_seasonal(18.0, 7, -35.0), 0.0);
    }

    #[test]
    fn test_temperature_monotonically_decreasing_with_distance() {
        let scores: Vec<f64> = [10.0, 12.0, 14.0, 16.0, 18.0]
            .iter()
            .map(|&t| temperature_score_seasonal(t, 1, 52.0))
            .collect();
        for pair in scores.windows(2) {
            assert!(pair[0] >= pair[1], "{:?}", scores);
        }
    }

    #[test]
    fn test_daytime_window_boundaries() {
        assert!(!is_daytime(6));
        assert!(is_daytime(7));
        assert!(is_daytime(22));
        assert!(!is_daytime(23));
        assert!(!is_daytime(0));
    }

    #[test]
    fn test_comfort_index_ideal_conditions() {
        // Every factor at its optimum → index exactly 1.0
        let r = row(
            "2026-01-15T12:00",
            10.0,
            50.0,
            Some(0.0),
            Some(0.0),
            Some(0.0),
        );
        let idx = comfort_index(&r, 52.0);
        assert!((idx - 1.0).abs() < 1e-10, "got {}", idx);
    }

    #[test]
    fn test_comfort_index_worst_conditions() {
        let r = row(
            "2026-01-15T12:00",
            -20.0,
            100.0,
            Some(20.0),
            Some(120.0),
            Some(100.0),
        );
        let idx = comfort_index(&r, 52.0);
        assert!(idx.abs() < 1e-10, "got {}", idx);
    }

    #[test]
    fn test_comfort_index_missing_optionals_score_as_zero_value() {
        // Null precipitation/wind/cloud behave as zero observed for scoring
        let with_zeros = row(
            "2026-01-15T12:00",
            10.0,
            50.0,
            Some(0.0),
            Some(0.0),
            Some(0.0),
        );
        let with_nulls = row("2026-01-15T12:00", 10.0, 50.0, None, None, None);
        assert_eq!(comfort_index(&with_zeros, 52.0), comfort_index(&with_nulls, 52.0));
    }

    #[test]
    fn test_comfort_index_bounded() {
        for temp in [-30.0, 0.0, 15.0, 45.0] {
            for hum in [0.0, 50.0, 100.0] {
                let r = row("2026-06-15T12:00", temp, hum, Some(3.0), Some(40.0), Some(60.0));
                let idx = comfort_index(&r, -35.0);
                assert!((0.0..=1.0).contains(&idx), "index out of range: {}", idx);
            }
        }
    }
}
