/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Directory where raw and cleaned weather JSON files are written.
    pub data_dir: String,
    /// Forecast window requested from Open-Meteo, in days (1–16).
    pub forecast_days: u8,
    /// Interval between background refresh cycles, in seconds.
    pub refresh_interval_secs: u64,
    /// Base URL of the Open-Meteo forecast endpoint (overridable for tests).
    pub open_meteo_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a valid u16"),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "./weather_data".to_string()),
            forecast_days: std::env::var("FORECAST_DAYS")
                .unwrap_or_else(|_| "16".to_string())
                .parse()
                .expect("FORECAST_DAYS must be a valid u8"),
            refresh_interval_secs: std::env::var("REFRESH_INTERVAL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .expect("REFRESH_INTERVAL_SECS must be a valid u64"),
            open_meteo_url: std::env::var("OPEN_METEO_URL")
                .unwrap_or_else(|_| "https://api.open-meteo.com/v1/forecast".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        // NOTE: set_var/remove_var in tests is unsafe in multi-threaded contexts
        // (Rust may run tests in parallel). This test only exercises the
        // default-value logic; cargo test runs this module's tests sequentially
        // within one test binary, so we accept the risk.
        unsafe {
            std::env::remove_var("PORT");
            std::env::remove_var("DATA_DIR");
            std::env::remove_var("FORECAST_DAYS");
            std::env::remove_var("REFRESH_INTERVAL_SECS");
            std::env::remove_var("OPEN_METEO_URL");
        }

        let config = AppConfig::from_env();

        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, "./weather_data");
        assert_eq!(config.forecast_days, 16);
        assert_eq!(config.refresh_interval_secs, 3600);
        assert!(config.open_meteo_url.contains("open-meteo.com"));
    }
}
