//! Open-Meteo forecast client.
//!
//! Fetches hourly forecasts for one location at a time.
//! See: https://open-meteo.com/en/docs
//!
//! Transport failures and HTTP 429/500/502/503/504 are retried with
//! exponential backoff; any other error status fails immediately. A fetch
//! either returns the full raw payload or a `Fetch` error naming the city —
//! never partial or empty data.

use std::time::Duration;

use crate::capitals::Capital;
use crate::errors::AppError;

/// Hourly variables requested from the forecast endpoint.
const HOURLY_VARIABLES: &str =
    "temperature_2m,relative_humidity_2m,precipitation,wind_speed_10m,cloud_cover";

/// Statuses worth retrying: rate limiting and transient upstream failures.
const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Maximum retries after the initial attempt.
const MAX_RETRIES: u32 = 3;

/// Backoff before the first retry; doubles each attempt (1s, 2s, 4s).
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Per-attempt request timeout.
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(60);

/// Valid forecast window in days.
pub const MIN_FORECAST_DAYS: u8 = 1;
pub const MAX_FORECAST_DAYS: u8 = 16;

/// Client for the Open-Meteo forecast API.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
    retry_base_delay: Duration,
}

enum AttemptError {
    /// Transport failure or retryable status — try again after backoff.
    Retryable(String),
    /// Non-retryable status or undecodable body — surface immediately.
    Fatal(String),
}

impl OpenMeteoClient {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(ATTEMPT_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            base_url: base_url.to_string(),
            retry_base_delay: RETRY_BASE_DELAY,
        }
    }

    /// Override the backoff base delay (tests shrink it to milliseconds).
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Fetch one city's hourly forecast as the raw JSON payload.
    ///
    /// `days` outside [1,16] is rejected before any network call.
    pub async fn fetch_hourly(
        &self,
        capital: &Capital,
        days: u8,
    ) -> Result<serde_json::Value, AppError> {
        if !(MIN_FORECAST_DAYS..=MAX_FORECAST_DAYS).contains(&days) {
            return Err(AppError::Configuration(format!(
                "forecast_days must be between {} and {}, got {}",
                MIN_FORECAST_DAYS, MAX_FORECAST_DAYS, days
            )));
        }

        let mut delay = self.retry_base_delay;
        let mut attempt = 0u32;

        loop {
            match self.try_fetch(capital, days).await {
                Ok(payload) => return Ok(payload),
                Err(AttemptError::Retryable(reason)) if attempt < MAX_RETRIES => {
                    attempt += 1;
                    tracing::warn!(
                        "Fetch attempt {}/{} for {} failed ({}), retrying in {:?}",
                        attempt,
                        MAX_RETRIES,
                        capital.city,
                        reason,
                        delay,
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(AttemptError::Retryable(reason)) => {
                    return Err(AppError::Fetch {
                        city: capital.city.to_string(),
                        reason: format!("retries exhausted: {}", reason),
                    });
                }
                Err(AttemptError::Fatal(reason)) => {
                    return Err(AppError::Fetch {
                        city: capital.city.to_string(),
                        reason,
                    });
                }
            }
        }
    }

    async fn try_fetch(
        &self,
        capital: &Capital,
        days: u8,
    ) -> Result<serde_json::Value, AttemptError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", capital.lat.to_string()),
                ("longitude", capital.lon.to_string()),
                ("hourly", HOURLY_VARIABLES.to_string()),
                ("forecast_days", days.to_string()),
                ("timezone", capital.tz.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AttemptError::Retryable(format!("request failed: {}", e)))?;

        let status = response.status();
        if RETRYABLE_STATUSES.contains(&status.as_u16()) {
            return Err(AttemptError::Retryable(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            return Err(AttemptError::Fatal(format!("HTTP {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| AttemptError::Fatal(format!("JSON parse error: {}", e)))
    }
}
