//! # Forecast Fetching
//!
//! This module performs the single network call for weather data: one HTTP GET
//! against a forecast.io-style API, returning current conditions and the
//! hourly series.
//!
//! ## Data Source
//! - **URL**: `{base}/{api_key}/{lat},{lon}?exclude=minutely,daily,alerts,flags&units=si`
//! - **Units**: SI (°C, m/s, mm/h)
//! - **Format**: JSON with a `currently` block and an `hourly.data` array
//!
//! ## Error Handling
//! - **Non-200 status**: [`WeatherError::FetchFailed`]; the provider answers
//!   403 for a bad key, which the watch shows as a key problem
//! - **Network failures**: [`WeatherError::Http`]
//! - **Malformed body**: [`WeatherError::Json`]
//!
//! There is no retry and no partial-result salvage; one failure ends the cycle.

use crate::{request::Coordinates, RawSample, WeatherError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Blocks the provider should leave out of the response.
const EXCLUDE: &str = "minutely,daily,alerts,flags";

/// Current conditions block of the forecast.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Currently {
    /// Icon name, e.g. `partly-cloudy-day`
    #[serde(default)]
    pub icon: String,
    /// One-line human readable summary
    #[serde(default)]
    pub summary: String,
    /// Air temperature in °C
    #[serde(default)]
    pub temperature: f64,
}

/// Hourly block of the forecast.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Hourly {
    #[serde(default)]
    pub data: Vec<RawSample>,
}

/// Parsed forecast response. Both blocks are optional in the provider's schema.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub currently: Option<Currently>,
    #[serde(default)]
    pub hourly: Option<Hourly>,
}

impl Forecast {
    /// Hourly samples, empty if the block is missing.
    pub fn hourly_samples(&self) -> &[RawSample] {
        self.hourly.as_ref().map(|h| h.data.as_slice()).unwrap_or(&[])
    }
}

/// HTTP client for the forecast API.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: reqwest::Client,
    base_url: String,
}

impl ForecastClient {
    /// Create a client against `base_url` with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing HTTP client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        ForecastClient {
            client,
            base_url: base_url.into(),
        }
    }

    /// Request URL for a key and location.
    pub fn url(&self, api_key: &str, coords: Coordinates) -> String {
        format!(
            "{}/{}/{},{}?exclude={}&units=si",
            self.base_url.trim_end_matches('/'),
            api_key,
            coords.latitude,
            coords.longitude,
            EXCLUDE
        )
    }

    /// Fetch the forecast for a location.
    pub async fn fetch(&self, api_key: &str, coords: Coordinates) -> Result<Forecast, WeatherError> {
        log::info!("Contacting forecast API...");
        let response = self.client.get(self.url(api_key, coords)).send().await?;

        let status = response.status();
        log::debug!("Got API response: {}", status);
        if status != reqwest::StatusCode::OK {
            log::warn!("Error fetching data (HTTP status: {})", status.as_u16());
            return Err(WeatherError::FetchFailed {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_forecast(&body)
    }
}

/// Parse a forecast response body.
pub fn parse_forecast(body: &str) -> Result<Forecast, WeatherError> {
    let forecast: Forecast = serde_json::from_str(body)?;
    log::debug!(
        "Parsed forecast with {} hourly samples",
        forecast.hourly_samples().len()
    );
    Ok(forecast)
}
