//! Reverse geocoding: coordinates to a short place name for the watch face.
//!
//! Uses a Nominatim-style `reverse?format=json` endpoint. The most local name
//! available wins: village, then town, city, county. No match gives an empty
//! name rather than an error.

use crate::{request::Coordinates, WeatherError};
use serde::Deserialize;
use std::time::Duration;

/// Nominatim asks clients to identify themselves.
const USER_AGENT: &str = concat!("glance-weather/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Default, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Address,
}

#[derive(Debug, Default, Deserialize)]
struct Address {
    village: Option<String>,
    town: Option<String>,
    city: Option<String>,
    county: Option<String>,
}

impl Address {
    fn place_name(self) -> String {
        self.village
            .or(self.town)
            .or(self.city)
            .or(self.county)
            .unwrap_or_default()
    }
}

/// Extract the place name from a reverse geocoding response body.
pub fn parse_place_name(body: &str) -> Result<String, WeatherError> {
    let response: ReverseResponse = serde_json::from_str(body)?;
    Ok(response.address.place_name())
}

/// HTTP client for the reverse geocoding service.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeocodeClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(GeocodeClient {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn url(&self, coords: Coordinates) -> String {
        format!(
            "{}?format=json&lat={}&lon={}",
            self.base_url, coords.latitude, coords.longitude
        )
    }

    /// Look up the place name for a location.
    pub async fn place_name(&self, coords: Coordinates) -> Result<String, WeatherError> {
        let response = self.client.get(self.url(coords)).send().await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(WeatherError::FetchFailed {
                status: status.as_u16(),
            });
        }
        parse_place_name(&response.text().await?)
    }
}
