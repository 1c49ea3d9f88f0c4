//! Device positioning for requests that carry no fixed coordinates.
//!
//! The host has no GPS, so the position is auto-discovered from the public IP
//! address. Any failure is reported as [`WeatherError::LocationUnavailable`];
//! there is no fallback location.

use crate::{request::Coordinates, WeatherError};
use serde::Deserialize;
use std::time::Duration;

/// How long positioning may take before the request is abandoned.
pub const LOCATE_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct IpLocation {
    #[serde(default)]
    status: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Extract coordinates from an ip-api style JSON body.
pub fn parse_ip_location(body: &str) -> Result<Coordinates, WeatherError> {
    let location: IpLocation = serde_json::from_str(body)
        .map_err(|e| WeatherError::LocationUnavailable(format!("bad response: {e}")))?;

    if location.status.as_deref().is_some_and(|s| s != "success") {
        return Err(WeatherError::LocationUnavailable(
            "lookup was not successful".to_string(),
        ));
    }

    match (location.lat, location.lon) {
        (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
        _ => Err(WeatherError::LocationUnavailable(
            "response has no coordinates".to_string(),
        )),
    }
}

/// IP address based locator.
#[derive(Debug, Clone)]
pub struct IpLocator {
    client: reqwest::Client,
    url: String,
}

impl IpLocator {
    pub fn new(url: impl Into<String>) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder().timeout(LOCATE_TIMEOUT).build()?;
        Ok(IpLocator {
            client,
            url: url.into(),
        })
    }

    pub async fn locate(&self) -> Result<Coordinates, WeatherError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| WeatherError::LocationUnavailable(e.to_string()))?;
        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::LocationUnavailable(e.to_string()))?;
        let coords = parse_ip_location(&body)?;
        log::info!(
            "Location success: ({:.4}, {:.4})",
            coords.latitude,
            coords.longitude
        );
        Ok(coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ip_location() {
        let body = r#"{"status": "success", "city": "Oslo", "lat": 59.91, "lon": 10.75}"#;
        assert_eq!(parse_ip_location(body).unwrap(), Coordinates::new(59.91, 10.75));
    }

    #[test]
    fn test_failed_lookup_is_location_unavailable() {
        let body = r#"{"status": "fail", "message": "private range"}"#;
        assert!(matches!(
            parse_ip_location(body),
            Err(WeatherError::LocationUnavailable(_))
        ));
        assert!(matches!(
            parse_ip_location("not json"),
            Err(WeatherError::LocationUnavailable(_))
        ));
    }
}
