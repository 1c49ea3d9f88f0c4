//! # Request Context
//!
//! A fetch cycle starts when the watch sends a request payload. The payload may
//! carry an API key and fixed coordinates; host-side options (from the config
//! file or command line) override both. The result is an immutable
//! [`FetchRequest`] that is passed down the pipeline, so no key or location
//! leaks from one request into the next.

use serde::{Deserialize, Serialize};

/// Scale of the fixed-point coordinates sent by the watch (5 decimal places).
pub const COORDINATE_SCALE: f64 = 100_000.0;

/// A position in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinates {
            latitude,
            longitude,
        }
    }

    /// Decode the watch's fixed-point representation (degrees × 100000).
    pub fn from_fixed_point(latitude: i32, longitude: i32) -> Self {
        Coordinates {
            latitude: latitude as f64 / COORDINATE_SCALE,
            longitude: longitude as f64 / COORDINATE_SCALE,
        }
    }
}

/// Inbound request dictionary as sent by the watch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InboundPayload {
    #[serde(rename = "FIOW_REQUEST", default)]
    pub request: Option<i32>,
    #[serde(rename = "FIOW_APIKEY", default)]
    pub api_key: Option<String>,
    #[serde(rename = "FIOW_LATITUDE", default)]
    pub latitude: Option<i32>,
    #[serde(rename = "FIOW_LONGITUDE", default)]
    pub longitude: Option<i32>,
}

impl InboundPayload {
    /// A bare fetch request with nothing but the request flag.
    pub fn fetch() -> Self {
        InboundPayload {
            request: Some(1),
            ..Default::default()
        }
    }

    pub fn is_request(&self) -> bool {
        self.request.is_some_and(|flag| flag != 0)
    }

    fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates::from_fixed_point(lat, lon)),
            _ => None,
        }
    }
}

/// Host-side overrides, taking precedence over the payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestOptions {
    pub api_key: Option<String>,
    pub location: Option<Coordinates>,
}

/// Where the forecast location comes from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LocationSource {
    /// Coordinates supplied by the user
    Fixed(Coordinates),
    /// Ask the device positioning service
    Device,
}

/// Everything one fetch cycle needs, fixed for the duration of the cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchRequest {
    pub api_key: String,
    pub location: LocationSource,
}

impl FetchRequest {
    /// Build a request from an inbound payload.
    ///
    /// Returns `None` if the payload is not a fetch request.
    pub fn from_payload(payload: &InboundPayload, options: &RequestOptions) -> Option<Self> {
        if !payload.is_request() {
            log::warn!("Ignoring unexpected payload without a request flag");
            return None;
        }

        let api_key = options
            .api_key
            .clone()
            .or_else(|| payload.api_key.clone())
            .unwrap_or_default();

        let location = match options.location.or_else(|| payload.coordinates()) {
            Some(coords) => {
                log::debug!("Using user defined location {:?}", coords);
                LocationSource::Fixed(coords)
            }
            None => LocationSource::Device,
        };

        Some(FetchRequest { api_key, location })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_point_coordinates() {
        let coords = Coordinates::from_fixed_point(4_212_345, -1_235_478);
        assert!((coords.latitude - 42.12345).abs() < 1e-9);
        assert!((coords.longitude - -12.35478).abs() < 1e-9);
    }

    #[test]
    fn test_payload_parsing() {
        let json = r#"{"FIOW_REQUEST": 1, "FIOW_APIKEY": "abc", "FIOW_LATITUDE": 5150000, "FIOW_LONGITUDE": -12000}"#;
        let payload: InboundPayload = serde_json::from_str(json).unwrap();
        assert!(payload.is_request());

        let request = FetchRequest::from_payload(&payload, &RequestOptions::default()).unwrap();
        assert_eq!(request.api_key, "abc");
        assert_eq!(
            request.location,
            LocationSource::Fixed(Coordinates::new(51.5, -0.12))
        );
    }

    #[test]
    fn test_options_override_payload() {
        let payload: InboundPayload =
            serde_json::from_str(r#"{"FIOW_REQUEST": 1, "FIOW_APIKEY": "watch-key"}"#).unwrap();
        let options = RequestOptions {
            api_key: Some("host-key".to_string()),
            location: Some(Coordinates::new(1.0, 2.0)),
        };

        let request = FetchRequest::from_payload(&payload, &options).unwrap();
        assert_eq!(request.api_key, "host-key");
        assert_eq!(
            request.location,
            LocationSource::Fixed(Coordinates::new(1.0, 2.0))
        );
    }

    #[test]
    fn test_half_coordinates_fall_back_to_device() {
        let payload: InboundPayload =
            serde_json::from_str(r#"{"FIOW_REQUEST": 1, "FIOW_LATITUDE": 100}"#).unwrap();
        let request = FetchRequest::from_payload(&payload, &RequestOptions::default()).unwrap();
        assert_eq!(request.location, LocationSource::Device);
        assert_eq!(request.api_key, "");
    }

    #[test]
    fn test_non_request_is_ignored() {
        let payload: InboundPayload = serde_json::from_str(r#"{"FIOW_APIKEY": "abc"}"#).unwrap();
        assert!(FetchRequest::from_payload(&payload, &RequestOptions::default()).is_none());
    }
}
