//! Errors surfaced by the fetch side of the pipeline.
//!
//! The encoder never fails; only network collaborators do. Each variant is
//! reported to the device once (see [`crate::pipeline`]) and never retried.

use thiserror::Error;

/// Errors that can occur while gathering weather for a request.
#[derive(Error, Debug)]
pub enum WeatherError {
    /// The provider answered with a non-200 status (usually a bad API key)
    #[error("fetch failed with HTTP status {status}")]
    FetchFailed { status: u16 },

    /// HTTP request failed (network, TLS or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the JSON we expected
    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),

    /// Device position could not be determined
    #[error("location unavailable: {0}")]
    LocationUnavailable(String),
}

impl WeatherError {
    /// True for failures on the forecast fetch itself, as opposed to location.
    pub fn is_fetch_failure(&self) -> bool {
        !matches!(self, WeatherError::LocationUnavailable(_))
    }
}
