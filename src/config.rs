//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! glance-weather.toml file. It provides a centralized way to configure the
//! API key, service endpoints, a fixed location and the encoder's handling of a
//! trailing partial day.

use crate::{
    encoder::TrailingDay,
    request::{Coordinates, RequestOptions},
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "glance-weather.toml";

/// Application configuration loaded from glance-weather.toml
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Remote service configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Fixed location, overriding device positioning
    #[serde(default)]
    pub location: LocationConfig,
    /// Series encoder configuration
    #[serde(default)]
    pub encoder: EncoderConfig,
}

/// Remote service configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Forecast API key; empty means "use the key sent by the watch"
    pub key: String,
    /// Forecast endpoint, the key and coordinates are appended as path segments
    pub forecast_url: String,
    /// Reverse geocoding endpoint
    pub geocode_url: String,
    /// IP positioning endpoint used when no location is fixed
    pub locate_url: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

/// Fixed location; both values must be set to take effect
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Series encoder configuration
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// "drop" discards a trailing partial day, "pad" zero-fills and sends it
    pub trailing_day: TrailingDay,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            key: String::new(),
            forecast_url: "https://api.forecast.io/forecast".to_string(),
            geocode_url: "https://nominatim.openstreetmap.org/reverse".to_string(),
            locate_url: "http://ip-api.com/json".to_string(),
            timeout_secs: 15,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl LocationConfig {
    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.latitude?, self.longitude?))
    }
}

impl Config {
    /// Load configuration from glance-weather.toml file
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    log::info!("Loaded configuration from {}", path.as_ref().display());
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config file format: {}", e);
                    log::warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config file found, using default configuration");
                Self::default()
            }
        }
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        log::info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Host-side request overrides derived from this configuration.
    pub fn request_options(&self) -> RequestOptions {
        RequestOptions {
            api_key: Some(self.api.key.clone()).filter(|key| !key.is_empty()),
            location: self.location.coordinates(),
        }
    }
}
