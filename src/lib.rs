//! # Glance Weather Core Library
//!
//! This library provides the data structures and the packing pipeline for the
//! glance-weather companion. The companion fetches an hourly forecast from a
//! remote HTTP API, packs it into fixed-size byte batches and forwards them to
//! a wrist-worn display over a narrow message channel.
//!
//! ## Design Philosophy
//!
//! ### Bounded Messages
//! - **Fixed-size batches**: every forecast message carries exactly one day
//!   (24 hourly records of 5 bytes = 120 bytes) plus a one-byte day header
//! - **Lossy quantization**: each reading is squeezed into a single byte, see
//!   [`quantize`]
//! - **Gap tolerant**: hours missing from the provider's series are filled with
//!   all-zero records so the watch can index hours by position
//!
//! ### Data Flow
//! 1. **Gather**: resolve location → fetch forecast → reverse geocode place name
//! 2. **Deliver**: send current conditions → encode hourly series → send each
//!    [`DayBatch`] in day order
//!
//! Every stage that touches the network sits behind a trait in [`pipeline`],
//! so the whole cycle can be exercised in tests with fakes.
//!
//! ## Core Types
//!
//! - [`RawSample`]: one hourly reading as delivered by the provider
//! - [`EncodedRecord`]: the 5-byte quantized form of a reading
//! - [`DayBatch`]: one day of records, the unit of transmission

use serde::{Deserialize, Serialize};

// Module declarations
pub mod conditions;
pub mod config;
pub mod encoder;
pub mod error;
pub mod forecast;
pub mod geocode;
pub mod locate;
pub mod message;
pub mod pipeline;
pub mod quantize;
pub mod renderer;
pub mod request;

#[cfg(test)]
mod tests;

pub use encoder::{encode, DayBatches, SeriesEncoder, TrailingDay};
pub use error::WeatherError;

/// Number of hourly records in one day batch.
pub const HOURS_PER_DAY: usize = 24;

/// Bytes per encoded hourly record.
pub const RECORD_LEN: usize = 5;

/// Payload bytes in one day batch (24 × 5).
pub const BATCH_PAYLOAD_LEN: usize = HOURS_PER_DAY * RECORD_LEN;

/// Seconds between two consecutive hourly samples.
pub const HOUR_SECS: i64 = 3600;

/// A single hourly reading from the forecast provider.
///
/// Field names follow the provider's JSON (`time`, `precipIntensity`, ...).
/// The provider leaves out readings it has no value for (for example
/// `windBearing` in calm air), so every measurement defaults to `0.0`.
///
/// # Example
/// ```
/// use glance_weather::RawSample;
///
/// let json = r#"{"time": 1500000000, "temperature": 12.5, "windSpeed": 3.1}"#;
/// let sample: RawSample = serde_json::from_str(json).unwrap();
///
/// assert_eq!(sample.timestamp, 1_500_000_000);
/// assert_eq!(sample.wind_bearing, 0.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSample {
    /// Seconds since the Unix epoch
    #[serde(rename = "time")]
    pub timestamp: i64,
    /// Precipitation intensity in mm/hour
    #[serde(default)]
    pub precip_intensity: f64,
    /// Probability of precipitation, 0 to 1
    #[serde(default)]
    pub precip_probability: f64,
    /// Air temperature in degrees Celsius
    #[serde(default)]
    pub temperature: f64,
    /// Wind speed in meters/second
    #[serde(default)]
    pub wind_speed: f64,
    /// Direction the wind blows from, degrees clockwise from north
    #[serde(default)]
    pub wind_bearing: f64,
    /// Fraction of sky covered by clouds, 0 to 1
    #[serde(default)]
    pub cloud_cover: f64,
}

impl RawSample {
    /// Sample timestamp as a UTC date-time, if representable.
    pub fn time(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Five quantized bytes describing one hour.
///
/// Byte layout:
/// - `[0]` precipitation intensity (mm/h, rounded up)
/// - `[1]` precipitation probability (× 255)
/// - `[2]` temperature (°C + 50)
/// - `[3]` wind (compass sector + 16 × Beaufort force)
/// - `[4]` cloud cover (× 255)
///
/// See [`quantize`] for the exact rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EncodedRecord(pub [u8; RECORD_LEN]);

impl EncodedRecord {
    /// Filler record used for hours missing from the series.
    pub const ZERO: EncodedRecord = EncodedRecord([0; RECORD_LEN]);

    /// Quantize a raw reading.
    pub fn from_sample(sample: &RawSample) -> Self {
        EncodedRecord([
            quantize::precip_intensity(sample.precip_intensity),
            quantize::unit_fraction(sample.precip_probability),
            quantize::temperature(sample.temperature),
            quantize::wind(sample.wind_speed, sample.wind_bearing),
            quantize::unit_fraction(sample.cloud_cover),
        ])
    }

    pub fn as_bytes(&self) -> &[u8; RECORD_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// One day of hourly records, the unit sent to the device.
///
/// The payload is always exactly [`BATCH_PAYLOAD_LEN`] bytes; the encoder
/// never builds a short batch. On the wire the day index travels as a single
/// header byte ahead of the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayBatch {
    /// Day index, 0 for the first batch of a series
    pub day: u8,
    /// 24 records × 5 bytes
    pub payload: [u8; BATCH_PAYLOAD_LEN],
}

impl DayBatch {
    /// Total length of a framed batch: header byte + payload.
    pub const FRAME_LEN: usize = 1 + BATCH_PAYLOAD_LEN;

    /// Header byte followed by the payload.
    pub fn frame(&self) -> [u8; Self::FRAME_LEN] {
        let mut frame = [0u8; Self::FRAME_LEN];
        frame[0] = self.day;
        frame[1..].copy_from_slice(&self.payload);
        frame
    }

    /// Iterate the 24 hourly records in order.
    pub fn records(&self) -> impl Iterator<Item = EncodedRecord> + '_ {
        self.payload.chunks_exact(RECORD_LEN).map(|chunk| {
            let mut bytes = [0u8; RECORD_LEN];
            bytes.copy_from_slice(chunk);
            EncodedRecord(bytes)
        })
    }
}
