//! # Day Batch Text Rendering
//!
//! Development-mode view of what the watch receives: each [`DayBatch`] is
//! decoded back into approximate readings and laid out as an ASCII table, one
//! row per hour. Filler hours (all-zero records) are marked so gaps in the
//! provider's series are easy to spot.

use crate::{quantize::TEMPERATURE_OFFSET_C, DayBatch, EncodedRecord};
use std::fmt::Write;

/// Compass point names for the 16 wind sectors, clockwise from north.
const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Approximate readings recovered from an encoded record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecodedHour {
    /// Upper bound of precipitation intensity, mm/h
    pub precip_mm: u8,
    /// Precipitation probability in percent
    pub precip_pct: u8,
    pub temperature_c: i16,
    /// Compass sector 0-15
    pub wind_sector: u8,
    /// Beaufort force 0-12
    pub beaufort: u8,
    /// Cloud cover in percent
    pub cloud_pct: u8,
}

fn percent(byte: u8) -> u8 {
    ((byte as u16 * 100 + 127) / 255) as u8
}

impl DecodedHour {
    pub fn decode(record: &EncodedRecord) -> Self {
        let [precip, probability, temperature, wind, cloud] = record.0;
        DecodedHour {
            precip_mm: precip,
            precip_pct: percent(probability),
            temperature_c: temperature as i16 - TEMPERATURE_OFFSET_C as i16,
            wind_sector: wind % 16,
            beaufort: wind / 16,
            cloud_pct: percent(cloud),
        }
    }

    pub fn compass(&self) -> &'static str {
        COMPASS[(self.wind_sector % 16) as usize]
    }
}

/// Render one batch as a text table.
pub fn format_batch(batch: &DayBatch) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Day {}", batch.day);
    let _ = writeln!(out, "hour  rain  pop  temp  wind      cloud");

    for (hour, record) in batch.records().enumerate() {
        if record.is_zero() {
            let _ = writeln!(out, "{:>4}  --    --   --    --        --   (gap)", hour);
            continue;
        }
        let h = DecodedHour::decode(&record);
        let _ = writeln!(
            out,
            "{:>4}  {:>3}  {:>3}%  {:>4}  {:<3} F{:<2}   {:>3}%",
            hour,
            h.precip_mm,
            h.precip_pct,
            h.temperature_c,
            h.compass(),
            h.beaufort,
            h.cloud_pct
        );
    }
    out
}

/// Print a batch table to stderr, keeping stdout free for messages.
pub fn draw_ascii(batch: &DayBatch) {
    eprintln!("{}", format_batch(batch));
}
