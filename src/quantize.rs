//! # Byte Quantization
//!
//! Every hourly reading is squeezed into one byte before it goes over the
//! message channel. The rules are lossy but deterministic, and they saturate
//! instead of wrapping: a reading beyond the encodable range lands on 0 or 255.
//! Non-finite input (NaN) quantizes to 0.
//!
//! | Field                  | Rule                         | Range            |
//! |------------------------|------------------------------|------------------|
//! | precipitation mm/h     | `ceil(x)`                    | 0 – 255 mm/h     |
//! | probability, cloud     | `floor(x × 255)`             | 0.0 – 1.0        |
//! | temperature °C         | `round(x + 50)`              | −50 – +205 °C    |
//! | wind                   | `sector + 16 × beaufort`     | 16 × 13 codes    |

/// Offset added to °C so sub-zero temperatures fit in an unsigned byte.
pub const TEMPERATURE_OFFSET_C: f64 = 50.0;

/// Width of one compass sector in degrees (16 sectors).
pub const SECTOR_DEG: f64 = 22.5;

/// Number of compass sectors.
pub const SECTORS: i64 = 16;

/// Lower bound (m/s) of Beaufort forces 1 through 12.
///
/// A speed equal to a bound belongs to the higher force.
pub const BEAUFORT_BOUNDS_MS: [f64; 12] = [
    0.3, 1.6, 3.4, 5.5, 8.0, 10.8, 13.9, 17.2, 20.8, 24.5, 28.5, 32.7,
];

/// Clamp to the byte range and truncate. NaN becomes 0.
fn saturate(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0) as u8
}

/// Precipitation intensity in mm/h, rounded up so any drizzle reads as 1.
pub fn precip_intensity(mm_per_hour: f64) -> u8 {
    saturate(mm_per_hour.ceil())
}

/// A 0–1 fraction (probability, cloud cover) scaled to 0–255.
pub fn unit_fraction(fraction: f64) -> u8 {
    saturate((fraction * 255.0).floor())
}

/// Temperature in °C, offset by 50 and rounded.
pub fn temperature(celsius: f64) -> u8 {
    saturate((celsius + TEMPERATURE_OFFSET_C).round())
}

/// Compass sector 0–15 for a bearing in degrees, 0 = north.
///
/// Bearings just short of 360° round up into sector 0. Negative bearings wrap.
pub fn bearing_sector(bearing_deg: f64) -> u8 {
    if !bearing_deg.is_finite() {
        return 0;
    }
    ((bearing_deg / SECTOR_DEG).round() as i64).rem_euclid(SECTORS) as u8
}

/// Beaufort force 0–12 for a wind speed in m/s.
///
/// Total over all inputs: negative or NaN speeds read as calm, anything at or
/// above 32.7 m/s is force 12.
pub fn beaufort_from_ms(speed_ms: f64) -> u8 {
    BEAUFORT_BOUNDS_MS
        .iter()
        .take_while(|&&bound| speed_ms >= bound)
        .count() as u8
}

/// Packed wind byte: low nibble is the compass sector, high bits the force.
pub fn wind(speed_ms: f64, bearing_deg: f64) -> u8 {
    bearing_sector(bearing_deg) + 16 * beaufort_from_ms(speed_ms)
}
