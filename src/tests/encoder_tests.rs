//! # Series Encoder Test Suite
//!
//! This module checks the invariants of the day-batch encoding over whole
//! series: batch sizes, day numbering, gap filling and the byte layout of a
//! single record. Tests are deterministic and need no network.

use crate::quantize::beaufort_from_ms;
use crate::{
    encode, DayBatch, EncodedRecord, RawSample, SeriesEncoder, TrailingDay, BATCH_PAYLOAD_LEN,
    HOUR_SECS,
};

/// Start of every generated series (2017-07-14 02:40 UTC).
const T0: i64 = 1_500_000_000;

/// A sample that never quantizes to the all-zero record.
fn sample_at(hour: i64) -> RawSample {
    RawSample {
        timestamp: T0 + hour * HOUR_SECS,
        precip_intensity: 0.2,
        precip_probability: 0.3,
        temperature: 12.0 + (hour % 7) as f64,
        wind_speed: 5.0,
        wind_bearing: (hour * 40 % 360) as f64,
        cloud_cover: 0.6,
    }
}

fn series(hours: &[i64]) -> Vec<RawSample> {
    hours.iter().map(|&h| sample_at(h)).collect()
}

fn zero_records(batches: &[DayBatch]) -> usize {
    batches
        .iter()
        .flat_map(|b| b.records())
        .filter(|r| r.is_zero())
        .count()
}

/// Every emitted payload is a full day, and day indices count up from zero.
#[test]
fn batches_are_full_and_numbered_in_order() {
    let irregular = series(&[0, 1, 3, 4, 9, 10, 11, 30, 31, 32, 33, 80, 81]);

    for trailing in [TrailingDay::Drop, TrailingDay::Pad] {
        let batches: Vec<_> = encode(irregular.clone(), trailing).collect();
        assert!(!batches.is_empty());

        let total: usize = batches.iter().map(|b| b.payload.len()).sum();
        assert_eq!(total % BATCH_PAYLOAD_LEN, 0);

        for (i, batch) in batches.iter().enumerate() {
            assert_eq!(batch.day as usize, i, "day indices must be 0, 1, 2, ...");
            assert_eq!(batch.frame().len(), 121);
            assert_eq!(batch.frame()[0], batch.day);
        }
    }
}

/// A gapless series of whole days contains only real records.
#[test]
fn gapless_whole_days_have_no_filler() {
    let hours: Vec<i64> = (0..72).collect();
    let batches: Vec<_> = encode(series(&hours), TrailingDay::Drop).collect();

    assert_eq!(batches.len(), 3);
    assert_eq!(zero_records(&batches), 0);
}

/// One missing hour becomes exactly one zero record, in its slot.
#[test]
fn single_missing_hour_inserts_one_zero_record() {
    let hours: Vec<i64> = (0..25).filter(|&h| h != 5).collect();
    let batches: Vec<_> = encode(series(&hours), TrailingDay::Drop).collect();

    assert_eq!(batches.len(), 1);
    let records: Vec<_> = batches[0].records().collect();
    assert!(records[5].is_zero());
    assert!(!records[4].is_zero());
    assert!(!records[6].is_zero());
    assert_eq!(zero_records(&batches), 1);
}

/// Samples that arrive half an hour late still only fill whole missing hours.
#[test]
fn off_grid_gap_fills_by_whole_hours() {
    let mut samples = series(&[0, 1]);
    let mut late = sample_at(2);
    late.timestamp += HOUR_SECS / 2;
    samples.push(late);

    let mut encoder = SeriesEncoder::new(TrailingDay::Drop);
    for sample in &samples {
        assert!(encoder.push(sample).is_empty());
    }
    // Two real records, one filler for hour 2, then the late sample
    assert_eq!(encoder.pending_len(), 4 * 5);
}

/// The empty series is a boundary case, not an error.
#[test]
fn empty_series_produces_nothing() {
    assert_eq!(encode(Vec::new(), TrailingDay::Drop).count(), 0);
    assert_eq!(encode(Vec::new(), TrailingDay::Pad).count(), 0);

    let mut encoder = SeriesEncoder::default();
    assert!(encoder.finish().is_none());
}

/// A single sample is a partial day: dropped by default, padded on request.
#[test]
fn single_sample_is_a_partial_day() {
    assert_eq!(encode(series(&[0]), TrailingDay::Drop).count(), 0);

    let padded: Vec<_> = encode(series(&[0]), TrailingDay::Pad).collect();
    assert_eq!(padded.len(), 1);
    assert_eq!(zero_records(&padded), 23);
}

/// Trailing partial day handling after complete days.
#[test]
fn trailing_partial_day_follows_policy() {
    let hours: Vec<i64> = (0..30).collect();
    assert_eq!(encode(series(&hours), TrailingDay::Drop).count(), 1);

    let padded: Vec<_> = encode(series(&hours), TrailingDay::Pad).collect();
    assert_eq!(padded.len(), 2);
    assert_eq!(padded[1].day, 1);
    assert_eq!(zero_records(&padded), 18);
}

/// Duplicate and backwards timestamps are a caller error but must not panic.
#[test]
fn unordered_timestamps_do_not_panic() {
    let samples = series(&[5, 5, 4, 3, 10, 2, 40, 1]);
    let batches: Vec<_> = encode(samples, TrailingDay::Pad).collect();
    for (i, batch) in batches.iter().enumerate() {
        assert_eq!(batch.day as usize, i);
    }
}

/// The reference record: heavy rain, a coin-flip chance, mild, breezy, few clouds.
#[test]
fn reference_sample_encodes_to_expected_bytes() {
    let sample = RawSample {
        timestamp: T0,
        precip_intensity: 300.0,
        precip_probability: 0.5,
        temperature: 10.88,
        wind_speed: 4.22,
        wind_bearing: 236.0,
        cloud_cover: 0.27,
    };

    let wind = 10 + 16 * beaufort_from_ms(4.22);
    assert_eq!(
        EncodedRecord::from_sample(&sample),
        EncodedRecord([255, 127, 61, wind, 68])
    );
    // 4.22 m/s sits between 3.4 and 5.5, a gentle breeze
    assert_eq!(wind, 58);
}

/// Records land in the payload in hour order, five bytes each.
#[test]
fn payload_preserves_hour_order() {
    let hours: Vec<i64> = (0..24).collect();
    let samples = series(&hours);
    let batch = encode(samples.clone(), TrailingDay::Drop)
        .next()
        .expect("one full day");

    for (record, sample) in batch.records().zip(&samples) {
        assert_eq!(record, EncodedRecord::from_sample(sample));
    }
}
