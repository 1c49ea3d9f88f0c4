//! # Hourly Series Encoder
//!
//! Packs an hourly forecast series into [`DayBatch`]es of exactly 24 records.
//!
//! ## Gap Filling
//! The provider's series is conventionally one sample per hour but may skip
//! hours. The encoder tracks the timestamp it expects next; whenever a sample
//! arrives later than that, one all-zero record is inserted per missing hour.
//! A long gap can complete (and flush) one or more batches on its own.
//!
//! ## Batching
//! A batch is flushed the moment its buffer holds 120 bytes. What happens to a
//! trailing partial day once the input runs out is decided by [`TrailingDay`].
//!
//! ## State
//! The encoder holds only the in-progress buffer, the next day index and the
//! next expected timestamp. It performs no I/O and never fails: an empty series
//! yields nothing, and timestamps that go backwards simply skip gap filling.

use crate::{DayBatch, EncodedRecord, RawSample, BATCH_PAYLOAD_LEN, HOUR_SECS};
use serde::{Deserialize, Serialize};
use std::iter::Fuse;

/// What to do with a partial day left over when the series ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingDay {
    /// Discard the partial day; the watch only ever sees complete days.
    #[default]
    Drop,
    /// Pad the partial day with zero records and send it.
    Pad,
}

/// Incremental encoder: feed samples with [`push`](Self::push), close with
/// [`finish`](Self::finish).
///
/// # Example
/// ```
/// use glance_weather::{RawSample, SeriesEncoder, TrailingDay};
///
/// let mut encoder = SeriesEncoder::new(TrailingDay::Drop);
/// let mut batches = Vec::new();
/// for hour in 0..30 {
///     let sample = RawSample { timestamp: hour * 3600, ..Default::default() };
///     batches.extend(encoder.push(&sample));
/// }
/// // 24 hours make one batch, the remaining 6 are dropped
/// assert!(encoder.finish().is_none());
/// assert_eq!(batches.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SeriesEncoder {
    buffer: Vec<u8>,
    /// Index of the next batch to flush; 256 once the header byte is used up
    next_day: u16,
    next_expected: Option<i64>,
    trailing: TrailingDay,
}

impl Default for SeriesEncoder {
    fn default() -> Self {
        Self::new(TrailingDay::default())
    }
}

impl SeriesEncoder {
    /// Highest day index a one-byte header can carry.
    const MAX_DAYS: u16 = u8::MAX as u16 + 1;

    pub fn new(trailing: TrailingDay) -> Self {
        SeriesEncoder {
            buffer: Vec::with_capacity(BATCH_PAYLOAD_LEN),
            next_day: 0,
            next_expected: None,
            trailing,
        }
    }

    /// True once 256 batches have been flushed; further input is ignored.
    pub fn is_exhausted(&self) -> bool {
        self.next_day >= Self::MAX_DAYS
    }

    /// Bytes buffered for the in-progress day.
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Feed one sample, returning every batch it completed (gap fill included).
    pub fn push(&mut self, sample: &RawSample) -> Vec<DayBatch> {
        let mut flushed = Vec::new();
        while let Some(batch) = self.fill_until(sample.timestamp) {
            flushed.push(batch);
        }
        flushed.extend(self.append(sample));
        flushed
    }

    /// Close the series. Returns the padded trailing day under
    /// [`TrailingDay::Pad`], otherwise discards it.
    pub fn finish(&mut self) -> Option<DayBatch> {
        if self.buffer.is_empty() || self.is_exhausted() {
            self.buffer.clear();
            return None;
        }
        match self.trailing {
            TrailingDay::Drop => {
                self.buffer.clear();
                None
            }
            TrailingDay::Pad => {
                self.buffer.resize(BATCH_PAYLOAD_LEN, 0);
                self.take_full()
            }
        }
    }

    /// Insert zero records for the hours before `timestamp`.
    ///
    /// Stops early and returns the batch if one fills up; call again until it
    /// returns `None`.
    fn fill_until(&mut self, timestamp: i64) -> Option<DayBatch> {
        let mut expected = *self.next_expected.get_or_insert(timestamp);
        while expected < timestamp && !self.is_exhausted() {
            self.buffer.extend_from_slice(EncodedRecord::ZERO.as_bytes());
            expected = expected.saturating_add(HOUR_SECS);
            self.next_expected = Some(expected);
            if let Some(batch) = self.take_full() {
                return Some(batch);
            }
        }
        None
    }

    /// Encode the sample itself; returns the batch if it completed one.
    fn append(&mut self, sample: &RawSample) -> Option<DayBatch> {
        if self.is_exhausted() {
            return None;
        }
        self.next_expected = Some(sample.timestamp.saturating_add(HOUR_SECS));
        self.buffer
            .extend_from_slice(EncodedRecord::from_sample(sample).as_bytes());
        self.take_full()
    }

    fn take_full(&mut self) -> Option<DayBatch> {
        if self.buffer.len() < BATCH_PAYLOAD_LEN {
            return None;
        }
        let mut payload = [0u8; BATCH_PAYLOAD_LEN];
        payload.copy_from_slice(&self.buffer[..BATCH_PAYLOAD_LEN]);
        self.buffer.clear();
        let day = self.next_day as u8;
        self.next_day += 1;
        Some(DayBatch { day, payload })
    }
}

/// Lazy iterator of day batches over a sample series.
///
/// Produced by [`encode`]. Pulls samples only as far as needed to produce the
/// next batch, so a long gap never materializes more than one batch at a time.
#[derive(Debug)]
pub struct DayBatches<I: Iterator<Item = RawSample>> {
    samples: Fuse<I>,
    encoder: SeriesEncoder,
    /// Sample whose gap fill flushed a batch before it could be appended
    pending: Option<RawSample>,
    finished: bool,
}

impl<I: Iterator<Item = RawSample>> Iterator for DayBatches<I> {
    type Item = DayBatch;

    fn next(&mut self) -> Option<DayBatch> {
        loop {
            if self.encoder.is_exhausted() {
                return None;
            }
            if self.pending.is_none() {
                self.pending = self.samples.next();
            }
            let Some(sample) = self.pending else {
                if self.finished {
                    return None;
                }
                self.finished = true;
                return self.encoder.finish();
            };
            if let Some(batch) = self.encoder.fill_until(sample.timestamp) {
                return Some(batch);
            }
            self.pending = None;
            if let Some(batch) = self.encoder.append(&sample) {
                return Some(batch);
            }
        }
    }
}

/// Encode a series of hourly samples into day batches.
///
/// One pass, not restartable. Samples are expected in increasing timestamp
/// order; out-of-order samples are encoded where they fall without gap fill.
pub fn encode<I>(samples: I, trailing: TrailingDay) -> DayBatches<I::IntoIter>
where
    I: IntoIterator<Item = RawSample>,
{
    DayBatches {
        samples: samples.into_iter().fuse(),
        encoder: SeriesEncoder::new(trailing),
        pending: None,
        finished: false,
    }
}
