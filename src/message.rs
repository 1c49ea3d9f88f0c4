//! # Outbound Messages
//!
//! Everything sent to the watch is a flat key/value dictionary. This module
//! defines the typed messages and their dictionary form, and the
//! [`MessageSink`] they are handed to.
//!
//! Delivery is fire-and-forget: there is no acknowledgment and no flow control,
//! and a sink that fails to deliver only logs it.

use crate::{conditions::CurrentConditions, DayBatch};
use serde_json::{json, Map, Value};
use std::io::Write;

/// Watch inbox size; every message must fit.
pub const INBOX_SIZE: usize = 200;

/// A message destined for the watch.
#[derive(Clone, Debug, PartialEq)]
pub enum OutboundMessage {
    /// Companion is up and listening for requests
    Ready,
    /// Current conditions plus the place name
    Current {
        conditions: CurrentConditions,
        name: String,
    },
    /// One day of packed hourly forecast
    Forecast(DayBatch),
    /// Forecast fetch failed, most often because of the API key
    BadKey,
    /// Device position could not be determined
    LocationUnavailable,
}

impl OutboundMessage {
    /// Dictionary form as delivered to the watch.
    pub fn to_dict(&self) -> Map<String, Value> {
        let value = match self {
            OutboundMessage::Ready => json!({ "JSReady": 1 }),
            OutboundMessage::Current { conditions, name } => json!({
                "FIOW_REPLY": 1,
                "FIOW_TEMPK": conditions.temp_k,
                "FIOW_DESCRIPTION": conditions.description,
                "FIOW_DAY": u8::from(conditions.is_day),
                "FIOW_CONDITIONCODE": conditions.condition.code(),
                "FIOW_NAME": name,
            }),
            OutboundMessage::Forecast(batch) => json!({
                "FIOW_FORECAST": 1,
                "FIOW_FORECAST_DAY": batch.day,
                "FIOW_FORECAST_DATA": batch.payload.as_slice(),
            }),
            OutboundMessage::BadKey => json!({ "FIOW_BADKEY": 1 }),
            OutboundMessage::LocationUnavailable => json!({ "FIOW_LOCATIONUNAVAILABLE": 1 }),
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundMessage::Ready => "ready",
            OutboundMessage::Current { .. } => "current",
            OutboundMessage::Forecast(_) => "forecast",
            OutboundMessage::BadKey => "bad-key",
            OutboundMessage::LocationUnavailable => "location-unavailable",
        }
    }
}

/// Fire-and-forget delivery of messages to the watch.
pub trait MessageSink {
    fn send(&mut self, message: &OutboundMessage);
}

/// Sink writing one JSON object per line, for the bridge process on stdout.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        JsonLinesSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> MessageSink for JsonLinesSink<W> {
    fn send(&mut self, message: &OutboundMessage) {
        let line = Value::Object(message.to_dict()).to_string();
        let written = writeln!(self.writer, "{}", line).and_then(|_| self.writer.flush());
        match written {
            Ok(()) => log::debug!("Sent {} message", message.kind()),
            Err(e) => log::warn!("Failed to send {} message: {}", message.kind(), e),
        }
    }
}

/// Sink that keeps every message, for tests and dry runs.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub messages: Vec<OutboundMessage>,
}

impl MessageSink for CollectingSink {
    fn send(&mut self, message: &OutboundMessage) {
        self.messages.push(message.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::ConditionCode;
    use crate::BATCH_PAYLOAD_LEN;

    #[test]
    fn test_forecast_dict() {
        let mut payload = [0u8; BATCH_PAYLOAD_LEN];
        payload[0] = 255;
        let dict = OutboundMessage::Forecast(DayBatch { day: 2, payload }).to_dict();

        assert_eq!(dict["FIOW_FORECAST"], 1);
        assert_eq!(dict["FIOW_FORECAST_DAY"], 2);
        let data = dict["FIOW_FORECAST_DATA"].as_array().unwrap();
        assert_eq!(data.len(), BATCH_PAYLOAD_LEN);
        assert_eq!(data[0], 255);
    }

    #[test]
    fn test_current_dict() {
        let message = OutboundMessage::Current {
            conditions: CurrentConditions {
                temp_k: 288,
                description: "Drizzle".to_string(),
                is_day: true,
                condition: ConditionCode::Rain,
            },
            name: "Bergen".to_string(),
        };
        let dict = message.to_dict();
        assert_eq!(dict["FIOW_REPLY"], 1);
        assert_eq!(dict["FIOW_TEMPK"], 288);
        assert_eq!(dict["FIOW_DAY"], 1);
        assert_eq!(dict["FIOW_CONDITIONCODE"], 5);
        assert_eq!(dict["FIOW_NAME"], "Bergen");
    }

    #[test]
    fn test_json_lines_sink() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.send(&OutboundMessage::Ready);
        sink.send(&OutboundMessage::BadKey);

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines, vec![r#"{"JSReady":1}"#, r#"{"FIOW_BADKEY":1}"#]);
    }

    #[test]
    fn test_forecast_frame_fits_inbox() {
        assert!(DayBatch::FRAME_LEN <= INBOX_SIZE);
    }
}
