//! src/telemetry/snapshot.rs
//!
//! Immutable summary of one driven stream.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::compression::{CompressionCodec, Direction};
use crate::telemetry::counters::AdapterCounters;

/// Captures counters, ratio, throughput and elapsed duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub codec: CompressionCodec,
    pub direction: Direction,
    pub counters: AdapterCounters,
    /// Compressed bytes / plain bytes (0.0 when nothing was plain).
    pub compression_ratio: f64,
    pub throughput_bytes_per_sec: f64,
    pub elapsed: Duration,
}

impl TelemetrySnapshot {
    pub fn from(codec: CompressionCodec, direction: Direction, counters: &AdapterCounters, elapsed: Duration) -> Self {
        let (plain, compressed) = match direction {
            Direction::Encode => (counters.bytes_in, counters.bytes_out),
            Direction::Decode => (counters.bytes_out, counters.bytes_in),
        };

        let compression_ratio = if plain > 0 {
            compressed as f64 / plain as f64
        } else {
            0.0
        };

        let throughput_bytes_per_sec = if elapsed.as_secs_f64() > 0.0 {
            plain as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            codec,
            direction,
            counters: counters.clone(),
            compression_ratio,
            throughput_bytes_per_sec,
            elapsed,
        }
    }

    pub fn input_bytes(&self) -> u64 {
        self.counters.bytes_in
    }

    pub fn output_bytes(&self) -> u64 {
        self.counters.bytes_out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
