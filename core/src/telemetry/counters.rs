// ### `src/telemetry/counters.rs`

//! telemetry/counters.rs
//! Mutable counters collected while a driver pumps an adapter.
//!
//! Summary: Counts operation calls and bytes moved through the cursors.
//! Converted into immutable TelemetrySnapshot at stream end.
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::compression::{EncodeOp, StepReport};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterCounters {
    pub calls_decompress: u64,
    pub calls_compress: u64,
    pub calls_finish: u64,
    /// Steps that moved no bytes at all.
    pub idle_steps: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub stream_ends: u64,
}

impl AdapterCounters {
    /// Record one decode step.
    pub fn record_decompress(&mut self, report: &StepReport) {
        self.calls_decompress += 1;
        self.add_report(report);
    }

    /// Record one encode step.
    pub fn record_compress(&mut self, report: &StepReport, op: EncodeOp) {
        match op {
            EncodeOp::Continue => self.calls_compress += 1,
            EncodeOp::Finish => self.calls_finish += 1,
        }
        self.add_report(report);
    }

    fn add_report(&mut self, report: &StepReport) {
        self.bytes_in += report.consumed as u64;
        self.bytes_out += report.produced as u64;
        if report.is_idle() {
            self.idle_steps += 1;
        }
        if report.stream_end {
            self.stream_ends += 1;
        }
    }

    pub fn total_calls(&self) -> u64 {
        self.calls_decompress + self.calls_compress + self.calls_finish
    }

    // One set of counters per adapter, merged at the end:
    // no locks or atomics inside drivers.
    pub fn merge(&mut self, other: &AdapterCounters) {
        self.calls_decompress += other.calls_decompress;
        self.calls_compress += other.calls_compress;
        self.calls_finish += other.calls_finish;
        self.idle_steps += other.idle_steps;
        self.bytes_in += other.bytes_in;
        self.bytes_out += other.bytes_out;
        self.stream_ends += other.stream_ends;
    }
}

impl AddAssign for AdapterCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
