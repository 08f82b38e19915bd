//! telemetry/mod.rs
//! Per-adapter counters and immutable snapshots.
//!
//! - Counters are plain integers owned by whoever drives the adapter.
//! - Snapshots are serde-serializable for logs and reports.

pub mod counters;
pub mod snapshot;

pub use counters::*;
pub use snapshot::*;
