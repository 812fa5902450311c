//! # chainrelay-observability
//!
//! OpenTelemetry counters and `tracing` subscriber setup for ChainRelay.
//!
//! ## Built-in metrics
//! - `chainrelay.deliveries_sent`     counter, tagged with action + sink
//! - `chainrelay.deliveries_skipped`  counter, tagged with action + sink
//! - `chainrelay.deliveries_failed`   counter, tagged with action + sink
//! - `chainrelay.invocations_aborted` counter, tagged with action + error kind
//!
//! ## Structured logging
//! Text or JSON logs, with levels configurable per component.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::RelayMetrics;
pub use tracing_setup::{init_tracing, try_init_tracing, LogConfig};
