//! ChainRelay metrics definitions.
//!
//! All metrics use OpenTelemetry conventions. Without an installed meter
//! provider they are no-ops.

use chainrelay_core::{ActionError, BroadcastReport, Delivery};
use opentelemetry::{
    global,
    metrics::{Counter, Meter},
    KeyValue,
};

/// Central metrics handle for ChainRelay.
#[derive(Clone)]
pub struct RelayMetrics {
    pub deliveries_sent: Counter<u64>,
    pub deliveries_skipped: Counter<u64>,
    pub deliveries_failed: Counter<u64>,
    pub invocations_aborted: Counter<u64>,
}

impl RelayMetrics {
    pub fn new(meter: &Meter) -> Self {
        Self {
            deliveries_sent: meter
                .u64_counter("chainrelay.deliveries_sent")
                .with_description("Notifications delivered by a sink")
                .build(),
            deliveries_skipped: meter
                .u64_counter("chainrelay.deliveries_skipped")
                .with_description("Broadcasts a sink had nothing to send for")
                .build(),
            deliveries_failed: meter
                .u64_counter("chainrelay.deliveries_failed")
                .with_description("Sink deliveries that returned an error")
                .build(),
            invocations_aborted: meter
                .u64_counter("chainrelay.invocations_aborted")
                .with_description("Invocations that ended before broadcasting")
                .build(),
        }
    }

    /// Metrics on the global meter provider.
    pub fn global() -> Self {
        Self::new(&global::meter("chainrelay"))
    }

    pub fn record_report(&self, action: &str, report: &BroadcastReport) {
        for outcome in &report.outcomes {
            let attrs = [
                KeyValue::new("action", action.to_string()),
                KeyValue::new("sink", outcome.sink.clone()),
            ];
            match &outcome.result {
                Ok(Delivery::Sent) => self.deliveries_sent.add(1, &attrs),
                Ok(Delivery::Skipped) => self.deliveries_skipped.add(1, &attrs),
                Err(_) => self.deliveries_failed.add(1, &attrs),
            }
        }
    }

    pub fn record_aborted(&self, action: &str, error: &ActionError) {
        self.invocations_aborted.add(
            1,
            &[
                KeyValue::new("action", action.to_string()),
                KeyValue::new("kind", error.kind()),
            ],
        );
    }
}
