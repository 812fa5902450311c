//! Fan-out registry: one payload in, one delivery attempt per registered sink.

use futures::future::join_all;
use indexmap::IndexMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

use crate::error::DeliveryError;
use crate::payload::{DeliveryHints, Notification, NotificationPayload};
use crate::sink::{Delivery, NotificationSink};

/// Outcome of one sink's delivery attempt.
#[derive(Debug)]
pub struct SinkOutcome {
    pub sink: String,
    pub result: Result<Delivery, DeliveryError>,
}

/// Per-sink outcomes of a single broadcast.
#[derive(Debug, Default)]
pub struct BroadcastReport {
    pub outcomes: Vec<SinkOutcome>,
}

impl BroadcastReport {
    pub fn sent(&self) -> usize {
        self.count(|r| matches!(r, Ok(Delivery::Sent)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|r| matches!(r, Ok(Delivery::Skipped)))
    }

    pub fn failed(&self) -> usize {
        self.count(|r| r.is_err())
    }

    /// Outcome for a given sink id, if that sink was registered.
    pub fn outcome(&self, sink: &str) -> Option<&Result<Delivery, DeliveryError>> {
        self.outcomes
            .iter()
            .find(|o| o.sink == sink)
            .map(|o| &o.result)
    }

    /// Fold another report into this one (used for batch flows).
    pub fn merge(&mut self, other: BroadcastReport) {
        self.outcomes.extend(other.outcomes);
    }

    fn count(&self, pred: impl Fn(&Result<Delivery, DeliveryError>) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.result)).count()
    }
}

/// Registry of sinks keyed by identifier.
///
/// Registration is idempotent: the first sink registered under an id wins
/// and later registrations with the same id are ignored. The registry is
/// expected to be mutated only during initialisation and read on every
/// broadcast.
#[derive(Default)]
pub struct Dispatcher {
    sinks: RwLock<IndexMap<String, Arc<dyn NotificationSink>>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink. Returns `true` if it was added, `false` if a sink
    /// with the same id is already present.
    pub fn register(&self, sink: Arc<dyn NotificationSink>) -> bool {
        let mut sinks = self.sinks.write().unwrap_or_else(PoisonError::into_inner);
        let id = sink.id().to_string();
        if sinks.contains_key(&id) {
            debug!(sink = %id, "sink already registered");
            return false;
        }
        debug!(sink = %id, "sink registered");
        sinks.insert(id, sink);
        true
    }

    pub fn len(&self) -> usize {
        self.sinks.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sink_ids(&self) -> Vec<String> {
        self.sinks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Deliver `payload` to every registered sink concurrently.
    ///
    /// Each sink runs on its own task, so an error or panic in one sink never
    /// stops the others. Failures are logged and returned in the report; this
    /// method itself never fails.
    pub async fn broadcast(
        &self,
        payload: &NotificationPayload,
        hints: &DeliveryHints,
    ) -> BroadcastReport {
        let sinks: Vec<Arc<dyn NotificationSink>> = self
            .sinks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        let payload = Arc::new(payload.clone());
        let hints = Arc::new(hints.clone());

        let (ids, tasks): (Vec<String>, Vec<_>) = sinks
            .into_iter()
            .map(|sink| {
                let id = sink.id().to_string();
                let payload = Arc::clone(&payload);
                let hints = Arc::clone(&hints);
                let task = tokio::spawn(async move { sink.deliver(&payload, &hints).await });
                (id, task)
            })
            .unzip();

        let joined = join_all(tasks).await;

        let outcomes = ids
            .into_iter()
            .zip(joined)
            .map(|(sink, joined)| {
                let result = joined.unwrap_or_else(|e| {
                    Err(DeliveryError::Panicked {
                        reason: e.to_string(),
                    })
                });
                match &result {
                    Ok(delivery) => debug!(sink = %sink, ?delivery, "sink finished"),
                    Err(e) => warn!(sink = %sink, error = %e, "sink delivery failed"),
                }
                SinkOutcome { sink, result }
            })
            .collect();

        BroadcastReport { outcomes }
    }

    /// Broadcast a sequence of notifications, one after another.
    pub async fn broadcast_all(&self, notifications: &[Notification]) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        for n in notifications {
            report.merge(self.broadcast(&n.payload, &n.hints).await);
        }
        report
    }
}
