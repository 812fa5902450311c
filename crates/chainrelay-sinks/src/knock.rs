//! Knock workflow sink.
//!
//! Triggers `POST {base}/v1/workflows/{key}/trigger` for the fixed
//! `webhook-users/tenderly` recipient. The workflow key is taken from the
//! payload when set, otherwise from the network.

use async_trait::async_trait;
use chainrelay_core::{
    Delivery, DeliveryError, DeliveryHints, Network, NotificationPayload, NotificationSink,
};
use serde_json::json;
use std::sync::{Arc, OnceLock};
use tracing::debug;

use crate::transport::{ensure_success, HttpRequest, HttpTransport};

pub const KNOCK_SINK_ID: &str = "knock";
pub const KNOCK_API_BASE: &str = "https://api.knock.app";

const RECIPIENT_COLLECTION: &str = "webhook-users";
const RECIPIENT_ID: &str = "tenderly";

/// Workflow used when a trigger does not name one.
pub fn default_workflow_key(network: Network) -> &'static str {
    match network {
        Network::Mainnet => "new-oneclick-minipool",
        Network::Fuji => "new-oneclick-minipool-fuji",
    }
}

pub struct KnockSink {
    transport: Arc<dyn HttpTransport>,
    token: OnceLock<String>,
    base_url: String,
}

impl KnockSink {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            token: OnceLock::new(),
            base_url: KNOCK_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the API token. Only the first call has any effect.
    pub fn init(&self, token: impl Into<String>) {
        let _ = self.token.set(token.into());
    }

    pub fn is_initialized(&self) -> bool {
        self.token.get().is_some()
    }
}

#[async_trait]
impl NotificationSink for KnockSink {
    fn id(&self) -> &str {
        KNOCK_SINK_ID
    }

    async fn deliver(
        &self,
        payload: &NotificationPayload,
        hints: &DeliveryHints,
    ) -> Result<Delivery, DeliveryError> {
        let Some(workflow) = &payload.workflow else {
            return Ok(Delivery::Skipped);
        };
        let token = self.token.get().ok_or_else(|| DeliveryError::NotInitialized {
            sink: KNOCK_SINK_ID.into(),
        })?;

        let key = workflow
            .key
            .as_deref()
            .unwrap_or_else(|| default_workflow_key(hints.network));
        let url = format!("{}/v1/workflows/{key}/trigger", self.base_url);
        let body = json!({
            "recipients": [{ "collection": RECIPIENT_COLLECTION, "id": RECIPIENT_ID }],
            "data": workflow.data,
        });

        let status = self
            .transport
            .post_json(HttpRequest::new(&url, body).with_bearer(token))
            .await?;
        ensure_success(status, &url)?;
        debug!(workflow = key, status, "knock workflow triggered");
        Ok(Delivery::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use chainrelay_core::WorkflowTrigger;

    #[tokio::test]
    async fn default_key_follows_network() {
        let transport = Arc::new(RecordingTransport::new());
        let sink = KnockSink::new(transport.clone());
        sink.init("sk_test");
        let payload = NotificationPayload::new().with_workflow(WorkflowTrigger::new(json!({"user": "0x1"})));

        sink.deliver(&payload, &DeliveryHints::new(Network::Fuji)).await.unwrap();
        sink.deliver(&payload, &DeliveryHints::new(Network::Mainnet)).await.unwrap();

        let reqs = transport.requests();
        assert_eq!(
            reqs[0].url,
            "https://api.knock.app/v1/workflows/new-oneclick-minipool-fuji/trigger"
        );
        assert_eq!(
            reqs[1].url,
            "https://api.knock.app/v1/workflows/new-oneclick-minipool/trigger"
        );
        assert_eq!(reqs[0].bearer.as_deref(), Some("sk_test"));
        assert_eq!(
            reqs[0].body,
            json!({
                "recipients": [{"collection": "webhook-users", "id": "tenderly"}],
                "data": {"user": "0x1"}
            })
        );
    }

    #[tokio::test]
    async fn explicit_key_wins() {
        let transport = Arc::new(RecordingTransport::new());
        let sink = KnockSink::new(transport.clone()).with_base_url("http://knock.local/");
        sink.init("t");
        let payload = NotificationPayload::new()
            .with_workflow(WorkflowTrigger::new(json!({})).with_key("minipool-ejection"));
        sink.deliver(&payload, &DeliveryHints::new(Network::Fuji)).await.unwrap();
        assert_eq!(
            transport.requests()[0].url,
            "http://knock.local/v1/workflows/minipool-ejection/trigger"
        );
    }

    #[tokio::test]
    async fn skip_and_uninitialised() {
        let transport = Arc::new(RecordingTransport::new());
        let sink = KnockSink::new(transport.clone());
        let skipped = sink
            .deliver(&NotificationPayload::new(), &DeliveryHints::default())
            .await
            .unwrap();
        assert_eq!(skipped, Delivery::Skipped);

        let err = sink
            .deliver(
                &NotificationPayload::new().with_workflow(WorkflowTrigger::new(json!({}))),
                &DeliveryHints::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::NotInitialized { .. }));
        assert_eq!(transport.count(), 0);
    }
}
