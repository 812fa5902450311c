//! Slack incoming-webhook sink.
//!
//! Stateless: the destination URL travels with each notification as
//! `hints.slack_url`, resolved per hardware provider by the action.

use async_trait::async_trait;
use chainrelay_core::{Delivery, DeliveryError, DeliveryHints, NotificationPayload, NotificationSink};
use std::sync::Arc;
use tracing::debug;

use crate::transport::{ensure_success, HttpRequest, HttpTransport};

pub const SLACK_SINK_ID: &str = "slack";

pub struct SlackSink {
    transport: Arc<dyn HttpTransport>,
}

impl SlackSink {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl NotificationSink for SlackSink {
    fn id(&self) -> &str {
        SLACK_SINK_ID
    }

    async fn deliver(
        &self,
        payload: &NotificationPayload,
        hints: &DeliveryHints,
    ) -> Result<Delivery, DeliveryError> {
        let (Some(message), Some(url)) = (&payload.slack, &hints.slack_url) else {
            return Ok(Delivery::Skipped);
        };
        let body = serde_json::to_value(message)?;
        let status = self.transport.post_json(HttpRequest::new(url, body)).await?;
        ensure_success(status, url)?;
        debug!(blocks = message.blocks.len(), "slack message sent");
        Ok(Delivery::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use chainrelay_core::{Network, SlackMessage};
    use serde_json::json;

    fn payload() -> NotificationPayload {
        NotificationPayload::new().with_slack(SlackMessage {
            blocks: vec![json!({"type": "divider"})],
        })
    }

    #[tokio::test]
    async fn posts_blocks_to_hinted_url() {
        let transport = Arc::new(RecordingTransport::new());
        let sink = SlackSink::new(transport.clone());
        let hints = DeliveryHints::new(Network::Fuji).with_slack_url("https://hooks.slack.test/a");
        assert_eq!(sink.deliver(&payload(), &hints).await.unwrap(), Delivery::Sent);
        let reqs = transport.requests();
        assert_eq!(reqs[0].url, "https://hooks.slack.test/a");
        assert_eq!(reqs[0].body, json!({"blocks": [{"type": "divider"}]}));
    }

    #[tokio::test]
    async fn missing_url_or_blocks_skips() {
        let transport = Arc::new(RecordingTransport::new());
        let sink = SlackSink::new(transport.clone());
        let no_url = sink.deliver(&payload(), &DeliveryHints::default()).await.unwrap();
        let no_blocks = sink
            .deliver(
                &NotificationPayload::new(),
                &DeliveryHints::default().with_slack_url("https://hooks.slack.test/a"),
            )
            .await
            .unwrap();
        assert_eq!(no_url, Delivery::Skipped);
        assert_eq!(no_blocks, Delivery::Skipped);
        assert_eq!(transport.count(), 0);
    }
}
