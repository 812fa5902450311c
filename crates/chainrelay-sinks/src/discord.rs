//! Discord webhook sink: posts `payload.chat` as `{embeds, components}`.

use async_trait::async_trait;
use chainrelay_core::{Delivery, DeliveryError, DeliveryHints, NotificationPayload, NotificationSink};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

use crate::transport::{ensure_success, HttpRequest, HttpTransport};

pub const DISCORD_SINK_ID: &str = "discord";

pub struct DiscordSink {
    transport: Arc<dyn HttpTransport>,
    url: OnceLock<String>,
    dry_run: bool,
}

impl DiscordSink {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            url: OnceLock::new(),
            dry_run: false,
        }
    }

    /// Log and skip instead of posting.
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Set the webhook URL. Only the first call has any effect.
    pub fn init(&self, url: impl Into<String>) {
        let _ = self.url.set(url.into());
    }

    pub fn is_initialized(&self) -> bool {
        self.url.get().is_some()
    }
}

#[async_trait]
impl NotificationSink for DiscordSink {
    fn id(&self) -> &str {
        DISCORD_SINK_ID
    }

    async fn deliver(
        &self,
        payload: &NotificationPayload,
        _hints: &DeliveryHints,
    ) -> Result<Delivery, DeliveryError> {
        let Some(chat) = &payload.chat else {
            return Ok(Delivery::Skipped);
        };
        let url = self.url.get().ok_or_else(|| DeliveryError::NotInitialized {
            sink: DISCORD_SINK_ID.into(),
        })?;
        if self.dry_run {
            info!(embeds = chat.embeds.len(), "dry run, discord message not sent");
            return Ok(Delivery::Skipped);
        }

        let body = serde_json::to_value(chat)?;
        let status = self.transport.post_json(HttpRequest::new(url, body)).await?;
        ensure_success(status, url)?;
        debug!(status, "discord message sent");
        Ok(Delivery::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use chainrelay_core::{ChatMessage, Network};
    use serde_json::json;

    fn chat_payload() -> NotificationPayload {
        NotificationPayload::new().with_chat(ChatMessage {
            components: vec![],
            embeds: vec![json!({"title": "GGP Staked"})],
        })
    }

    #[tokio::test]
    async fn posts_embeds() {
        let transport = Arc::new(RecordingTransport::new());
        let sink = DiscordSink::new(transport.clone());
        sink.init("https://discord.test/hook");
        sink.init("https://discord.test/other");

        let out = sink
            .deliver(&chat_payload(), &DeliveryHints::new(Network::Mainnet))
            .await
            .unwrap();
        assert_eq!(out, Delivery::Sent);
        let reqs = transport.requests();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].url, "https://discord.test/hook");
        assert_eq!(reqs[0].body, json!({"embeds": [{"title": "GGP Staked"}]}));
    }

    #[tokio::test]
    async fn absent_shape_skips_even_uninitialised() {
        let transport = Arc::new(RecordingTransport::new());
        let sink = DiscordSink::new(transport.clone());
        let out = sink
            .deliver(
                &NotificationPayload::new().with_body(json!({})),
                &DeliveryHints::default(),
            )
            .await
            .unwrap();
        assert_eq!(out, Delivery::Skipped);
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn uninitialised_with_shape_is_an_error() {
        let sink = DiscordSink::new(Arc::new(RecordingTransport::new()));
        let err = sink
            .deliver(&chat_payload(), &DeliveryHints::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::NotInitialized { .. }));
    }

    #[tokio::test]
    async fn dry_run_sends_nothing() {
        let transport = Arc::new(RecordingTransport::new());
        let sink = DiscordSink::new(transport.clone()).dry_run(true);
        sink.init("https://discord.test/hook");
        let out = sink
            .deliver(&chat_payload(), &DeliveryHints::default())
            .await
            .unwrap();
        assert_eq!(out, Delivery::Skipped);
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let sink = DiscordSink::new(Arc::new(RecordingTransport::new().with_status(429)));
        sink.init("https://discord.test/hook");
        let err = sink
            .deliver(&chat_payload(), &DeliveryHints::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Status { status: 429, .. }));
    }
}
