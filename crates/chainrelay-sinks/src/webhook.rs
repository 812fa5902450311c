//! Generic JSON webhook sink: posts `payload.body` as-is.

use async_trait::async_trait;
use chainrelay_core::{Delivery, DeliveryError, DeliveryHints, NotificationPayload, NotificationSink};
use std::sync::{Arc, OnceLock};
use tracing::debug;

use crate::transport::{ensure_success, HttpRequest, HttpTransport};

pub const WEBHOOK_SINK_ID: &str = "webhook";

pub struct WebhookSink {
    transport: Arc<dyn HttpTransport>,
    url: OnceLock<String>,
}

impl WebhookSink {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            url: OnceLock::new(),
        }
    }

    pub fn init(&self, url: impl Into<String>) {
        let _ = self.url.set(url.into());
    }

    pub fn is_initialized(&self) -> bool {
        self.url.get().is_some()
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    fn id(&self) -> &str {
        WEBHOOK_SINK_ID
    }

    async fn deliver(
        &self,
        payload: &NotificationPayload,
        _hints: &DeliveryHints,
    ) -> Result<Delivery, DeliveryError> {
        let Some(body) = &payload.body else {
            return Ok(Delivery::Skipped);
        };
        let url = self.url.get().ok_or_else(|| DeliveryError::NotInitialized {
            sink: WEBHOOK_SINK_ID.into(),
        })?;
        let status = self
            .transport
            .post_json(HttpRequest::new(url, body.clone()))
            .await?;
        ensure_success(status, url)?;
        debug!(status, "webhook delivered");
        Ok(Delivery::Sent)
    }
}
