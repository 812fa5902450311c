//! In-process transport that records requests instead of sending them.

use async_trait::async_trait;
use chainrelay_core::DeliveryError;
use std::sync::Mutex;

use crate::transport::{HttpRequest, HttpTransport};

#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    status: Option<u16>,
    fail: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request gets this status instead of 200.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Every request fails at the transport level.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self) -> usize {
        self.requests().len()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn post_json(&self, req: HttpRequest) -> Result<u16, DeliveryError> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(req);
        if self.fail {
            return Err(DeliveryError::Transport {
                reason: "connection refused".into(),
            });
        }
        Ok(self.status.unwrap_or(200))
    }
}
