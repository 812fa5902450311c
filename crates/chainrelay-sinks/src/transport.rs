//! Outbound HTTP for sinks.
//!
//! Sinks only ever POST a JSON document, optionally with a bearer token, so
//! the transport seam is that single operation.

use async_trait::async_trait;
use chainrelay_core::DeliveryError;
use serde_json::Value;
use std::time::Duration;

/// A JSON POST request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub bearer: Option<String>,
    pub body: Value,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            bearer: None,
            body,
        }
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `req.body` as JSON. Returns the response status code.
    async fn post_json(&self, req: HttpRequest) -> Result<u16, DeliveryError>;
}

/// Turn a non-2xx status into an error.
pub(crate) fn ensure_success(status: u16, url: &str) -> Result<(), DeliveryError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(DeliveryError::Status {
            status,
            url: redact(url),
        })
    }
}

/// Webhook URLs embed their credentials in the path; keep only scheme and host.
pub(crate) fn redact(url: &str) -> String {
    match url.split_once("://") {
        Some((scheme, rest)) => {
            let host = rest.split('/').next().unwrap_or(rest);
            format!("{scheme}://{host}/…")
        }
        None => "<url>".to_string(),
    }
}

/// `HttpTransport` backed by `reqwest` with a fixed per-request timeout.
pub struct ReqwestTransport {
    http: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, DeliveryError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeliveryError::Transport {
                reason: format!("failed to build client: {e}"),
            })?;
        Ok(Self { http, timeout })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, req: HttpRequest) -> Result<u16, DeliveryError> {
        let mut builder = self.http.post(&req.url).json(&req.body);
        if let Some(token) = &req.bearer {
            builder = builder.bearer_auth(token);
        }
        let resp = builder.send().await.map_err(|e| {
            let reason = if e.is_timeout() {
                format!("timed out after {}ms", self.timeout.as_millis())
            } else {
                e.without_url().to_string()
            };
            DeliveryError::Transport { reason }
        })?;
        Ok(resp.status().as_u16())
    }
}
