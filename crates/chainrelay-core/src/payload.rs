//! The notification bundle handed to the dispatcher.
//!
//! A `NotificationPayload` carries at most one shape per sink kind. Every
//! field is optional: a sink whose shape is absent does nothing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::network::Network;

/// A chat webhook message (Discord embeds + link-button rows).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Value>,
    pub embeds: Vec<Value>,
}

/// A channel webhook message (Slack Block Kit).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackMessage {
    pub blocks: Vec<Value>,
}

/// Data for a push-notification workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowTrigger {
    /// Explicit workflow key; `None` selects the network default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub data: Value,
}

impl WorkflowTrigger {
    pub fn new(data: Value) -> Self {
        Self { key: None, data }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Per-sink message shapes for one notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat: Option<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack: Option<SlackMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow: Option<WorkflowTrigger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl NotificationPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chat(mut self, chat: ChatMessage) -> Self {
        self.chat = Some(chat);
        self
    }

    pub fn with_slack(mut self, slack: SlackMessage) -> Self {
        self.slack = Some(slack);
        self
    }

    pub fn with_workflow(mut self, workflow: WorkflowTrigger) -> Self {
        self.workflow = Some(workflow);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// True when no sink has anything to send.
    pub fn is_empty(&self) -> bool {
        self.chat.is_none() && self.slack.is_none() && self.workflow.is_none() && self.body.is_none()
    }
}

/// Routing hints passed alongside a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryHints {
    pub network: Network,
    /// Per-destination channel webhook URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_url: Option<String>,
}

impl DeliveryHints {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            slack_url: None,
        }
    }

    pub fn with_slack_url(mut self, url: impl Into<String>) -> Self {
        self.slack_url = Some(url.into());
        self
    }
}

/// A composed payload together with its routing hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub payload: NotificationPayload,
    pub hints: DeliveryHints,
}

impl Notification {
    pub fn new(payload: NotificationPayload, hints: DeliveryHints) -> Self {
        Self { payload, hints }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_payload_serializes_to_empty_object() {
        let p = NotificationPayload::new();
        assert!(p.is_empty());
        assert_eq!(serde_json::to_value(&p).unwrap(), json!({}));
    }

    #[test]
    fn builder_sets_only_requested_shapes() {
        let p = NotificationPayload::new()
            .with_body(json!({"nodeID": "0x01"}))
            .with_workflow(WorkflowTrigger::new(json!({"user": "0x02"})).with_key("minipool-ejection"));
        assert!(!p.is_empty());
        assert!(p.chat.is_none());
        assert!(p.slack.is_none());
        assert_eq!(p.workflow.as_ref().and_then(|w| w.key.as_deref()), Some("minipool-ejection"));
    }
}
