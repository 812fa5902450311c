//! The `NotificationSink` trait, the contract every outbound destination implements.

use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::payload::{DeliveryHints, NotificationPayload};

/// What a sink did with a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The payload carried this sink's shape and it was sent.
    Sent,
    /// Nothing applicable to this sink; no transport call was made.
    Skipped,
}

/// A concrete outbound notification destination.
///
/// Implementations must be `Send + Sync` so the dispatcher can run every
/// delivery on its own task. A sink picks its shape out of the payload and
/// must return `Ok(Delivery::Skipped)` without touching the network when
/// that shape is absent, whether or not it has been initialised.
#[async_trait]
pub trait NotificationSink: Send + Sync + 'static {
    /// Unique identifier used for registration (e.g. `"discord"`).
    fn id(&self) -> &str;

    async fn deliver(
        &self,
        payload: &NotificationPayload,
        hints: &DeliveryHints,
    ) -> Result<Delivery, DeliveryError>;
}
