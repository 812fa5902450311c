//! # chainrelay-core
//!
//! Core traits, types, and primitives shared across all ChainRelay crates.
//! The trigger data model, the notification payload, the sink contract and
//! the fan-out dispatcher live here; chain decoding and HTTP transports are
//! built on top of these interfaces.

pub mod dispatch;
pub mod error;
pub mod event;
pub mod network;
pub mod payload;
pub mod secrets;
pub mod sink;
pub mod store;

pub use dispatch::{BroadcastReport, Dispatcher, SinkOutcome};
pub use error::{ActionError, DeliveryError, SecretError, StoreError};
pub use event::{RawLog, TransactionEvent};
pub use network::Network;
pub use payload::{
    ChatMessage, DeliveryHints, Notification, NotificationPayload, SlackMessage, WorkflowTrigger,
};
pub use secrets::{EnvSecrets, MapSecrets, SecretStore};
pub use sink::{Delivery, NotificationSink};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
