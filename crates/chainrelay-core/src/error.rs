//! Error types for the relay pipeline.

use thiserror::Error;

/// Errors a sink can report for a single delivery attempt.
///
/// These never escape a broadcast: the dispatcher records and logs them.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("sink '{sink}' used before initialisation")]
    NotInitialized { sink: String },

    #[error("transport error: {reason}")]
    Transport { reason: String },

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("sink task aborted: {reason}")]
    Panicked { reason: String },

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors that abort an invocation before anything is broadcast.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("No matching event found: {event}")]
    EventNotFound { event: String },

    #[error("Enrichment failed: {reason}")]
    Enrichment { reason: String },

    #[error("{reason}")]
    Unsupported { reason: String },

    #[error("No {destination} route for '{key}' on {network}")]
    RoutingUnresolved {
        destination: String,
        key: String,
        network: String,
    },

    #[error("Unknown minipool status: {code}")]
    UnknownStatus { code: u64 },

    #[error("Invalid trigger: {reason}")]
    InvalidTrigger { reason: String },

    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error("Secret error: {0}")]
    Secret(#[from] SecretError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl ActionError {
    /// Short machine-readable kind, used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EventNotFound { .. } => "event_not_found",
            Self::Enrichment { .. } => "enrichment",
            Self::Unsupported { .. } => "unsupported",
            Self::RoutingUnresolved { .. } => "routing",
            Self::UnknownStatus { .. } => "unknown_status",
            Self::InvalidTrigger { .. } => "invalid_trigger",
            Self::Config { .. } => "config",
            Self::Secret(_) => "secret",
            Self::Storage(_) => "storage",
        }
    }
}

/// Errors from the host's secret store.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("secret '{name}' is not set")]
    Missing { name: String },

    #[error("secret '{name}' could not be read: {reason}")]
    Backend { name: String, reason: String },
}

/// Errors from the key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
