//! Transport-level error types.

use thiserror::Error;

use crate::request::JsonRpcError;

/// Errors from a single chain read.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, TLS failure, non-2xx status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The node answered with a JSON-RPC error object (e.g. an execution revert).
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The result was not a 0x-prefixed hex string.
    #[error("Malformed result: {0}")]
    MalformedResult(String),
}

impl TransportError {
    /// Returns `true` if the node reverted the call.
    pub fn is_execution_error(&self) -> bool {
        matches!(self, Self::Rpc(_))
    }
}
