//! Error types for ABI decoding and contract reads.

use chainrelay_core::ActionError;
use chainrelay_rpc::TransportError;
use thiserror::Error;

/// Errors that can occur while decoding a log, calldata or a call result.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("ABI decode failed: {reason}")]
    AbiDecodeFailed { reason: String },

    #[error("Type mismatch for '{field}': expected {expected}")]
    TypeMismatch { field: String, expected: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid raw log: {reason}")]
    InvalidRawLog { reason: String },

    #[error("Invalid calldata: {reason}")]
    InvalidCalldata { reason: String },

    #[error("'{item}' not found in {contract} ABI")]
    UnknownAbiItem { contract: String, item: String },

    #[error("ABI for {contract} is invalid: {reason}")]
    InvalidAbi { contract: String, reason: String },
}

/// Errors from a single enrichment read.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("{contract}.{function} call failed: {source}")]
    Transport {
        contract: String,
        function: String,
        #[source]
        source: TransportError,
    },

    #[error("{contract}.{function}: {source}")]
    Decode {
        contract: String,
        function: String,
        #[source]
        source: DecodeError,
    },

    #[error("invalid contract address '{address}'")]
    InvalidAddress { address: String },
}

impl From<ReadError> for ActionError {
    fn from(e: ReadError) -> Self {
        ActionError::Enrichment {
            reason: e.to_string(),
        }
    }
}
