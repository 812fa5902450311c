//! Trigger input types: raw logs and the transaction event that carries them.

use serde::{Deserialize, Serialize};

use crate::network::Network;

/// A raw EVM log as delivered by the transaction trigger.
/// Topics and data stay hex-encoded; decoding happens in `chainrelay-evm`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLog {
    /// Contract address that emitted the log.
    pub address: String,
    /// `topics[0]` is the event signature hash, the rest are indexed params.
    pub topics: Vec<String>,
    /// ABI-encoded non-indexed params (0x-prefixed hex).
    #[serde(default)]
    pub data: String,
}

/// A transaction observed by the monitoring trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEvent {
    pub hash: String,
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,
    /// Transaction calldata (0x-prefixed hex).
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub block_number: Option<u64>,
    #[serde(default)]
    pub logs: Vec<RawLog>,
}

impl TransactionEvent {
    pub fn new(hash: impl Into<String>, from: impl Into<String>, network: Network) -> Self {
        Self {
            hash: hash.into(),
            from: from.into(),
            to: None,
            input: "0x".into(),
            network,
            block_number: None,
            logs: vec![],
        }
    }

    pub fn with_log(mut self, log: RawLog) -> Self {
        self.logs.push(log);
        self
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }
}
