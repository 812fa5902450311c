//! Validator node IDs.
//!
//! On chain a node ID is a 20-byte address. For display it is
//! `NodeID-<cb58>`, where cb58 is base58 over the bytes followed by the last
//! four bytes of their SHA-256.

use alloy_primitives::Address;
use sha2::{Digest, Sha256};
use std::str::FromStr;
use thiserror::Error;

pub const NODE_ID_PREFIX: &str = "NodeID-";

const CHECKSUM_LEN: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NodeIdError {
    #[error("node ID must start with '{NODE_ID_PREFIX}': {0}")]
    MissingPrefix(String),

    #[error("invalid base58 in node ID: {0}")]
    Base58(String),

    #[error("node ID checksum mismatch")]
    Checksum,

    #[error("node ID must be 20 bytes, got {0}")]
    Length(usize),

    #[error("invalid hex address: {0}")]
    Address(String),
}

fn checksum(bytes: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha256::digest(bytes);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[digest.len() - CHECKSUM_LEN..]);
    out
}

pub fn cb58_encode(bytes: &[u8]) -> String {
    let mut buf = bytes.to_vec();
    buf.extend_from_slice(&checksum(bytes));
    bs58::encode(buf).into_string()
}

pub fn cb58_decode(s: &str) -> Result<Vec<u8>, NodeIdError> {
    let raw = bs58::decode(s)
        .into_vec()
        .map_err(|e| NodeIdError::Base58(e.to_string()))?;
    if raw.len() < CHECKSUM_LEN {
        return Err(NodeIdError::Checksum);
    }
    let (payload, sum) = raw.split_at(raw.len() - CHECKSUM_LEN);
    if checksum(payload) != sum {
        return Err(NodeIdError::Checksum);
    }
    Ok(payload.to_vec())
}

/// `0x…` address → `NodeID-…`.
pub fn node_id_from_address(address: Address) -> String {
    format!("{NODE_ID_PREFIX}{}", cb58_encode(address.as_slice()))
}

/// Like `node_id_from_address`, from a hex string.
pub fn node_hex_to_id(hex_address: &str) -> Result<String, NodeIdError> {
    let address =
        Address::from_str(hex_address).map_err(|e| NodeIdError::Address(e.to_string()))?;
    Ok(node_id_from_address(address))
}

/// `NodeID-…` → 20-byte address.
pub fn node_id_to_address(node_id: &str) -> Result<Address, NodeIdError> {
    let encoded = node_id
        .strip_prefix(NODE_ID_PREFIX)
        .ok_or_else(|| NodeIdError::MissingPrefix(node_id.to_string()))?;
    let bytes = cb58_decode(encoded)?;
    if bytes.len() != 20 {
        return Err(NodeIdError::Length(bytes.len()));
    }
    Ok(Address::from_slice(&bytes))
}

/// Accept either form and return the on-chain address.
pub fn parse_node_id(value: &str) -> Result<Address, NodeIdError> {
    let value = value.trim();
    if value.starts_with(NODE_ID_PREFIX) {
        node_id_to_address(value)
    } else {
        Address::from_str(value).map_err(|e| NodeIdError::Address(e.to_string()))
    }
}

/// First 12 characters, `...`, last 6.
pub fn shorten_node_id(node_id: &str) -> String {
    let chars: Vec<char> = node_id.chars().collect();
    if chars.len() <= 18 {
        return node_id.to_string();
    }
    let head: String = chars[..12].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{head}...{tail}")
}
