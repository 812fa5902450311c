//! # chainrelay-rpc
//!
//! The chain read path: JSON-RPC 2.0 wire types, the `RpcTransport` trait,
//! a reqwest-backed HTTP client, and the `EthCall` interface (address and
//! ABI-encoded call data in, ABI-encoded result out) that the enrichment
//! reader is built on.
//!
//! Reads are attempted once. There is no retry or failover.

pub mod error;
pub mod eth;
pub mod http;
pub mod request;
pub mod transport;

pub use error::TransportError;
pub use eth::{EthCall, RpcEthCaller};
pub use http::{HttpClientConfig, HttpRpcClient};
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
pub use transport::RpcTransport;
