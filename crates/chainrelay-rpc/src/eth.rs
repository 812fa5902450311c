//! `eth_call`: the read-only chain interface used for enrichment.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::TransportError;
use crate::request::JsonRpcRequest;
use crate::transport::RpcTransport;

/// Executes a read-only contract call against the latest block.
#[async_trait]
pub trait EthCall: Send + Sync {
    /// `to` is the 0x-prefixed contract address, `data` the ABI-encoded
    /// call including selector. Returns the raw ABI-encoded result.
    async fn eth_call(&self, to: &str, data: &[u8]) -> Result<Vec<u8>, TransportError>;
}

/// `EthCall` over any JSON-RPC transport.
pub struct RpcEthCaller {
    transport: Arc<dyn RpcTransport>,
    next_id: AtomicU64,
}

impl RpcEthCaller {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl EthCall for RpcEthCaller {
    async fn eth_call(&self, to: &str, data: &[u8]) -> Result<Vec<u8>, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let req = JsonRpcRequest::new(
            id,
            "eth_call",
            vec![
                json!({ "to": to, "data": format!("0x{}", hex::encode(data)) }),
                json!("latest"),
            ],
        );

        let result = self
            .transport
            .send(req)
            .await?
            .into_result()
            .map_err(TransportError::Rpc)?;

        match result {
            Value::String(s) => {
                let stripped = s.strip_prefix("0x").unwrap_or(&s);
                hex::decode(stripped).map_err(|e| TransportError::MalformedResult(e.to_string()))
            }
            other => Err(TransportError::MalformedResult(format!(
                "expected hex string, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{JsonRpcError, JsonRpcResponse};
    use std::sync::Mutex;

    struct ScriptedTransport {
        reply: Result<Value, JsonRpcError>,
        seen: Mutex<Vec<JsonRpcRequest>>,
    }

    #[async_trait]
    impl RpcTransport for ScriptedTransport {
        async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
            let id = req.id.clone();
            self.seen.lock().unwrap().push(req);
            Ok(match &self.reply {
                Ok(v) => JsonRpcResponse::success(id, v.clone()),
                Err(e) => JsonRpcResponse {
                    jsonrpc: "2.0".into(),
                    id,
                    result: None,
                    error: Some(e.clone()),
                },
            })
        }

        fn url(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn decodes_hex_result_and_sends_latest() {
        let transport = Arc::new(ScriptedTransport {
            reply: Ok(json!("0x00ff")),
            seen: Mutex::new(vec![]),
        });
        let caller = RpcEthCaller::new(transport.clone());

        let out = caller.eth_call("0xabc", &[0xde, 0xad]).await.unwrap();
        assert_eq!(out, vec![0x00, 0xff]);

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].method, "eth_call");
        assert_eq!(seen[0].params[0]["data"], "0xdead");
        assert_eq!(seen[0].params[1], "latest");
    }

    #[tokio::test]
    async fn revert_surfaces_as_rpc_error() {
        let transport = Arc::new(ScriptedTransport {
            reply: Err(JsonRpcError {
                code: 3,
                message: "execution reverted".into(),
                data: None,
            }),
            seen: Mutex::new(vec![]),
        });
        let err = RpcEthCaller::new(transport)
            .eth_call("0xabc", &[])
            .await
            .unwrap_err();
        assert!(err.is_execution_error());
    }

    #[tokio::test]
    async fn non_string_result_is_malformed() {
        let transport = Arc::new(ScriptedTransport {
            reply: Ok(json!(12)),
            seen: Mutex::new(vec![]),
        });
        let err = RpcEthCaller::new(transport)
            .eth_call("0xabc", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::MalformedResult(_)));
    }
}
