//! Builders for synthetic logs, calldata and call results.
//!
//! Compiled for this crate's tests and for downstream crates that enable the
//! `test-utils` feature.

use alloy_core::dyn_abi::DynSolValue;
use alloy_dyn_abi::JsonAbiExt;
use alloy_json_abi::Param;
use alloy_primitives::{Address, B256, I256, U256};
use async_trait::async_trait;
use chainrelay_core::RawLog;
use chainrelay_rpc::{EthCall, TransportError};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::abi::Contract;

/// Left-pad an address into a topic word.
pub fn word_address(a: Address) -> B256 {
    a.into_word()
}

/// Encode an event as a raw log. `indexed` are the topics after `topics[0]`.
pub fn encode_log(
    contract: Contract,
    event: &str,
    emitter: &str,
    indexed: &[B256],
    body: &[DynSolValue],
) -> RawLog {
    let ev = contract
        .event(event)
        .unwrap_or_else(|e| panic!("fixture event {contract}.{event}: {e}"));
    let mut topics = vec![hex_word(ev.selector())];
    topics.extend(indexed.iter().map(|t| hex_word(*t)));
    let data = DynSolValue::Tuple(body.to_vec()).abi_encode_params();
    RawLog {
        address: emitter.to_string(),
        topics,
        data: format!("0x{}", hex::encode(data)),
    }
}

/// Encode calldata (selector included) for a function call.
pub fn encode_calldata(contract: Contract, function: &str, args: &[DynSolValue]) -> String {
    let f = contract
        .function(function)
        .unwrap_or_else(|e| panic!("fixture function {contract}.{function}: {e}"));
    let data = f
        .abi_encode_input(args)
        .unwrap_or_else(|e| panic!("fixture calldata {contract}.{function}: {e}"));
    format!("0x{}", hex::encode(data))
}

/// Encode the return data of a function from positional values.
pub fn encode_output(values: Vec<DynSolValue>) -> Vec<u8> {
    DynSolValue::Tuple(values).abi_encode_params()
}

pub fn uint(v: u64) -> DynSolValue {
    DynSolValue::Uint(U256::from(v), 256)
}

pub fn uint256(v: U256) -> DynSolValue {
    DynSolValue::Uint(v, 256)
}

/// Encode the return data of a function returning a single struct.
///
/// Components not named in `fields` are filled with zero values.
pub fn encode_struct_output(
    contract: Contract,
    function: &str,
    fields: &[(&str, DynSolValue)],
) -> Vec<u8> {
    let f = contract
        .function(function)
        .unwrap_or_else(|e| panic!("fixture function {contract}.{function}: {e}"));
    let param = f
        .outputs
        .first()
        .unwrap_or_else(|| panic!("{contract}.{function} has no outputs"));
    let given: HashMap<&str, DynSolValue> = fields.iter().cloned().collect();
    let values = param
        .components
        .iter()
        .map(|c| {
            given
                .get(c.name.as_str())
                .cloned()
                .unwrap_or_else(|| zero_value(c))
        })
        .collect();
    encode_output(vec![DynSolValue::Tuple(values)])
}

fn zero_value(p: &Param) -> DynSolValue {
    match p.ty.as_str() {
        "address" => DynSolValue::Address(Address::ZERO),
        "bytes" => DynSolValue::Bytes(vec![]),
        "bytes32" => DynSolValue::FixedBytes(B256::ZERO, 32),
        "int256" => DynSolValue::Int(I256::ZERO, 256),
        "bool" => DynSolValue::Bool(false),
        _ => DynSolValue::Uint(U256::ZERO, 256),
    }
}

fn hex_word(w: B256) -> String {
    format!("0x{}", hex::encode(w))
}

/// An `EthCall` that answers by function selector.
///
/// Unscripted selectors fail with an HTTP error, as does every call once
/// `fail_all` is set.
#[derive(Default)]
pub struct ScriptedCaller {
    replies: HashMap<[u8; 4], Vec<u8>>,
    fail_all: bool,
    calls: Mutex<Vec<(String, [u8; 4])>>,
}

impl ScriptedCaller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, contract: Contract, function: &str, output: Vec<u8>) -> Self {
        let f = contract
            .function(function)
            .unwrap_or_else(|e| panic!("fixture function {contract}.{function}: {e}"));
        self.replies.insert(f.selector().0, output);
        self
    }

    pub fn fail_all(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// `(to, selector)` of every call made so far.
    pub fn calls(&self) -> Vec<(String, [u8; 4])> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl EthCall for ScriptedCaller {
    async fn eth_call(&self, to: &str, data: &[u8]) -> Result<Vec<u8>, TransportError> {
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&data[..4]);
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((to.to_string(), selector));
        if self.fail_all {
            return Err(TransportError::Http("scripted failure".into()));
        }
        self.replies
            .get(&selector)
            .cloned()
            .ok_or_else(|| TransportError::Http(format!("no reply scripted for 0x{}", hex::encode(selector))))
    }
}
