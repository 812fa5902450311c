//! Contract reads over `eth_call`.
//!
//! `ContractReader` encodes a view-function call from the embedded ABI, runs
//! it through an `EthCall` implementation, and decodes the result.

use alloy_core::dyn_abi::DynSolValue;
use alloy_dyn_abi::{FunctionExt, JsonAbiExt};
use alloy_primitives::{Address, U256};
use chainrelay_rpc::EthCall;
use std::sync::Arc;
use tracing::debug;

use crate::abi::Contract;
use crate::error::{DecodeError, ReadError};
use crate::values::Fields;

#[derive(Clone)]
pub struct ContractReader {
    caller: Arc<dyn EthCall>,
}

impl ContractReader {
    pub fn new(caller: Arc<dyn EthCall>) -> Self {
        Self { caller }
    }

    /// Call `function` on `contract` deployed at `address` and return the
    /// decoded outputs positionally.
    pub async fn read(
        &self,
        contract: Contract,
        address: Address,
        function: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>, ReadError> {
        let decode_err = |source: DecodeError| ReadError::Decode {
            contract: contract.name().into(),
            function: function.into(),
            source,
        };

        let f = contract.function(function).map_err(decode_err)?;
        let calldata = f.abi_encode_input(args).map_err(|e| {
            decode_err(DecodeError::AbiDecodeFailed {
                reason: format!("encode: {e}"),
            })
        })?;

        debug!(contract = %contract, %address, function, "eth_call");
        let raw = self
            .caller
            .eth_call(&address.to_string(), &calldata)
            .await
            .map_err(|source| ReadError::Transport {
                contract: contract.name().into(),
                function: function.into(),
                source,
            })?;

        f.abi_decode_output(&raw, true).map_err(|e| {
            decode_err(DecodeError::AbiDecodeFailed {
                reason: e.to_string(),
            })
        })
    }

    /// Read a function whose single output is a `uint`.
    pub async fn read_uint(
        &self,
        contract: Contract,
        address: Address,
        function: &str,
        args: &[DynSolValue],
    ) -> Result<U256, ReadError> {
        let out = self.read(contract, address, function, args).await?;
        match out.first() {
            Some(DynSolValue::Uint(v, _)) => Ok(*v),
            _ => Err(ReadError::Decode {
                contract: contract.name().into(),
                function: function.into(),
                source: DecodeError::TypeMismatch {
                    field: "0".into(),
                    expected: "uint".into(),
                },
            }),
        }
    }

    /// Read a function and name its outputs. A single struct output is
    /// expanded into its components.
    pub async fn read_fields(
        &self,
        contract: Contract,
        address: Address,
        function: &str,
        args: &[DynSolValue],
    ) -> Result<Fields, ReadError> {
        let mut out = self.read(contract, address, function, args).await?;
        let decode_err = |source: DecodeError| ReadError::Decode {
            contract: contract.name().into(),
            function: function.into(),
            source,
        };
        let f = contract.function(function).map_err(decode_err)?;
        match (f.outputs.as_slice(), out.len()) {
            ([single], 1) if !single.components.is_empty() => {
                let value = out.remove(0);
                Fields::from_struct(single, value).map_err(decode_err)
            }
            _ => Ok(Fields::from_params(&f.outputs, out)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{encode_output, encode_struct_output, uint};
    use async_trait::async_trait;
    use chainrelay_rpc::TransportError;
    use std::sync::Mutex;

    struct FixedCaller {
        reply: Vec<u8>,
        calls: Mutex<Vec<(String, Vec<u8>)>>,
    }

    #[async_trait]
    impl EthCall for FixedCaller {
        async fn eth_call(&self, to: &str, data: &[u8]) -> Result<Vec<u8>, TransportError> {
            self.calls.lock().unwrap().push((to.to_string(), data.to_vec()));
            Ok(self.reply.clone())
        }
    }

    struct DownCaller;

    #[async_trait]
    impl EthCall for DownCaller {
        async fn eth_call(&self, _to: &str, _data: &[u8]) -> Result<Vec<u8>, TransportError> {
            Err(TransportError::Http("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn reads_uint_and_sends_selector() {
        let caller = Arc::new(FixedCaller {
            reply: encode_output(vec![uint(77)]),
            calls: Mutex::new(vec![]),
        });
        let reader = ContractReader::new(caller.clone());
        let v = reader
            .read_uint(Contract::TokenggAvax, Address::repeat_byte(9), "amountAvailableForStaking", &[])
            .await
            .unwrap();
        assert_eq!(v, U256::from(77u64));

        let calls = caller.calls.lock().unwrap();
        let selector = Contract::TokenggAvax
            .function("amountAvailableForStaking")
            .unwrap()
            .selector();
        assert_eq!(&calls[0].1[..4], selector.as_slice());
    }

    #[tokio::test]
    async fn struct_output_is_expanded_by_name() {
        let owner = Address::repeat_byte(0x0e);
        let caller = Arc::new(FixedCaller {
            reply: encode_struct_output(
                Contract::MinipoolManager,
                "getMinipoolByNodeID",
                &[
                    ("owner", DynSolValue::Address(owner)),
                    ("duration", uint(1_209_600)),
                    ("blsPubkeyAndSig", DynSolValue::Bytes(vec![1, 2, 3])),
                ],
            ),
            calls: Mutex::new(vec![]),
        });
        let fields = ContractReader::new(caller)
            .read_fields(
                Contract::MinipoolManager,
                Address::repeat_byte(1),
                "getMinipoolByNodeID",
                &[DynSolValue::Address(Address::repeat_byte(2))],
            )
            .await
            .unwrap();
        assert_eq!(fields.address("owner").unwrap(), owner);
        assert_eq!(fields.u64("duration").unwrap(), 1_209_600);
        assert_eq!(fields.bytes("blsPubkeyAndSig").unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn multi_output_is_named_positionally() {
        let caller = Arc::new(FixedCaller {
            reply: encode_output(vec![uint(100), uint(130)]),
            calls: Mutex::new(vec![]),
        });
        let fields = ContractReader::new(caller)
            .read_fields(Contract::RewardsPool, Address::ZERO, "getInflationAmt", &[])
            .await
            .unwrap();
        assert_eq!(fields.u64("currentTotalSupply").unwrap(), 100);
        assert_eq!(fields.u64("newTotalSupply").unwrap(), 130);
    }

    #[tokio::test]
    async fn transport_failure_is_a_read_error() {
        let err = ContractReader::new(Arc::new(DownCaller))
            .read_uint(Contract::RewardsPool, Address::ZERO, "getRewardsCycleCount", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ReadError::Transport { .. }));
        let action: chainrelay_core::ActionError = err.into();
        assert!(action.to_string().contains("getRewardsCycleCount"));
    }
}
