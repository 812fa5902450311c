//! Transaction calldata decoding.
//!
//! The first 4 bytes of calldata select the function; the rest is the
//! ABI-encoded argument tuple.

use alloy_dyn_abi::JsonAbiExt;

use crate::abi::Contract;
use crate::error::DecodeError;
use crate::values::Fields;

/// A decoded function call.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCall {
    pub function: String,
    pub args: Fields,
}

/// Name of the `contract` function that `input` invokes.
pub fn decode_function_name(contract: Contract, input: &str) -> Result<String, DecodeError> {
    let bytes = calldata_bytes(input)?;
    let selector = selector_of(&bytes)?;
    contract
        .abi()?
        .functions()
        .find(|f| f.selector().as_slice() == selector)
        .map(|f| f.name.clone())
        .ok_or_else(|| DecodeError::UnknownAbiItem {
            contract: contract.name().into(),
            item: format!("selector 0x{}", hex::encode(selector)),
        })
}

/// Decode `input` into its function name and named arguments.
pub fn decode_call(contract: Contract, input: &str) -> Result<DecodedCall, DecodeError> {
    let bytes = calldata_bytes(input)?;
    let selector = selector_of(&bytes)?;
    let function = contract
        .abi()?
        .functions()
        .find(|f| f.selector().as_slice() == selector)
        .ok_or_else(|| DecodeError::UnknownAbiItem {
            contract: contract.name().into(),
            item: format!("selector 0x{}", hex::encode(selector)),
        })?;

    let values = function
        .abi_decode_input(&bytes[4..], true)
        .map_err(|e| DecodeError::AbiDecodeFailed {
            reason: format!("{}: {e}", function.name),
        })?;

    Ok(DecodedCall {
        function: function.name.clone(),
        args: Fields::from_params(&function.inputs, values),
    })
}

fn calldata_bytes(input: &str) -> Result<Vec<u8>, DecodeError> {
    let hex_str = input.strip_prefix("0x").unwrap_or(input);
    hex::decode(hex_str).map_err(|e| DecodeError::InvalidCalldata {
        reason: format!("invalid hex: {e}"),
    })
}

fn selector_of(bytes: &[u8]) -> Result<&[u8], DecodeError> {
    if bytes.len() < 4 {
        return Err(DecodeError::InvalidCalldata {
            reason: format!(
                "calldata too short: {} bytes (need at least 4 for selector)",
                bytes.len()
            ),
        });
    }
    Ok(&bytes[..4])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{encode_calldata, uint};
    use alloy_core::dyn_abi::DynSolValue;
    use alloy_primitives::{Address, B256};

    #[test]
    fn identifies_record_staking_end() {
        let node = Address::repeat_byte(0x5a);
        let input = encode_calldata(
            Contract::MinipoolManager,
            "recordStakingEnd",
            &[DynSolValue::Address(node), uint(1_700_000_000), uint(0)],
        );
        assert_eq!(
            decode_function_name(Contract::MinipoolManager, &input).unwrap(),
            "recordStakingEnd"
        );
        let call = decode_call(Contract::MinipoolManager, &input).unwrap();
        assert_eq!(call.args.address("nodeID").unwrap(), node);
        assert_eq!(call.args.u64("endTime").unwrap(), 1_700_000_000);
    }

    #[test]
    fn distinguishes_sibling_functions() {
        let input = encode_calldata(
            Contract::MinipoolManager,
            "recordStakingError",
            &[
                DynSolValue::Address(Address::repeat_byte(1)),
                DynSolValue::FixedBytes(B256::ZERO, 32),
            ],
        );
        assert_eq!(
            decode_function_name(Contract::MinipoolManager, &input).unwrap(),
            "recordStakingError"
        );
    }

    #[test]
    fn short_or_unknown_calldata_fails() {
        assert!(matches!(
            decode_function_name(Contract::MinipoolManager, "0x12"),
            Err(DecodeError::InvalidCalldata { .. })
        ));
        assert!(matches!(
            decode_function_name(Contract::MinipoolManager, "0xdeadbeef"),
            Err(DecodeError::UnknownAbiItem { .. })
        ));
    }
}
