//! Named ABI values with typed accessors.
//!
//! Decoded logs, calldata and struct results all end up as an ordered
//! name → `DynSolValue` map; typed records are built from it field by field.

use alloy_core::dyn_abi::DynSolValue;
use alloy_json_abi::Param;
use alloy_primitives::{Address, B256, I256, U256};
use indexmap::IndexMap;

use crate::error::DecodeError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(IndexMap<String, DynSolValue>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: DynSolValue) {
        self.0.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Zip ABI params with their decoded values. Unnamed params are keyed by position.
    pub fn from_params(params: &[Param], values: Vec<DynSolValue>) -> Self {
        let mut out = Self::new();
        for (i, (param, value)) in params.iter().zip(values).enumerate() {
            let name = if param.name.is_empty() {
                i.to_string()
            } else {
                param.name.clone()
            };
            out.insert(name, value);
        }
        out
    }

    /// Expand a struct value using the component names of its ABI param.
    pub fn from_struct(param: &Param, value: DynSolValue) -> Result<Self, DecodeError> {
        match value {
            DynSolValue::Tuple(values) => Ok(Self::from_params(&param.components, values)),
            _ => Err(DecodeError::TypeMismatch {
                field: param.name.clone(),
                expected: "tuple".into(),
            }),
        }
    }

    pub fn get(&self, field: &str) -> Result<&DynSolValue, DecodeError> {
        self.0.get(field).ok_or_else(|| DecodeError::MissingField {
            field: field.to_string(),
        })
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn address(&self, field: &str) -> Result<Address, DecodeError> {
        match self.get(field)? {
            DynSolValue::Address(a) => Ok(*a),
            _ => Err(mismatch(field, "address")),
        }
    }

    pub fn uint(&self, field: &str) -> Result<U256, DecodeError> {
        match self.get(field)? {
            DynSolValue::Uint(v, _) => Ok(*v),
            _ => Err(mismatch(field, "uint")),
        }
    }

    pub fn u64(&self, field: &str) -> Result<u64, DecodeError> {
        let v = self.uint(field)?;
        u64::try_from(v).map_err(|_| mismatch(field, "uint fitting in 64 bits"))
    }

    pub fn int(&self, field: &str) -> Result<I256, DecodeError> {
        match self.get(field)? {
            DynSolValue::Int(v, _) => Ok(*v),
            _ => Err(mismatch(field, "int")),
        }
    }

    pub fn b256(&self, field: &str) -> Result<B256, DecodeError> {
        match self.get(field)? {
            DynSolValue::FixedBytes(word, 32) => Ok(*word),
            _ => Err(mismatch(field, "bytes32")),
        }
    }

    pub fn bytes(&self, field: &str) -> Result<Vec<u8>, DecodeError> {
        match self.get(field)? {
            DynSolValue::Bytes(b) => Ok(b.clone()),
            _ => Err(mismatch(field, "bytes")),
        }
    }
}

fn mismatch(field: &str, expected: &str) -> DecodeError {
    DecodeError::TypeMismatch {
        field: field.to_string(),
        expected: expected.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors() {
        let mut f = Fields::new();
        f.insert("who", DynSolValue::Address(Address::repeat_byte(0x11)));
        f.insert("amount", DynSolValue::Uint(U256::from(42u64), 256));
        f.insert("tag", DynSolValue::FixedBytes(B256::repeat_byte(0x22), 32));

        assert_eq!(f.address("who").unwrap(), Address::repeat_byte(0x11));
        assert_eq!(f.u64("amount").unwrap(), 42);
        assert_eq!(f.b256("tag").unwrap(), B256::repeat_byte(0x22));
        assert!(matches!(f.uint("who"), Err(DecodeError::TypeMismatch { .. })));
        assert!(matches!(f.uint("missing"), Err(DecodeError::MissingField { .. })));
    }

    #[test]
    fn u64_rejects_overflow() {
        let mut f = Fields::new();
        f.insert("big", DynSolValue::Uint(U256::MAX, 256));
        assert!(f.u64("big").is_err());
    }
}
