//! Event Extractor: find and decode the logs of one event type in a transaction.
//!
//! Logs that don't match the schema's selector, or that fail to decode under
//! it, are skipped silently. Absence is reported by an empty result, and
//! turned into an error only by `require_event`.

use alloy_dyn_abi::EventExt;
use alloy_json_abi::Event;
use alloy_primitives::B256;
use chainrelay_core::{ActionError, RawLog, TransactionEvent};
use std::str::FromStr;
use tracing::{debug, trace};

use crate::abi::Contract;
use crate::error::DecodeError;
use crate::values::Fields;

/// A decoded log: event name, emitting contract and named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLog {
    pub event: String,
    pub address: String,
    /// Position of the log within the transaction.
    pub log_index: usize,
    pub fields: Fields,
}

/// One event layout of one contract.
#[derive(Debug, Clone)]
pub struct EventSchema {
    contract: Contract,
    event: &'static Event,
}

impl EventSchema {
    pub fn new(contract: Contract, event_name: &str) -> Result<Self, DecodeError> {
        Ok(Self {
            contract,
            event: contract.event(event_name)?,
        })
    }

    pub fn contract(&self) -> Contract {
        self.contract
    }

    pub fn name(&self) -> &str {
        &self.event.name
    }

    /// `topics[0]` of logs emitted under this layout.
    pub fn selector(&self) -> B256 {
        self.event.selector()
    }

    pub fn event(&self) -> &Event {
        self.event
    }

    /// True when the log's first topic is this event's selector.
    pub fn matches(&self, log: &RawLog) -> bool {
        log.topics
            .first()
            .and_then(|t| B256::from_str(t).ok())
            .is_some_and(|t| t == self.selector())
    }

    /// Decode a raw log under this layout.
    pub fn decode(&self, log: &RawLog, log_index: usize) -> Result<DecodedLog, DecodeError> {
        let topics = log
            .topics
            .iter()
            .map(|t| {
                B256::from_str(t).map_err(|e| DecodeError::InvalidRawLog {
                    reason: format!("invalid topic '{t}': {e}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let data_hex = log.data.strip_prefix("0x").unwrap_or(&log.data);
        let data = hex::decode(data_hex).map_err(|e| DecodeError::InvalidRawLog {
            reason: format!("invalid data hex: {e}"),
        })?;

        let decoded = self
            .event
            .decode_log_parts(topics, &data, true)
            .map_err(|e| DecodeError::AbiDecodeFailed {
                reason: e.to_string(),
            })?;

        let mut indexed = decoded.indexed.into_iter();
        let mut body = decoded.body.into_iter();
        let mut fields = Fields::new();
        for input in &self.event.inputs {
            let value = if input.indexed {
                indexed.next()
            } else {
                body.next()
            };
            let value = value.ok_or_else(|| DecodeError::MissingField {
                field: input.name.clone(),
            })?;
            fields.insert(input.name.clone(), value);
        }

        Ok(DecodedLog {
            event: self.event.name.clone(),
            address: log.address.clone(),
            log_index,
            fields,
        })
    }
}

/// All logs in `tx` that decode under `schema`, in log order.
pub fn extract_events(tx: &TransactionEvent, schema: &EventSchema) -> Vec<DecodedLog> {
    let out: Vec<DecodedLog> = tx
        .logs
        .iter()
        .enumerate()
        .filter(|(_, log)| schema.matches(log))
        .filter_map(|(i, log)| match schema.decode(log, i) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                trace!(event = schema.name(), log_index = i, error = %e, "log skipped");
                None
            }
        })
        .collect();
    debug!(
        tx = %tx.hash,
        event = schema.name(),
        contract = %schema.contract(),
        matches = out.len(),
        "extracted events"
    );
    out
}

/// The last matching log, if any.
pub fn extract_event(tx: &TransactionEvent, schema: &EventSchema) -> Option<DecodedLog> {
    extract_events(tx, schema).pop()
}

/// Like `extract_event`, but absence is an error.
pub fn require_event(tx: &TransactionEvent, schema: &EventSchema) -> Result<DecodedLog, ActionError> {
    extract_event(tx, schema).ok_or_else(|| ActionError::EventNotFound {
        event: schema.name().to_string(),
    })
}

/// Conversion from a decoded log into a typed record.
pub trait FromLog: Sized {
    fn from_log(log: &DecodedLog) -> Result<Self, DecodeError>;
}

/// All matching logs converted to `T`; logs that fail conversion are skipped.
pub fn extract_typed<T: FromLog>(tx: &TransactionEvent, schema: &EventSchema) -> Vec<T> {
    extract_events(tx, schema)
        .iter()
        .filter_map(|log| match T::from_log(log) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(event = %log.event, error = %e, "decoded log has unexpected shape");
                None
            }
        })
        .collect()
}

/// The last matching log converted to `T`.
pub fn extract_typed_last<T: FromLog>(tx: &TransactionEvent, schema: &EventSchema) -> Option<T> {
    extract_typed(tx, schema).pop()
}

type Normalise<T> = fn(&DecodedLog) -> Result<T, DecodeError>;

/// Ordered historical layouts of one logical event.
///
/// `extract` tries each layout in order and returns the records of the first
/// layout that matches anything. Results from different layouts are never
/// merged.
pub struct SchemaVariants<T> {
    variants: Vec<(EventSchema, Normalise<T>)>,
}

impl<T> Default for SchemaVariants<T> {
    fn default() -> Self {
        Self { variants: vec![] }
    }
}

impl<T> SchemaVariants<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variant(mut self, schema: EventSchema, normalise: Normalise<T>) -> Self {
        self.variants.push((schema, normalise));
        self
    }

    pub fn extract(&self, tx: &TransactionEvent) -> Vec<T> {
        for (schema, normalise) in &self.variants {
            let records: Vec<T> = extract_events(tx, schema)
                .iter()
                .filter_map(|log| match normalise(log) {
                    Ok(v) => Some(v),
                    Err(e) => {
                        tracing::warn!(event = %log.event, contract = %schema.contract(), error = %e, "variant normalisation failed");
                        None
                    }
                })
                .collect();
            if !records.is_empty() {
                debug!(contract = %schema.contract(), count = records.len(), "schema variant matched");
                return records;
            }
        }
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{encode_log, word_address};
    use alloy_core::dyn_abi::DynSolValue;
    use alloy_primitives::{Address, U256};
    use chainrelay_core::Network;

    fn staked_log(from: Address, amount: u64) -> RawLog {
        encode_log(
            Contract::Staking,
            "GGPStaked",
            "0x00000000000000000000000000000000000000aa",
            &[word_address(from)],
            &[DynSolValue::Uint(U256::from(amount), 256)],
        )
    }

    fn tx(logs: Vec<RawLog>) -> TransactionEvent {
        let mut tx = TransactionEvent::new("0xfeed", "0x01", Network::Mainnet);
        tx.logs = logs;
        tx
    }

    #[test]
    fn decodes_indexed_and_body_fields() {
        let schema = EventSchema::new(Contract::Staking, "GGPStaked").unwrap();
        let staker = Address::repeat_byte(0x42);
        let decoded = require_event(&tx(vec![staked_log(staker, 1000)]), &schema).unwrap();
        assert_eq!(decoded.event, "GGPStaked");
        assert_eq!(decoded.fields.address("from").unwrap(), staker);
        assert_eq!(decoded.fields.u64("amount").unwrap(), 1000);
    }

    #[test]
    fn non_matching_and_corrupt_logs_are_skipped() {
        let schema = EventSchema::new(Contract::Staking, "GGPStaked").unwrap();
        let mut corrupt = staked_log(Address::repeat_byte(1), 5);
        corrupt.data = "0x1234".into();
        let unrelated = RawLog {
            address: "0xbb".into(),
            topics: vec![format!("0x{}", hex::encode(B256::repeat_byte(0x99)))],
            data: "0x".into(),
        };
        let garbage = RawLog {
            address: "0xbb".into(),
            topics: vec!["not-hex".into()],
            data: "zz".into(),
        };
        let events = extract_events(&tx(vec![corrupt, unrelated, garbage]), &schema);
        assert!(events.is_empty());
    }

    #[test]
    fn last_match_wins_and_absence_is_error() {
        let schema = EventSchema::new(Contract::Staking, "GGPStaked").unwrap();
        let t = tx(vec![
            staked_log(Address::repeat_byte(1), 1),
            staked_log(Address::repeat_byte(2), 2),
        ]);
        let last = extract_event(&t, &schema).unwrap();
        assert_eq!(last.fields.u64("amount").unwrap(), 2);
        assert_eq!(last.log_index, 1);

        let err = require_event(&tx(vec![]), &schema).unwrap_err();
        assert!(err.to_string().contains("No matching event found"));
    }

    #[test]
    fn first_non_empty_variant_wins() {
        let staked = EventSchema::new(Contract::Staking, "GGPStaked").unwrap();
        let withdrawn = EventSchema::new(Contract::Staking, "GGPWithdrawn").unwrap();
        let variants: SchemaVariants<String> = SchemaVariants::new()
            .variant(withdrawn, |log| Ok(format!("withdrawn:{}", log.fields.u64("amount")?)))
            .variant(staked, |log| Ok(format!("staked:{}", log.fields.u64("amount")?)));

        let out = variants.extract(&tx(vec![staked_log(Address::repeat_byte(3), 9)]));
        assert_eq!(out, vec!["staked:9".to_string()]);
        assert!(variants.extract(&tx(vec![])).is_empty());
    }
}
