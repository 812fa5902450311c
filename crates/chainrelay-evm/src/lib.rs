//! # chainrelay-evm
//!
//! Contract ABIs for the GoGoPool protocol, the event extractor with schema
//! variants, calldata decoding, the `eth_call` backed contract reader, and
//! the node-ID and token-unit codecs used when composing notifications.
//!
//! ```rust,ignore
//! use chainrelay_evm::{Contract, EventSchema, extract_events};
//!
//! let schema = EventSchema::new(Contract::Staking, "GGPStaked")?;
//! for log in extract_events(&tx, &schema) {
//!     println!("{} staked {}", log.fields.address("from")?, log.fields.uint("amount")?);
//! }
//! ```

pub mod abi;
pub mod call;
pub mod error;
pub mod extract;
pub mod node_id;
pub mod reader;
pub mod units;
pub mod values;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use abi::Contract;
pub use call::{decode_call, decode_function_name, DecodedCall};
pub use error::{DecodeError, ReadError};
pub use extract::{
    extract_event, extract_events, extract_typed, extract_typed_last, require_event, DecodedLog,
    EventSchema, FromLog, SchemaVariants,
};
pub use node_id::{
    node_hex_to_id, node_id_from_address, node_id_to_address, parse_node_id, shorten_node_id,
    NodeIdError,
};
pub use reader::ContractReader;
pub use values::Fields;
