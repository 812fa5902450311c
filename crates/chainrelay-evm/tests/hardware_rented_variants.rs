//! Historical `HardwareRented` layouts decoded through `SchemaVariants`.

use alloy_core::dyn_abi::DynSolValue;
use alloy_primitives::{Address, B256, U256};
use chainrelay_core::{Network, RawLog, TransactionEvent};
use chainrelay_evm::{Contract, DecodeError, DecodedLog, EventSchema, SchemaVariants};

#[derive(Debug, PartialEq)]
struct Rental {
    user: Address,
    node: Address,
    payment: U256,
    subnet: B256,
}

fn legacy(log: &DecodedLog) -> Result<Rental, DecodeError> {
    Ok(Rental {
        user: log.fields.address("user")?,
        node: log.fields.address("nodeID")?,
        payment: log.fields.uint("payment")?,
        subnet: B256::ZERO,
    })
}

fn current(log: &DecodedLog) -> Result<Rental, DecodeError> {
    Ok(Rental {
        user: log.fields.address("user")?,
        node: log.fields.address("nodeID")?,
        payment: log.fields.uint("paymentAmount")?,
        subnet: log.fields.b256("subnetID")?,
    })
}

fn variants() -> SchemaVariants<Rental> {
    SchemaVariants::new()
        .variant(
            EventSchema::new(Contract::ArtifactHardwareProvider, "HardwareRented").unwrap(),
            legacy,
        )
        .variant(
            EventSchema::new(Contract::ArtifactHardwareProviderNew, "HardwareRented").unwrap(),
            current,
        )
}

fn hex_word(w: B256) -> String {
    format!("0x{}", hex::encode(w))
}

fn rented_log(contract: Contract, user: Address, node: Address, body: Vec<DynSolValue>) -> RawLog {
    let event = contract.event("HardwareRented").unwrap();
    RawLog {
        address: "0x00000000000000000000000000000000000000c1".into(),
        topics: vec![
            hex_word(event.selector()),
            hex_word(user.into_word()),
            hex_word(node.into_word()),
            hex_word(B256::repeat_byte(0x9e)),
        ],
        data: format!("0x{}", hex::encode(DynSolValue::Tuple(body).abi_encode_params())),
    }
}

fn amount(v: u64) -> DynSolValue {
    DynSolValue::Uint(U256::from(v), 256)
}

fn tx(logs: Vec<RawLog>) -> TransactionEvent {
    let mut tx = TransactionEvent::new("0xabc", "0x01", Network::Fuji);
    tx.logs = logs;
    tx
}

#[test]
fn legacy_only_logs_normalise_with_zero_subnet() {
    let user = Address::repeat_byte(1);
    let node = Address::repeat_byte(2);
    let out = variants().extract(&tx(vec![rented_log(
        Contract::ArtifactHardwareProvider,
        user,
        node,
        vec![amount(1_209_600), amount(500)],
    )]));
    assert_eq!(
        out,
        vec![Rental {
            user,
            node,
            payment: U256::from(500u64),
            subnet: B256::ZERO
        }]
    );
}

#[test]
fn current_layout_used_when_no_legacy_log_matches() {
    let subnet = B256::repeat_byte(0x08);
    let out = variants().extract(&tx(vec![rented_log(
        Contract::ArtifactHardwareProviderNew,
        Address::repeat_byte(3),
        Address::repeat_byte(4),
        vec![amount(86_400), amount(7), DynSolValue::FixedBytes(subnet, 32)],
    )]));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].subnet, subnet);
    assert_eq!(out[0].payment, U256::from(7u64));
}

#[test]
fn mixed_layouts_never_merge() {
    let out = variants().extract(&tx(vec![
        rented_log(
            Contract::ArtifactHardwareProviderNew,
            Address::repeat_byte(5),
            Address::repeat_byte(6),
            vec![amount(1), amount(2), DynSolValue::FixedBytes(B256::ZERO, 32)],
        ),
        rented_log(
            Contract::ArtifactHardwareProvider,
            Address::repeat_byte(7),
            Address::repeat_byte(8),
            vec![amount(1), amount(3)],
        ),
    ]));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].user, Address::repeat_byte(7));
}
