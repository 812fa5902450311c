//! Slack Block Kit messages for hardware and minipool operations.

use alloy_primitives::{Address, B256, U256};
use chainrelay_core::{Network, SlackMessage};
use chainrelay_evm::units::{format_ether, whole_days};
use serde_json::{json, Value};

fn header(text: &str) -> Value {
    json!({
        "type": "header",
        "text": { "type": "plain_text", "text": text, "emoji": true },
    })
}

fn section(text: String) -> Value {
    json!({
        "type": "section",
        "text": { "type": "mrkdwn", "text": text },
    })
}

fn button(text: &str, url: String, action_id: &str) -> Value {
    json!({
        "type": "button",
        "text": { "type": "plain_text", "emoji": true, "text": text },
        "url": url,
        "action_id": action_id,
    })
}

fn duration_and_payment(duration_secs: u64, payment: U256) -> Value {
    json!({
        "type": "context",
        "elements": [
            { "type": "mrkdwn", "text": format!("*Duration:* {} days", whole_days(duration_secs)) },
            { "type": "mrkdwn", "text": "|" },
            { "type": "mrkdwn", "text": format!("*Payment:* {} AVAX", format_ether(payment)) },
        ],
    })
}

fn titled(network: Network, mainnet: &str, testnet: &str) -> Value {
    if network.is_testnet() {
        header(testnet)
    } else {
        header(mainnet)
    }
}

fn address_text(address: &Address) -> String {
    address.to_checksum(None)
}

/// One rental group: every node a user rented through one provider in one transaction.
#[derive(Debug, Clone)]
pub struct RentalSummary<'a> {
    pub network: Network,
    pub tx_hash: &'a str,
    pub user: Address,
    pub node_ids: &'a [String],
    pub provider_name: &'a str,
    pub duration_secs: u64,
    pub payment: U256,
}

impl RentalSummary<'_> {
    fn node_list(&self) -> String {
        self.node_ids.join("`, `")
    }

    fn buttons(&self) -> Value {
        json!({
            "type": "actions",
            "elements": [
                button(":snowman: Transaction", self.network.tx_url(self.tx_hash), "transaction-hash-link"),
                button(
                    ":bust_in_silhouette: User",
                    self.network.address_url(&address_text(&self.user)),
                    "user-link",
                ),
            ],
        })
    }
}

pub fn hardware_rented(rental: &RentalSummary<'_>) -> SlackMessage {
    SlackMessage {
        blocks: vec![
            titled(
                rental.network,
                ":computer: Hardware Rented",
                ":female-construction-worker::computer: Hardware Rented (Testnet)",
            ),
            duration_and_payment(rental.duration_secs, rental.payment),
            rental.buttons(),
            section(format!("*Node ID:* `{}`", rental.node_list())),
            section(format!("*Hardware Provider:* {}", rental.provider_name)),
        ],
    }
}

/// Rental on a subnet, posted to the provider's own channel.
pub fn coqnet_hardware_rented(
    rental: &RentalSummary<'_>,
    subnet_name: &str,
    subnet_id: &B256,
) -> SlackMessage {
    SlackMessage {
        blocks: vec![
            titled(
                rental.network,
                &format!(":computer: Hardware Rented on {subnet_name}"),
                &format!(":female-construction-worker::computer: Hardware Rented on {subnet_name} (Testnet)"),
            ),
            duration_and_payment(rental.duration_secs, rental.payment),
            rental.buttons(),
            section(format!("*Node IDs:* `{}`", rental.node_list())),
            section(format!("*Hardware Provider:* {}", rental.provider_name)),
            section(format!("*Subnet:* {subnet_name} `{subnet_id}`")),
        ],
    }
}

/// A minipool operation tied to an owner and a validator.
#[derive(Debug, Clone)]
pub struct MinipoolSummary<'a> {
    pub network: Network,
    pub tx_hash: &'a str,
    pub owner: Address,
    pub node_id: &'a str,
    pub provider_name: &'a str,
}

impl MinipoolSummary<'_> {
    fn blocks(&self, header_block: Value) -> SlackMessage {
        SlackMessage {
            blocks: vec![
                header_block,
                json!({
                    "type": "actions",
                    "elements": [
                        button(":snowman: Transaction", self.network.tx_url(self.tx_hash), "transaction-hash-link"),
                        button(
                            ":bust_in_silhouette: Owner",
                            self.network.address_url(&address_text(&self.owner)),
                            "owner-link",
                        ),
                        button(":closed_umbrella: Validator", self.network.validator_url(self.node_id), "node-id-link"),
                    ],
                }),
                section(format!("*Node ID:* `{}`", self.node_id)),
                section(format!("*Hardware Provider:* {}", self.provider_name)),
            ],
        }
    }
}

pub fn minipool_launched(minipool: &MinipoolSummary<'_>) -> SlackMessage {
    minipool.blocks(titled(
        minipool.network,
        ":rocket: Minipool Launched",
        ":female-construction-worker: :rocket: Minipool Launched (Testnet)",
    ))
}

pub fn undercollateralized(minipool: &MinipoolSummary<'_>) -> SlackMessage {
    minipool.blocks(titled(
        minipool.network,
        ":warning: Minipool Undercollateralized",
        ":female-construction-worker: :warning: Minipool Undercollateralized (Testnet)",
    ))
}
