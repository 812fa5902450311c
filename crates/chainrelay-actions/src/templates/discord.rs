//! Discord messages for every protocol event the relay reports.
//!
//! Each template is a pure function of decoded event data and enrichment
//! reads. Links follow the network the transaction was observed on.

use alloy_primitives::{Address, U256};
use chainrelay_core::{ChatMessage, Network};
use chainrelay_evm::node_id_from_address;
use chainrelay_evm::shorten_node_id;
use chainrelay_evm::units::display_amount;

use super::format::{
    avax_display, chat_message, discord_time, ggp_display, local_datetime, ordinal, short_address,
    Embed, EmbedField, LinkButton,
};
use crate::events::VaultEvent;
use crate::reads::RewardsInfo;

const DOCS: &str = "\n[📄 the life of a minipool](https://docs.gogopool.com/minipool/how-minipool-works) [📄 minipool statuses](https://docs.gogopool.com/minipool/minipool-statuses)";
const GGP_REWARDS_DOCS: &str =
    "[📄 GGP rewards](https://docs.gogopool.com/minipool/how-minipool-works#ggp-rewards-eligibility-and-distribution)";
const REWARDS_DOCS: &str =
    "[📄 GGP Rewards](https://docs.gogopool.com/minipool/how-minipool-works#ggp-rewards-eligibility-and-distribution)";
const SEAFI_VAULT: &str = "[SeaFi Vault](https://seafi.app)";
const VAULT_STRATEGY_DOCS: &str =
    "[📄 vault strategy](https://docs.seafi.app/overview/vault-strategy-node-operation)";

fn pilot_button(network: Network, owner: &Address) -> LinkButton {
    LinkButton::new("🧑‍✈️", "Pilot", network.address_url(&owner.to_checksum(None)))
}

fn balloon_button(network: Network, node_id: &str) -> LinkButton {
    LinkButton::new("🎈", "Balloon", network.validator_url(node_id))
}

fn transaction_button(network: Network, tx_hash: &str) -> LinkButton {
    LinkButton::new("📝", "Transaction", network.tx_url(tx_hash))
}

fn pilot_field(owner: &Address) -> EmbedField {
    EmbedField::new("🧑‍✈️ pilot", short_address(owner))
}

fn ggp_amount_field(name: &str, amount: U256) -> EmbedField {
    EmbedField::new(name, format!("{} GGP", display_amount(amount, 0)))
}

/// `[0x1234...abcd](explorer)`
fn address_link(network: Network, address: &Address) -> String {
    format!(
        "[{}]({})",
        short_address(address),
        network.address_url(&address.to_checksum(None))
    )
}

/// The minipool status templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinipoolTemplate {
    Prelaunch,
    StreamlinePrelaunch,
    Launch,
    Staking,
    Withdrawable,
    Finished,
    Canceled,
    Error,
    Restake { streamlined: bool },
}

struct MinipoolText {
    title: &'static str,
    description: String,
    status: &'static str,
    footer: &'static str,
    shows_end_time: bool,
    color: u32,
}

impl MinipoolTemplate {
    fn text(self) -> MinipoolText {
        let docs = |body: &str| format!("{body}{DOCS}");
        let calm = 0x7ddbd5;
        let alarm = 0x33b6ae;
        match self {
            Self::Prelaunch => MinipoolText {
                title: "🌄  Preparing for Takeoff",
                description: docs("A minipool is getting ready for a remarkable ride. Node Operator has deposited 1,000 AVAX and is now waiting on liquid staking fuel."),
                status: "prelaunch",
                footer: "prelaunch",
                shows_end_time: false,
                color: calm,
            },
            Self::StreamlinePrelaunch => MinipoolText {
                title: "🖱️  One-Click Launch Initiated",
                description: "With the magic of a single click, all preparations are complete. The Node Operator has started the journey with 1,111 AVAX, bypassing the complexities of traditional setup. Ready for a rewarding flight?\n[📄 One Click Minipool Guide](https://docs.gogopool.com/minipool/how-one-click-launcher-works)".into(),
                status: "prelaunch",
                footer: "one-click",
                shows_end_time: false,
                color: calm,
            },
            Self::Launch => MinipoolText {
                title: "🚀  Inflated and... Lift-off",
                description: docs("Hooray! Matched with liquid staker funds, this minipool has fully inflated, and the pilot has climbed aboard. It appears to be raising up up up. Let's hope for a smooth flight."),
                status: "launched",
                footer: "launched",
                shows_end_time: false,
                color: calm,
            },
            Self::Staking => MinipoolText {
                title: "⛅  Approached Cruising Altitude",
                description: docs("Actively validating and discovering rewards, the minipool floats through the staking skies. It will remain in this lofty state until it's time to land."),
                status: "staking",
                footer: "staking",
                shows_end_time: true,
                color: calm,
            },
            Self::Withdrawable => MinipoolText {
                title: "🌎  Return to Earth",
                description: docs("A minipool ripe with rewards descends, and the time has come to collect the treasures we've found in the sky. Prepare for a gentle glide back to the ground."),
                status: "withdrawable",
                footer: "withdrawable",
                shows_end_time: false,
                color: calm,
            },
            Self::Finished => MinipoolText {
                title: "🎉  Celebrating Success",
                description: docs("A completed and enchanting adventure among the clouds. The minipool is deflated, tokens collected, and memories cherished. Farewell, until we see you again in the staking skies!"),
                status: "finished",
                footer: "finished",
                shows_end_time: true,
                color: calm,
            },
            Self::Canceled => MinipoolText {
                title: "⚠️  A Hasty Halt to our Hovering",
                description: docs("Alas, this minipool's journey has been called off. Heading back to terra firma, tokens in tow. A new adventure awaits, as a new flight awaits."),
                status: "canceled",
                footer: "canceled",
                shows_end_time: true,
                color: alarm,
            },
            Self::Error => MinipoolText {
                title: "❗  Mid-Air Mishap",
                description: docs("Oh dear, it seems the minipool has encountered a hiccup! Fear not, for we shall set things right and resume our whimsical wanderings through the staking skies."),
                status: "error",
                footer: "error",
                shows_end_time: true,
                color: alarm,
            },
            Self::Restake { streamlined } => MinipoolText {
                title: "♻️  Another Adventure Begins",
                description: docs(&format!(
                    "The {}minipool has completed it's flight and is going out for another. Enjoy the ride!",
                    if streamlined { "streamlined " } else { "" }
                )),
                status: "finished -> prelaunch -> launched",
                footer: "launched",
                shows_end_time: false,
                color: calm,
            },
        }
    }
}

/// Everything a minipool status message shows.
#[derive(Debug, Clone)]
pub struct MinipoolView<'a> {
    pub network: Network,
    pub tx_hash: &'a str,
    pub owner: Address,
    pub node_id: Address,
    pub end_time: u64,
}

pub fn minipool_status(template: MinipoolTemplate, view: &MinipoolView<'_>) -> ChatMessage {
    let text = template.text();
    let node_id = node_id_from_address(view.node_id);

    let mut embed = Embed::new()
        .title(text.title)
        .description(text.description)
        .field(pilot_field(&view.owner))
        .field(EmbedField::new("🎈 balloon", shorten_node_id(&node_id)));
    if text.shows_end_time {
        embed = embed.field(EmbedField::new("🕰️ return", local_datetime(view.end_time)));
    }
    let embed = embed
        .field(EmbedField::new("status", text.status))
        .color(text.color)
        .footer(format!("[minipool status change] • {}", text.footer));

    chat_message(
        embed,
        &[
            pilot_button(view.network, &view.owner),
            balloon_button(view.network, &node_id),
            transaction_button(view.network, view.tx_hash),
        ],
    )
}

/// A GGP stake or unstake.
#[derive(Debug, Clone)]
pub struct StakeView<'a> {
    pub network: Network,
    pub tx_hash: &'a str,
    pub staker: Address,
    pub amount: U256,
    pub total_stake: U256,
    pub is_node_operator: bool,
}

pub fn ggp_staked(view: &StakeView<'_>) -> ChatMessage {
    let who = if view.is_node_operator {
        "A Node Operator has staked GGP to their minipool(s)."
    } else {
        "Someone has staked GGP."
    };
    let embed = Embed::new()
        .title("⬆️  GGP Onboarded.")
        .description(format!("{who}\n{GGP_REWARDS_DOCS}"))
        .field(pilot_field(&view.staker))
        .field(ggp_amount_field("stake amount", view.amount))
        .field(ggp_amount_field("total stake", view.total_stake))
        .color(0xcb92d9)
        .footer("[staking] • stake");
    chat_message(
        embed,
        &[
            pilot_button(view.network, &view.staker),
            transaction_button(view.network, view.tx_hash),
        ],
    )
}

pub fn ggp_withdrawn(view: &StakeView<'_>) -> ChatMessage {
    let who = if view.is_node_operator {
        "A Node Operator has unstaked GGP from their minipool(s)."
    } else {
        "Someone has unstaked GGP."
    };
    let embed = Embed::new()
        .title("⬇️  GGP Dropped Overboard.")
        .description(format!("{who}\n{GGP_REWARDS_DOCS}"))
        .field(pilot_field(&view.staker).inline(false))
        .field(ggp_amount_field("un-stake amount", view.amount))
        .field(ggp_amount_field("total stake", view.total_stake))
        .color(0xa849c0)
        .footer("[staking] • withdraw");
    chat_message(
        embed,
        &[
            pilot_button(view.network, &view.staker),
            transaction_button(view.network, view.tx_hash),
        ],
    )
}

/// Liquid staking pool movement.
#[derive(Debug, Clone)]
pub struct LiquidStakingView<'a> {
    pub network: Network,
    pub tx_hash: &'a str,
    pub from: Address,
    pub assets: U256,
    pub available: U256,
}

impl LiquidStakingView<'_> {
    fn links(&self, docs: &str) -> String {
        format!(
            "\n\n[⛓️ transaction]({}) {docs} {}",
            self.network.tx_url(self.tx_hash),
            address_link(self.network, &self.from)
        )
    }
}

pub fn ggavax_deposit(view: &LiquidStakingView<'_>) -> ChatMessage {
    let description = format!(
        "⬆️ {} Added to the Liquid Staking Pool ({}){}",
        avax_display(view.assets, 4),
        avax_display(view.available, 0),
        view.links("[📄 liquid staking](https://docs.gogopool.com/liquid-staking/how-liquid-staking-works)")
    );
    chat_message(Embed::new().description(description).color(0x8aa0d1), &[])
}

pub fn ggavax_withdraw(view: &LiquidStakingView<'_>) -> ChatMessage {
    let description = format!(
        "⬇️ {} Drained from Liquid Staking Pool ({}){}",
        avax_display(view.assets, 4),
        avax_display(view.available, 0),
        view.links("[📄 liquid staking](https://docs.gogopool.com/liquid-staking/how-liquid-staking-works)")
    );
    chat_message(Embed::new().description(description).color(0x4363aa), &[])
}

/// One xGGP vault event.
pub fn vault(network: Network, tx_hash: &str, from: &Address, event: &VaultEvent) -> ChatMessage {
    let links = |docs: &str| {
        format!(
            "\n\n[⛓️ transaction]({}) {docs} {}",
            network.tx_url(tx_hash),
            address_link(network, from)
        )
    };
    match event {
        VaultEvent::Deposit(d) => chat_message(
            Embed::new()
                .description(format!(
                    "📥 {} Deposited into the {SEAFI_VAULT}{}",
                    ggp_display(d.assets),
                    links("[📄 vault deposit](https://docs.seafi.app/overview/depositors)")
                ))
                .color(0xaa5566),
            &[],
        ),
        VaultEvent::Withdraw(w) => chat_message(
            Embed::new()
                .description(format!(
                    "📤 {} Redeemed from the {SEAFI_VAULT}{}",
                    ggp_display(w.assets),
                    links("[📄 vault withdraw](https://docs.seafi.app/overview/depositors)")
                ))
                .color(0xaa4950),
            &[],
        ),
        VaultEvent::GgpCapUpdated { new_max } => chat_message(
            Embed::new()
                .title(format!("GGP Cap Updated: {}", ggp_display(*new_max)))
                .color(0xaa4950)
                .footer("[vault] • variables"),
            &[],
        ),
        VaultEvent::TargetAprUpdated { new_target_apr } => {
            // 13 cycles of 28 days per year
            let apy = new_target_apr.saturating_mul(U256::from(13u64)) / U256::from(10_000u64);
            chat_message(
                Embed::new()
                    .title(format!("Target APY Updated: {apy}%"))
                    .color(0xaa4950)
                    .footer("[vault] • variables"),
                &[],
            )
        }
        VaultEvent::WithdrawnForStaking { caller, assets } => chat_message(
            Embed::new()
                .title(format!(
                    "⬆️ {} tokens added by {}.",
                    ggp_display(*assets),
                    caller.to_checksum(None)
                ))
                .description(format!(
                    "Liquidity in the vault has decreased as GGP was delegated to a GoGoPool staker.\n{VAULT_STRATEGY_DOCS}"
                ))
                .color(0xaa5566),
            &[],
        ),
        VaultEvent::DepositedFromStaking { caller, amount } => chat_message(
            Embed::new()
                .title(format!(
                    "⬇️ {} tokens withdrawn by {}.",
                    ggp_display(*amount),
                    caller.to_checksum(None)
                ))
                .description(format!(
                    "Liquidity in the vault has increased as GGP was withdrawn from a GoGoPool staker.\n{VAULT_STRATEGY_DOCS}"
                ))
                .color(0xaa4950),
            &[],
        ),
        VaultEvent::RewardsDistributed { amount } => chat_message(
            Embed::new()
                .title(format!("🎉 {} Rewarded to the Vault", ggp_display(*amount)))
                .description(format!(
                    "Rewards have been claimed and distributed to the {SEAFI_VAULT}, increasing the value of xGGP.\n{VAULT_STRATEGY_DOCS}"
                ))
                .color(0xaa4950)
                .footer("[vault] • rewards"),
            &[transaction_button(network, tx_hash)],
        ),
    }
}

/// Which rewards cycle announcement to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardsAnnouncement {
    NewCycle,
    EligibilityReminder,
    EndingReminder,
}

pub fn rewards(kind: RewardsAnnouncement, info: &RewardsInfo) -> ChatMessage {
    let cycle = ordinal(info.cycle_count.saturating_add(1));
    let start = EmbedField::new("🕐 start time", discord_time(info.cycle_start_time, 'D'));
    let eligibility = EmbedField::new(
        "⌛ eligibility cut-off",
        discord_time(info.eligibility_time(), 'D'),
    );
    let end = EmbedField::new("🏁 end time", discord_time(info.cycle_end_time(), 'D'));
    let total = EmbedField::new(
        "🎉 total rewards",
        format!("{} GGP", display_amount(info.cycle_total_amount, 0)),
    );

    let embed = match kind {
        RewardsAnnouncement::NewCycle => Embed::new()
            .title(format!(
                "💨 ...And They're Off! The {cycle} Great Flight is Underway"
            ))
            .description(format!(
                "The {cycle} GGP rewards cycle has started. Eligible Node Operators can stake GGP to their minipools to earn rewards. This cycle end: {}.\n{REWARDS_DOCS}",
                discord_time(info.cycle_end_time(), 'R')
            ))
            .field(start)
            .field(eligibility)
            .field(end)
            .field(total)
            .footer("[rewards] • start"),
        RewardsAnnouncement::EligibilityReminder => Embed::new()
            .title(format!(
                "ℹ️ Registration Reminder for the {cycle} Great Flight."
            ))
            .description(format!(
                "Eligibility cut-off for the {cycle} rewards period: {}. Your minipool must be registered before this time to be eligible. Node operators with registered minipools will receive a share of this cycle's rewards.\n{REWARDS_DOCS}",
                discord_time(info.eligibility_time(), 'R')
            ))
            .field(eligibility.inline(false))
            .field(end.inline(false))
            .field(total.inline(false))
            .footer("[rewards] • eligibility"),
        RewardsAnnouncement::EndingReminder => Embed::new()
            .title(format!("🏁 Ending Reminder for the {cycle} Great Flight."))
            .description(format!(
                "The {cycle} rewards cycle end: {}. At that time, eligible Node Operators will receive a share of the rewards for the cycle.\n{REWARDS_DOCS}",
                discord_time(info.cycle_end_time(), 'R')
            ))
            .field(start)
            .field(EmbedField::new(
                "⏳ duration",
                format!("{} days", info.cycle_seconds / 86_400),
            ))
            .field(end)
            .field(total)
            .footer("[rewards] • end"),
    };
    chat_message(embed.color(0xaa6343), &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::VaultDeposit;
    use serde_json::json;

    fn ether(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
    }

    fn view() -> MinipoolView<'static> {
        MinipoolView {
            network: Network::Mainnet,
            tx_hash: "0xabc",
            owner: Address::repeat_byte(0x11),
            node_id: Address::repeat_byte(0x22),
            end_time: 1_700_000_000,
        }
    }

    #[test]
    fn staking_template_has_end_time() {
        let msg = minipool_status(MinipoolTemplate::Staking, &view());
        let embed = &msg.embeds[0];
        assert_eq!(embed["title"], "⛅  Approached Cruising Altitude");
        let names: Vec<&str> = embed["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["🧑‍✈️ pilot", "🎈 balloon", "🕰️ return", "status"]);
        assert_eq!(embed["fields"][2]["value"], "11/14/2023, 10:13:20 PM");
        assert_eq!(embed["footer"]["text"], "[minipool status change] • staking");

        let buttons = msg.components[0]["components"].as_array().unwrap();
        assert_eq!(buttons.len(), 3);
        assert_eq!(buttons[2]["url"], "https://snowtrace.io/tx/0xabc");
    }

    #[test]
    fn launch_and_error_templates() {
        let launch = minipool_status(MinipoolTemplate::Launch, &view());
        assert_eq!(launch.embeds[0]["fields"].as_array().unwrap().len(), 3);
        assert_eq!(launch.embeds[0]["color"], json!(0x7ddbd5));

        let error = minipool_status(MinipoolTemplate::Error, &view());
        assert_eq!(error.embeds[0]["color"], json!(0x33b6ae));
    }

    #[test]
    fn restake_mentions_streamlined() {
        let msg = minipool_status(MinipoolTemplate::Restake { streamlined: true }, &view());
        let description = msg.embeds[0]["description"].as_str().unwrap();
        assert!(description.starts_with("The streamlined minipool has completed"));
        assert_eq!(
            msg.embeds[0]["fields"][2]["value"],
            "finished -> prelaunch -> launched"
        );
    }

    #[test]
    fn stake_describes_node_operators() {
        let msg = ggp_staked(&StakeView {
            network: Network::Fuji,
            tx_hash: "0x1",
            staker: Address::repeat_byte(0x33),
            amount: ether(1_500),
            total_stake: ether(12_000),
            is_node_operator: true,
        });
        let embed = &msg.embeds[0];
        assert!(embed["description"]
            .as_str()
            .unwrap()
            .starts_with("A Node Operator has staked GGP"));
        assert_eq!(embed["fields"][1]["value"], "1,500 GGP");
        assert_eq!(embed["fields"][2]["name"], "total stake");
        assert_eq!(
            msg.components[0]["components"][1]["url"],
            "https://testnet.snowtrace.io/tx/0x1"
        );
    }

    #[test]
    fn ggavax_deposit_line() {
        let msg = ggavax_deposit(&LiquidStakingView {
            network: Network::Mainnet,
            tx_hash: "0xdd",
            from: Address::repeat_byte(0x44),
            assets: ether(25),
            available: ether(1_234),
        });
        assert!(msg.components.is_empty());
        let description = msg.embeds[0]["description"].as_str().unwrap();
        assert!(description.starts_with(
            "⬆️ **25.0000 AVAX** Added to the Liquid Staking Pool (**1,234 AVAX**)"
        ));
        assert!(description.contains("[⛓️ transaction](https://snowtrace.io/tx/0xdd)"));
    }

    #[test]
    fn vault_apy_and_deposit() {
        let from = Address::repeat_byte(0x55);
        let apy = vault(
            Network::Mainnet,
            "0x1",
            &from,
            &VaultEvent::TargetAprUpdated {
                new_target_apr: U256::from(1_500u64),
            },
        );
        assert_eq!(apy.embeds[0]["title"], "Target APY Updated: 1%");

        let deposit = vault(
            Network::Mainnet,
            "0x1",
            &from,
            &VaultEvent::Deposit(VaultDeposit {
                sender: from,
                owner: from,
                assets: ether(10),
                shares: ether(9),
            }),
        );
        assert!(deposit.embeds[0]["description"]
            .as_str()
            .unwrap()
            .starts_with("📥 **10 GGP** Deposited into the [SeaFi Vault](https://seafi.app)"));
    }

    #[test]
    fn rewards_cycle_is_next_ordinal() {
        let info = RewardsInfo {
            cycle_start_time: 1_000,
            cycle_seconds: 28 * 86_400,
            cycle_total_amount: ether(50_000),
            cycle_count: 10,
            inflation_amount: U256::ZERO,
            eligibility_min_seconds: 14 * 86_400,
        };
        let msg = rewards(RewardsAnnouncement::NewCycle, &info);
        assert_eq!(
            msg.embeds[0]["title"],
            "💨 ...And They're Off! The 11th Great Flight is Underway"
        );
        assert_eq!(msg.embeds[0]["fields"][3]["value"], "50,000 GGP");

        let ending = rewards(RewardsAnnouncement::EndingReminder, &info);
        assert_eq!(ending.embeds[0]["fields"][1]["value"], "28 days");
        assert_eq!(ending.embeds[0]["color"], json!(0xaa6343));
    }
}
