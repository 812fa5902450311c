//! The notification flows.

mod coqnet;
mod ggavax;
mod hardware;
mod launch;
mod minipool;
pub mod rewards;
mod staking;
mod undercollateralized;
mod vault;

pub use coqnet::CoqnetRentedAction;
pub use ggavax::{GgAvaxAction, LiquidStakingEvent};
pub use hardware::{group_by_user, HardwareRentedAction, RentalGroup};
pub use launch::MinipoolLaunchAction;
pub use minipool::{classify, MinipoolStatus, MinipoolStatusAction, StatusChanges};
pub use rewards::{check_rewards_periodic, rewards_type, RewardsType};
pub use staking::{StakeEvent, StakingAction};
pub use undercollateralized::UndercollateralizedAction;
pub use vault::VaultAction;

use alloy_primitives::Address;
use chainrelay_core::{ActionError, TransactionEvent};
use chainrelay_evm::{Contract, EventSchema};
use std::str::FromStr;

pub(crate) fn schema(contract: Contract, event: &str) -> Result<EventSchema, ActionError> {
    EventSchema::new(contract, event).map_err(|e| ActionError::Config {
        reason: format!("{contract} ABI: {e}"),
    })
}

/// The transaction sender as an address.
pub(crate) fn sender(tx: &TransactionEvent) -> Result<Address, ActionError> {
    Address::from_str(&tx.from).map_err(|e| ActionError::InvalidTrigger {
        reason: format!("sender '{}' is not an address: {e}", tx.from),
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::config::RelayConfig;
    use crate::services::Services;
    use alloy_primitives::Address;
    use chainrelay_core::{MapSecrets, Network, TransactionEvent};
    use chainrelay_evm::testing::ScriptedCaller;
    use chainrelay_sinks::testing::RecordingTransport;
    use std::sync::Arc;

    pub const SENDER: Address = Address::repeat_byte(0xa0);
    pub const MINIPOOL_MANAGER: Address = Address::repeat_byte(0xb1);
    pub const STAKING: Address = Address::repeat_byte(0xb2);
    pub const TOKENGG_AVAX: Address = Address::repeat_byte(0xb3);
    pub const REWARDS_POOL: Address = Address::repeat_byte(0xb4);
    pub const PROTOCOL_DAO: Address = Address::repeat_byte(0xb5);

    pub fn config() -> RelayConfig {
        let mut config = RelayConfig::default();
        config.network = Network::Fuji;
        let book = &mut config.deployments.fuji;
        book.minipool_manager = Some(MINIPOOL_MANAGER);
        book.staking = Some(STAKING);
        book.tokengg_avax = Some(TOKENGG_AVAX);
        book.rewards_pool = Some(REWARDS_POOL);
        book.protocol_dao = Some(PROTOCOL_DAO);
        config
    }

    pub fn secrets() -> MapSecrets {
        MapSecrets::new()
            .with("PROD_WEBHOOK_URL", "https://discord.test/hook")
            .with("FUJI_WEBHOOK_URL", "https://hooks.test/fuji")
            .with("KNOCK_TOKEN", "sk_test")
            .with("ARTIFACT_SLACK_URL_FUJI", "https://hooks.slack.test/artifact")
    }

    pub fn services(caller: ScriptedCaller, transport: Arc<RecordingTransport>) -> Services {
        Services::builder(config())
            .secrets(Arc::new(secrets()))
            .transport(transport)
            .eth_caller(Arc::new(caller))
            .build()
            .unwrap()
    }

    pub fn tx() -> TransactionEvent {
        TransactionEvent::new(
            "0x00000000000000000000000000000000000000000000000000000000000000aa",
            SENDER.to_checksum(None),
            Network::Fuji,
        )
    }

    pub fn emitter() -> String {
        Address::repeat_byte(0xee).to_checksum(None)
    }
}
