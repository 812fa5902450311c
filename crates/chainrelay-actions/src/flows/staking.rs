use alloy_primitives::Address;
use async_trait::async_trait;
use chainrelay_core::{
    ActionError, DeliveryHints, Notification, NotificationPayload, TransactionEvent,
};
use chainrelay_evm::{extract_typed_last, Contract};
use tracing::debug;

use super::schema;
use crate::action::Action;
use crate::events::{GgpStaked, GgpWithdrawn};
use crate::reads::{staker_info, StakerInfo};
use crate::services::Services;
use crate::templates::discord::{ggp_staked, ggp_withdrawn, StakeView};

#[derive(Debug, Clone, PartialEq)]
pub enum StakeEvent {
    Staked(GgpStaked),
    Withdrawn(GgpWithdrawn),
}

impl StakeEvent {
    fn staker(&self) -> Address {
        match self {
            Self::Staked(e) => e.from,
            Self::Withdrawn(e) => e.to,
        }
    }
}

/// GGP staked to, or withdrawn from, the staking contract.
pub struct StakingAction;

#[async_trait]
impl Action for StakingAction {
    type Event = StakeEvent;
    type Enrichment = StakerInfo;

    fn name(&self) -> &'static str {
        "staking"
    }

    fn extract(
        &self,
        _services: &Services,
        tx: &TransactionEvent,
    ) -> Result<Option<StakeEvent>, ActionError> {
        if let Some(e) = extract_typed_last(tx, &schema(Contract::Staking, "GGPStaked")?) {
            return Ok(Some(StakeEvent::Staked(e)));
        }
        if let Some(e) = extract_typed_last(tx, &schema(Contract::Staking, "GGPWithdrawn")?) {
            return Ok(Some(StakeEvent::Withdrawn(e)));
        }
        Err(ActionError::EventNotFound {
            event: "GGPStaked or GGPWithdrawn".into(),
        })
    }

    async fn enrich(
        &self,
        services: &Services,
        event: &StakeEvent,
    ) -> Result<StakerInfo, ActionError> {
        let staking = services.address(Contract::Staking)?;
        let info = staker_info(services.reader()?, staking, event.staker()).await?;
        debug!(staker = %info.staker, operator = info.is_node_operator(), "staker loaded");
        Ok(info)
    }

    fn compose(
        &self,
        services: &Services,
        tx: &TransactionEvent,
        event: &StakeEvent,
        staker: StakerInfo,
    ) -> Result<Vec<Notification>, ActionError> {
        let amount = match event {
            StakeEvent::Staked(e) => e.amount,
            StakeEvent::Withdrawn(e) => e.amount,
        };
        let view = StakeView {
            network: tx.network,
            tx_hash: &tx.hash,
            staker: staker.staker,
            amount,
            total_stake: staker.ggp_staked,
            is_node_operator: staker.is_node_operator(),
        };
        let message = match event {
            StakeEvent::Staked(_) => ggp_staked(&view),
            StakeEvent::Withdrawn(_) => ggp_withdrawn(&view),
        };
        Ok(vec![Notification::new(
            NotificationPayload::new().with_chat(message),
            DeliveryHints::new(services.network()),
        )])
    }
}
