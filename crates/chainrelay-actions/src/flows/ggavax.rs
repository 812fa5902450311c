use async_trait::async_trait;
use chainrelay_core::{
    ActionError, DeliveryHints, Notification, NotificationPayload, TransactionEvent,
};
use chainrelay_evm::{extract_typed_last, Contract};

use super::{schema, sender};
use crate::action::Action;
use crate::events::{VaultDeposit, VaultWithdraw};
use crate::reads::{ggavax_info, GgAvaxInfo};
use crate::services::Services;
use crate::templates::discord::{ggavax_deposit, ggavax_withdraw, LiquidStakingView};

#[derive(Debug, Clone, PartialEq)]
pub enum LiquidStakingEvent {
    Deposit(VaultDeposit),
    Withdraw(VaultWithdraw),
}

/// AVAX deposited into, or withdrawn from, the ggAVAX liquid staking pool.
pub struct GgAvaxAction;

#[async_trait]
impl Action for GgAvaxAction {
    type Event = LiquidStakingEvent;
    type Enrichment = GgAvaxInfo;

    fn name(&self) -> &'static str {
        "ggavax"
    }

    fn extract(
        &self,
        _services: &Services,
        tx: &TransactionEvent,
    ) -> Result<Option<LiquidStakingEvent>, ActionError> {
        if let Some(e) = extract_typed_last(tx, &schema(Contract::TokenggAvax, "Deposit")?) {
            return Ok(Some(LiquidStakingEvent::Deposit(e)));
        }
        if let Some(e) = extract_typed_last(tx, &schema(Contract::TokenggAvax, "Withdraw")?) {
            return Ok(Some(LiquidStakingEvent::Withdraw(e)));
        }
        Err(ActionError::EventNotFound {
            event: "Deposit or Withdraw".into(),
        })
    }

    async fn enrich(
        &self,
        services: &Services,
        _event: &LiquidStakingEvent,
    ) -> Result<GgAvaxInfo, ActionError> {
        let token = services.address(Contract::TokenggAvax)?;
        Ok(ggavax_info(services.reader()?, token).await?)
    }

    fn compose(
        &self,
        services: &Services,
        tx: &TransactionEvent,
        event: &LiquidStakingEvent,
        pool: GgAvaxInfo,
    ) -> Result<Vec<Notification>, ActionError> {
        let assets = match event {
            LiquidStakingEvent::Deposit(d) => d.assets,
            LiquidStakingEvent::Withdraw(w) => w.assets,
        };
        let view = LiquidStakingView {
            network: tx.network,
            tx_hash: &tx.hash,
            from: sender(tx)?,
            assets,
            available: pool.amount_available_for_staking,
        };
        let message = match event {
            LiquidStakingEvent::Deposit(_) => ggavax_deposit(&view),
            LiquidStakingEvent::Withdraw(_) => ggavax_withdraw(&view),
        };
        Ok(vec![Notification::new(
            NotificationPayload::new().with_chat(message),
            DeliveryHints::new(services.network()),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::execute;
    use crate::flows::fixtures;
    use alloy_primitives::{Address, U256};
    use chainrelay_evm::testing::{encode_log, encode_output, uint, uint256, word_address, ScriptedCaller};
    use chainrelay_sinks::testing::RecordingTransport;
    use std::sync::Arc;

    fn ether(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
    }

    fn withdraw_tx() -> TransactionEvent {
        let who = Address::repeat_byte(0x44);
        fixtures::tx().with_log(encode_log(
            Contract::TokenggAvax,
            "Withdraw",
            &fixtures::emitter(),
            &[word_address(who), word_address(who), word_address(who)],
            &[uint256(ether(3)), uint256(ether(2))],
        ))
    }

    #[tokio::test]
    async fn withdraw_reads_pool_state() {
        let caller = ScriptedCaller::new()
            .reply(
                Contract::TokenggAvax,
                "amountAvailableForStaking",
                encode_output(vec![uint256(ether(700))]),
            )
            .reply(
                Contract::TokenggAvax,
                "stakingTotalAssets",
                encode_output(vec![uint(0)]),
            );
        let transport = Arc::new(RecordingTransport::new());
        let services = fixtures::services(caller, transport.clone());

        let report = execute(&GgAvaxAction, &services, &withdraw_tx()).await.unwrap();
        assert_eq!(report.sent(), 1);
        let description = transport.requests()[0].body["embeds"][0]["description"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(description.starts_with(
            "⬇️ **3.0000 AVAX** Drained from Liquid Staking Pool (**700 AVAX**)"
        ));
    }
}
