use alloy_primitives::Address;
use async_trait::async_trait;
use chainrelay_core::{
    ActionError, DeliveryHints, Notification, NotificationPayload, TransactionEvent,
    WorkflowTrigger,
};
use chainrelay_evm::{decode_call, decode_function_name, node_id_from_address, Contract};
use serde_json::json;
use tracing::debug;

use crate::action::Action;
use crate::reads::{minipool_by_node_id, Minipool};
use crate::services::Services;
use crate::templates::slack::{self, MinipoolSummary};

const EJECTION_WORKFLOW: &str = "minipool-ejection";

/// A stake recorded as ended, checked for ejection. Only `recordStakingEnd`
/// calls are reported.
pub struct UndercollateralizedAction;

#[async_trait]
impl Action for UndercollateralizedAction {
    type Event = Address;
    type Enrichment = Minipool;

    fn name(&self) -> &'static str {
        "undercollateralized"
    }

    fn extract(
        &self,
        _services: &Services,
        tx: &TransactionEvent,
    ) -> Result<Option<Address>, ActionError> {
        match decode_function_name(Contract::MinipoolManager, &tx.input) {
            Ok(name) if name == "recordStakingEnd" => {}
            Ok(name) => {
                debug!(function = %name, "not a recordStakingEnd call");
                return Ok(None);
            }
            Err(e) => {
                debug!(error = %e, "calldata is not a MinipoolManager call");
                return Ok(None);
            }
        }
        let invalid = |e: chainrelay_evm::DecodeError| ActionError::InvalidTrigger {
            reason: format!("recordStakingEnd calldata: {e}"),
        };
        let call = decode_call(Contract::MinipoolManager, &tx.input).map_err(invalid)?;
        Ok(Some(call.args.address("nodeID").map_err(invalid)?))
    }

    async fn enrich(&self, services: &Services, node_id: &Address) -> Result<Minipool, ActionError> {
        let manager = services.address(Contract::MinipoolManager)?;
        Ok(minipool_by_node_id(services.reader()?, manager, *node_id).await?)
    }

    fn compose(
        &self,
        services: &Services,
        tx: &TransactionEvent,
        node_id: &Address,
        minipool: Minipool,
    ) -> Result<Vec<Notification>, ActionError> {
        let config = services.config();
        if config
            .provider(&minipool.hardware_provider)
            .is_some_and(|p| !p.notify_undercollateralized)
        {
            return Err(ActionError::Unsupported {
                reason: "not tracked ; undercollateralized".into(),
            });
        }
        let provider_name = config.provider_name(&minipool.hardware_provider);
        let display_id = node_id_from_address(*node_id);
        let message = slack::undercollateralized(&MinipoolSummary {
            network: tx.network,
            tx_hash: &tx.hash,
            owner: minipool.owner,
            node_id: &display_id,
            provider_name: &provider_name,
        });
        let data = json!({
            "blocks": message.blocks,
            "user": minipool.owner.to_checksum(None),
            "nodeID": display_id,
            "nodeIDHex": node_id.to_checksum(None),
            "hardwareProviderName": provider_name,
            "duration": minipool.duration.to_string(),
        });
        Ok(vec![Notification::new(
            NotificationPayload::new()
                .with_slack(message)
                .with_workflow(WorkflowTrigger::new(data).with_key(EJECTION_WORKFLOW)),
            DeliveryHints::new(services.network()),
        )])
    }
}
