use async_trait::async_trait;
use chainrelay_core::{
    ActionError, DeliveryHints, Notification, NotificationPayload, TransactionEvent,
    WorkflowTrigger,
};
use chainrelay_evm::{extract_typed_last, node_id_from_address, Contract};
use serde_json::json;
use tracing::info;

use super::{schema, sender};
use crate::action::Action;
use crate::events::MinipoolLaunched;
use crate::services::Services;
use crate::templates::slack::{self, MinipoolSummary};

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderLaunch {
    pub launch: MinipoolLaunched,
    pub provider_name: String,
}

/// A minipool launched on rented hardware. Launches through providers that
/// are not configured to notify are ignored.
pub struct MinipoolLaunchAction;

#[async_trait]
impl Action for MinipoolLaunchAction {
    type Event = ProviderLaunch;
    type Enrichment = ();

    fn name(&self) -> &'static str {
        "minipool-launch"
    }

    fn extract(
        &self,
        services: &Services,
        tx: &TransactionEvent,
    ) -> Result<Option<ProviderLaunch>, ActionError> {
        let launch: MinipoolLaunched =
            extract_typed_last(tx, &schema(Contract::MinipoolManager, "MinipoolLaunched")?)
                .ok_or_else(|| ActionError::EventNotFound {
                    event: "MinipoolLaunched".into(),
                })?;
        match services.config().provider(&launch.hardware_provider) {
            Some(p) if p.notify_launch => Ok(Some(ProviderLaunch {
                provider_name: p.name.clone(),
                launch,
            })),
            provider => {
                info!(
                    provider = %launch.hardware_provider,
                    name = provider.map(|p| p.name.as_str()),
                    "minipool launch ignored for hardware provider"
                );
                Ok(None)
            }
        }
    }

    async fn enrich(&self, _services: &Services, _event: &ProviderLaunch) -> Result<(), ActionError> {
        Ok(())
    }

    fn compose(
        &self,
        services: &Services,
        tx: &TransactionEvent,
        event: &ProviderLaunch,
        _: (),
    ) -> Result<Vec<Notification>, ActionError> {
        let owner = sender(tx)?;
        let node_id = node_id_from_address(event.launch.node_id);
        let message = slack::minipool_launched(&MinipoolSummary {
            network: tx.network,
            tx_hash: &tx.hash,
            owner,
            node_id: &node_id,
            provider_name: &event.provider_name,
        });
        let data = json!({
            "blocks": message.blocks,
            "owner": owner.to_checksum(None),
            "nodeID": node_id,
            "nodeIDHex": event.launch.node_id.to_checksum(None),
            "hardwareProviderName": event.provider_name,
        });
        Ok(vec![Notification::new(
            NotificationPayload::new()
                .with_slack(message)
                .with_workflow(WorkflowTrigger::new(data)),
            DeliveryHints::new(services.network()),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::execute;
    use crate::config::{ARTIFACT_PROVIDER_ID, CHORUS_ONE_PROVIDER_ID};
    use crate::flows::fixtures;
    use alloy_core::dyn_abi::DynSolValue;
    use alloy_primitives::{Address, B256};
    use chainrelay_evm::testing::{encode_log, uint, word_address, ScriptedCaller};
    use chainrelay_sinks::testing::RecordingTransport;
    use std::sync::Arc;

    fn launch_tx(provider: B256) -> TransactionEvent {
        fixtures::tx().with_log(encode_log(
            Contract::MinipoolManager,
            "MinipoolLaunched",
            &fixtures::emitter(),
            &[word_address(Address::repeat_byte(0x22))],
            &[DynSolValue::FixedBytes(provider, 32), uint(1_209_600)],
        ))
    }

    #[tokio::test]
    async fn artifact_launch_triggers_workflow() {
        let transport = Arc::new(RecordingTransport::new());
        let services = fixtures::services(ScriptedCaller::new(), transport.clone());
        let report = execute(&MinipoolLaunchAction, &services, &launch_tx(ARTIFACT_PROVIDER_ID))
            .await
            .unwrap();
        assert_eq!(report.sent(), 1);

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.ends_with("/v1/workflows/new-oneclick-minipool-fuji/trigger"));
        let data = &requests[0].body["data"];
        assert_eq!(data["hardwareProviderName"], "Artifact");
        assert_eq!(data["owner"], fixtures::SENDER.to_checksum(None));
        assert_eq!(data["blocks"][0]["type"], "header");
    }

    #[tokio::test]
    async fn other_providers_are_ignored() {
        let transport = Arc::new(RecordingTransport::new());
        let services = fixtures::services(ScriptedCaller::new(), transport.clone());
        for provider in [B256::ZERO, CHORUS_ONE_PROVIDER_ID, B256::repeat_byte(0x77)] {
            let report = execute(&MinipoolLaunchAction, &services, &launch_tx(provider))
                .await
                .unwrap();
            assert!(report.outcomes.is_empty());
        }
        assert_eq!(transport.count(), 0);
    }
}
