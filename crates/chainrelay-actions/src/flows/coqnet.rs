//! Hardware rentals on subnets, posted to the provider's Slack channel.

use async_trait::async_trait;
use chainrelay_core::{
    ActionError, DeliveryHints, Notification, NotificationPayload, TransactionEvent,
};
use futures::future::try_join_all;

use super::hardware::{extract_groups, RentalGroup};
use crate::action::Action;
use crate::config::RelayConfig;
use crate::services::Services;
use crate::templates::slack;

/// Display name of the group's subnet. Unknown subnets show as hex.
fn subnet_name(config: &RelayConfig, group: &RentalGroup) -> Result<String, ActionError> {
    match config.subnet(&group.subnet_id) {
        Some(subnet) if subnet.unsupported => Err(ActionError::Unsupported {
            reason: format!("{} subnet is not supported", subnet.name),
        }),
        Some(subnet) => Ok(subnet.name.clone()),
        None => Ok(format!("{}", group.subnet_id)),
    }
}

pub struct CoqnetRentedAction;

#[async_trait]
impl Action for CoqnetRentedAction {
    type Event = Vec<RentalGroup>;
    /// Slack URL of each group's provider, in group order.
    type Enrichment = Vec<Option<String>>;

    fn name(&self) -> &'static str {
        "coqnet-hardware-rented"
    }

    fn extract(
        &self,
        services: &Services,
        tx: &TransactionEvent,
    ) -> Result<Option<Vec<RentalGroup>>, ActionError> {
        let groups = extract_groups(tx)?;
        // One unsupported rental rejects the whole transaction.
        for group in &groups {
            subnet_name(services.config(), group)?;
        }
        Ok(Some(groups))
    }

    async fn enrich(
        &self,
        services: &Services,
        groups: &Vec<RentalGroup>,
    ) -> Result<Vec<Option<String>>, ActionError> {
        try_join_all(
            groups
                .iter()
                .map(|g| services.provider_slack_url(&g.hardware_provider)),
        )
        .await
    }

    fn compose(
        &self,
        services: &Services,
        tx: &TransactionEvent,
        groups: &Vec<RentalGroup>,
        slack_urls: Vec<Option<String>>,
    ) -> Result<Vec<Notification>, ActionError> {
        let config = services.config();

        let subnet_names = groups
            .iter()
            .map(|group| subnet_name(config, group))
            .collect::<Result<Vec<_>, _>>()?;

        groups
            .iter()
            .zip(subnet_names)
            .zip(slack_urls)
            .map(|((group, subnet_name), url)| {
                let provider_name = config.provider_name(&group.hardware_provider);
                let url = url.ok_or_else(|| ActionError::RoutingUnresolved {
                    destination: "slack".into(),
                    key: provider_name.clone(),
                    network: services.network().to_string(),
                })?;
                let node_ids = group.display_node_ids();
                let message = slack::coqnet_hardware_rented(
                    &group.summary(tx, &node_ids, &provider_name),
                    &subnet_name,
                    &group.subnet_id,
                );
                Ok(Notification::new(
                    NotificationPayload::new().with_slack(message),
                    DeliveryHints::new(services.network()).with_slack_url(url),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ARTIFACT_PROVIDER_ID, CHORUS_ONE_PROVIDER_ID, COQNET_SUBNET_ID};
    use crate::flows::fixtures;
    use crate::events::HardwareRented;
    use crate::flows::group_by_user;
    use alloy_primitives::{Address, B256, U256};
    use chainrelay_evm::testing::ScriptedCaller;
    use chainrelay_sinks::testing::RecordingTransport;
    use std::sync::Arc;

    fn groups(provider: B256, subnet: B256) -> Vec<RentalGroup> {
        group_by_user(vec![HardwareRented {
            user: Address::repeat_byte(0x11),
            node_id: Address::repeat_byte(0x22),
            hardware_provider: provider,
            duration: U256::from(86_400u64 * 30),
            payment: U256::from(10u64).pow(U256::from(18u64)),
            subnet_id: subnet,
        }])
    }

    fn services() -> Services {
        fixtures::services(ScriptedCaller::new(), Arc::new(RecordingTransport::new()))
    }

    #[test]
    fn coqnet_rental_routes_to_provider_channel() {
        let s = services();
        let out = CoqnetRentedAction
            .compose(
                &s,
                &fixtures::tx(),
                &groups(ARTIFACT_PROVIDER_ID, COQNET_SUBNET_ID),
                vec![Some("https://hooks.slack.test/artifact".into())],
            )
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(
            out[0].hints.slack_url.as_deref(),
            Some("https://hooks.slack.test/artifact")
        );
        let blocks = &out[0].payload.slack.as_ref().unwrap().blocks;
        assert_eq!(
            blocks[0]["text"]["text"],
            ":female-construction-worker::computer: Hardware Rented on CoqNet (Testnet)"
        );
        assert!(out[0].payload.workflow.is_none());
    }

    #[test]
    fn primary_network_is_rejected_before_routing() {
        let err = CoqnetRentedAction
            .compose(
                &services(),
                &fixtures::tx(),
                &groups(CHORUS_ONE_PROVIDER_ID, B256::ZERO),
                vec![None],
            )
            .unwrap_err();
        match err {
            ActionError::Unsupported { reason } => {
                assert_eq!(reason, "Avalanche subnet is not supported")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_channel_is_a_routing_error() {
        let err = CoqnetRentedAction
            .compose(
                &services(),
                &fixtures::tx(),
                &groups(CHORUS_ONE_PROVIDER_ID, COQNET_SUBNET_ID),
                vec![None],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ActionError::RoutingUnresolved { ref key, .. } if key == "ChorusOne"
        ));
    }

    #[test]
    fn unknown_subnet_is_shown_as_hex() {
        let subnet = B256::repeat_byte(0x5c);
        let out = CoqnetRentedAction
            .compose(
                &services(),
                &fixtures::tx(),
                &groups(ARTIFACT_PROVIDER_ID, subnet),
                vec![Some("https://hooks.slack.test/a".into())],
            )
            .unwrap();
        let blocks = &out[0].payload.slack.as_ref().unwrap().blocks;
        assert_eq!(
            blocks[5]["text"]["text"],
            format!("*Subnet:* {subnet} `{subnet}`")
        );
    }
}
