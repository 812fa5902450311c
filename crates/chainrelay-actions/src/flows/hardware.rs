//! Validator hardware rentals.

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use chainrelay_core::{
    ActionError, DeliveryHints, Notification, NotificationPayload, SlackMessage, TransactionEvent,
    WorkflowTrigger,
};
use chainrelay_evm::node_id_from_address;
use indexmap::IndexMap;
use serde_json::{json, Value};
use tracing::debug;

use crate::action::Action;
use crate::events::HardwareRented;
use crate::services::Services;
use crate::templates::slack::{self, RentalSummary};

/// Every rental one user made through one provider on one subnet in a
/// transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct RentalGroup {
    pub user: Address,
    pub node_ids: Vec<Address>,
    pub hardware_provider: B256,
    /// Duration of the group's first rental.
    pub duration: U256,
    pub subnet_id: B256,
    pub payment: U256,
}

impl RentalGroup {
    pub fn display_node_ids(&self) -> Vec<String> {
        self.node_ids.iter().copied().map(node_id_from_address).collect()
    }

    pub fn duration_secs(&self) -> u64 {
        u64::try_from(self.duration).unwrap_or(u64::MAX)
    }

    pub(crate) fn summary<'a>(
        &self,
        tx: &'a TransactionEvent,
        node_ids: &'a [String],
        provider_name: &'a str,
    ) -> RentalSummary<'a> {
        RentalSummary {
            network: tx.network,
            tx_hash: &tx.hash,
            user: self.user,
            node_ids,
            provider_name,
            duration_secs: self.duration_secs(),
            payment: self.payment,
        }
    }
}

/// Group rentals by user in first-appearance order, summing each group's
/// payments. Rentals through another provider or on another subnet start a
/// group of their own, so routing and labels never mix.
pub fn group_by_user(rentals: Vec<HardwareRented>) -> Vec<RentalGroup> {
    let mut groups: IndexMap<(Address, B256, B256), RentalGroup> = IndexMap::new();
    for rental in rentals {
        groups
            .entry((rental.user, rental.hardware_provider, rental.subnet_id))
            .and_modify(|g| {
                g.node_ids.push(rental.node_id);
                g.payment = g.payment.saturating_add(rental.payment);
            })
            .or_insert_with(|| RentalGroup {
                user: rental.user,
                node_ids: vec![rental.node_id],
                hardware_provider: rental.hardware_provider,
                duration: rental.duration,
                subnet_id: rental.subnet_id,
                payment: rental.payment,
            });
    }
    groups.into_values().collect()
}

pub(crate) fn extract_groups(tx: &TransactionEvent) -> Result<Vec<RentalGroup>, ActionError> {
    let variants = HardwareRented::variants().map_err(|e| ActionError::Config {
        reason: format!("hardware provider ABI: {e}"),
    })?;
    let groups = group_by_user(variants.extract(tx));
    if groups.is_empty() {
        return Err(ActionError::EventNotFound {
            event: "HardwareRented".into(),
        });
    }
    debug!(tx = %tx.hash, groups = groups.len(), "rentals grouped by user");
    Ok(groups)
}

fn workflow_data(slack: &SlackMessage, fields: Value) -> Value {
    let mut data = json!({ "blocks": slack.blocks });
    if let (Some(data), Value::Object(fields)) = (data.as_object_mut(), fields) {
        data.extend(fields);
    }
    data
}

/// Hardware rented through a provider contract. One Slack message and one
/// workflow run per renting user.
pub struct HardwareRentedAction;

#[async_trait]
impl Action for HardwareRentedAction {
    type Event = Vec<RentalGroup>;
    type Enrichment = ();

    fn name(&self) -> &'static str {
        "hardware-rented"
    }

    fn extract(
        &self,
        _services: &Services,
        tx: &TransactionEvent,
    ) -> Result<Option<Vec<RentalGroup>>, ActionError> {
        extract_groups(tx).map(Some)
    }

    async fn enrich(
        &self,
        _services: &Services,
        _groups: &Vec<RentalGroup>,
    ) -> Result<(), ActionError> {
        Ok(())
    }

    fn compose(
        &self,
        services: &Services,
        tx: &TransactionEvent,
        groups: &Vec<RentalGroup>,
        _: (),
    ) -> Result<Vec<Notification>, ActionError> {
        let config = services.config();
        Ok(groups
            .iter()
            .map(|group| {
                let node_ids = group.display_node_ids();
                let provider_name = config.provider_name(&group.hardware_provider);
                let message =
                    slack::hardware_rented(&group.summary(tx, &node_ids, &provider_name));
                let hex_ids: Vec<String> =
                    group.node_ids.iter().map(|a| a.to_checksum(None)).collect();
                let data = workflow_data(
                    &message,
                    json!({
                        "user": group.user.to_checksum(None),
                        "nodeID": node_ids.join(", "),
                        "nodeIDHex": hex_ids.join(", "),
                        "nodeIDs": node_ids,
                        "hardwareProviderName": provider_name,
                        "duration": group.duration.to_string(),
                        "payment": group.payment.to_string(),
                        "transactionHash": tx.hash,
                    }),
                );
                Notification::new(
                    NotificationPayload::new()
                        .with_slack(message)
                        .with_workflow(WorkflowTrigger::new(data)),
                    DeliveryHints::new(services.network()),
                )
            })
            .collect())
    }
}
