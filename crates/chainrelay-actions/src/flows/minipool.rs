//! Minipool status changes.
//!
//! A transaction usually moves one minipool through one status. Relaunch
//! and restake transactions move it through several in one go; those are
//! reported as a single combined message.

use alloy_primitives::Address;
use async_trait::async_trait;
use chainrelay_core::{
    ActionError, DeliveryHints, Notification, NotificationPayload, TransactionEvent,
};
use chainrelay_evm::{extract_events, extract_typed, Contract};
use serde_json::json;
use tracing::{debug, warn};

use super::{schema, sender};
use crate::action::Action;
use crate::events::MinipoolStatusChanged;
use crate::reads::{minipool_by_node_id, Minipool};
use crate::services::Services;
use crate::templates::discord::{minipool_status, MinipoolView};
use crate::templates::MinipoolTemplate;

/// On-chain minipool status codes, plus the synthetic codes used for
/// combined transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinipoolStatus {
    Prelaunch,
    Launched,
    Staking,
    Withdrawable,
    Finished,
    Canceled,
    Error,
    StreamlinePrelaunch,
    Restake,
    StreamlineRelaunch,
}

impl MinipoolStatus {
    pub fn from_code(code: u64) -> Result<Self, ActionError> {
        Ok(match code {
            0 => Self::Prelaunch,
            1 => Self::Launched,
            2 => Self::Staking,
            3 => Self::Withdrawable,
            4 => Self::Finished,
            5 => Self::Canceled,
            6 => Self::Error,
            10 => Self::StreamlinePrelaunch,
            11 => Self::Restake,
            12 => Self::StreamlineRelaunch,
            code => return Err(ActionError::UnknownStatus { code }),
        })
    }

    pub fn code(self) -> u64 {
        match self {
            Self::Prelaunch => 0,
            Self::Launched => 1,
            Self::Staking => 2,
            Self::Withdrawable => 3,
            Self::Finished => 4,
            Self::Canceled => 5,
            Self::Error => 6,
            Self::StreamlinePrelaunch => 10,
            Self::Restake => 11,
            Self::StreamlineRelaunch => 12,
        }
    }

    fn template(self) -> MinipoolTemplate {
        match self {
            Self::Prelaunch => MinipoolTemplate::Prelaunch,
            Self::Launched => MinipoolTemplate::Launch,
            Self::Staking => MinipoolTemplate::Staking,
            Self::Withdrawable => MinipoolTemplate::Withdrawable,
            Self::Finished => MinipoolTemplate::Finished,
            Self::Canceled => MinipoolTemplate::Canceled,
            Self::Error => MinipoolTemplate::Error,
            Self::StreamlinePrelaunch => MinipoolTemplate::StreamlinePrelaunch,
            Self::Restake => MinipoolTemplate::Restake { streamlined: false },
            Self::StreamlineRelaunch => MinipoolTemplate::Restake { streamlined: true },
        }
    }
}

/// The status events of one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChanges {
    pub events: Vec<MinipoolStatusChanged>,
    /// The transaction also created a minipool through the streamliner.
    pub streamlined: bool,
}

/// What to report for a transaction's status changes. The node is always
/// the first change's.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub node_id: Address,
    /// Selects the message template.
    pub status: MinipoolStatus,
    /// Status code sent in the webhook body.
    pub webhook_status: u64,
}

/// Decide which status a set of changes is reported as.
///
/// Two changes ending in prelaunch are a relaunch, three ending in launched
/// are a restake. Any other multi-change set, or one spanning several
/// nodes, is reported as its last change.
pub fn classify(changes: &StatusChanges) -> Result<Classified, ActionError> {
    let (Some(first), Some(last)) = (changes.events.first(), changes.events.last()) else {
        return Err(ActionError::EventNotFound {
            event: "MinipoolStatusChanged".into(),
        });
    };
    let one_node = changes.events.iter().all(|e| e.node_id == first.node_id);

    let combined = match changes.events.len() {
        1 if changes.streamlined => Some((MinipoolStatus::StreamlinePrelaunch, first.status)),
        1 => None,
        2 if one_node && last.status == MinipoolStatus::Prelaunch.code() => {
            Some((MinipoolStatus::Prelaunch, MinipoolStatus::Prelaunch.code()))
        }
        3 if one_node && last.status == MinipoolStatus::Launched.code() => {
            Some((MinipoolStatus::Restake, MinipoolStatus::Launched.code()))
        }
        n => {
            warn!(
                changes = n,
                one_node,
                last = last.status,
                "unexpected status sequence, reporting last change"
            );
            None
        }
    };

    let (status, webhook_status) = match combined {
        Some(c) => c,
        None => (MinipoolStatus::from_code(last.status)?, last.status),
    };
    Ok(Classified {
        node_id: first.node_id,
        status,
        webhook_status,
    })
}

pub struct MinipoolStatusAction;

#[async_trait]
impl Action for MinipoolStatusAction {
    type Event = Classified;
    type Enrichment = Minipool;

    fn name(&self) -> &'static str {
        "minipool-status"
    }

    fn extract(
        &self,
        _services: &Services,
        tx: &TransactionEvent,
    ) -> Result<Option<Classified>, ActionError> {
        let events: Vec<MinipoolStatusChanged> = extract_typed(
            tx,
            &schema(Contract::MinipoolManager, "MinipoolStatusChanged")?,
        );
        let streamlined = !extract_events(
            tx,
            &schema(Contract::MinipoolStreamliner, "NewStreamlinedMinipoolMade")?,
        )
        .is_empty();
        let classified = classify(&StatusChanges {
            events,
            streamlined,
        })?;
        debug!(node = %classified.node_id, status = ?classified.status, "status change classified");
        Ok(Some(classified))
    }

    async fn enrich(
        &self,
        services: &Services,
        event: &Classified,
    ) -> Result<Minipool, ActionError> {
        let manager = services.address(Contract::MinipoolManager)?;
        Ok(minipool_by_node_id(services.reader()?, manager, event.node_id).await?)
    }

    fn compose(
        &self,
        services: &Services,
        tx: &TransactionEvent,
        event: &Classified,
        minipool: Minipool,
    ) -> Result<Vec<Notification>, ActionError> {
        // A prelaunching minipool's owner is whoever sent the deposit.
        let owner = match event.status {
            MinipoolStatus::Prelaunch => sender(tx)?,
            _ => minipool.owner,
        };
        let message = minipool_status(
            event.status.template(),
            &MinipoolView {
                network: tx.network,
                tx_hash: &tx.hash,
                owner,
                node_id: event.node_id,
                end_time: minipool.end_time(),
            },
        );
        let body = json!({
            "nodeID": event.node_id.to_checksum(None),
            "status": event.webhook_status.to_string(),
            "duration": minipool.duration.to_string(),
            "startDate": minipool.start_time.to_string(),
        });
        Ok(vec![Notification::new(
            NotificationPayload::new().with_chat(message).with_body(body),
            DeliveryHints::new(services.network()),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(node: u8, status: u64) -> MinipoolStatusChanged {
        MinipoolStatusChanged {
            node_id: Address::repeat_byte(node),
            status,
        }
    }

    fn classify_all(events: Vec<MinipoolStatusChanged>, streamlined: bool) -> Classified {
        classify(&StatusChanges {
            events,
            streamlined,
        })
        .unwrap()
    }

    #[test]
    fn single_change_is_its_own_status() {
        let c = classify_all(vec![change(1, 2)], false);
        assert_eq!(c.status, MinipoolStatus::Staking);
        assert_eq!(c.webhook_status, 2);
    }

    #[test]
    fn streamliner_marks_one_click_launch() {
        let c = classify_all(vec![change(1, 0)], true);
        assert_eq!(c.status, MinipoolStatus::StreamlinePrelaunch);
        assert_eq!(c.webhook_status, 0);
    }

    #[test]
    fn relaunch_and_restake() {
        let relaunch = classify_all(vec![change(1, 4), change(1, 0)], false);
        assert_eq!(relaunch.status, MinipoolStatus::Prelaunch);
        assert_eq!(relaunch.webhook_status, 0);

        let restake = classify_all(vec![change(1, 4), change(1, 0), change(1, 1)], false);
        assert_eq!(restake.status, MinipoolStatus::Restake);
        assert_eq!(restake.webhook_status, 1);
    }

    #[test]
    fn inconsistent_sets_fall_back_to_last_change() {
        let mixed = classify_all(vec![change(1, 4), change(2, 0)], false);
        assert_eq!(mixed.status, MinipoolStatus::Prelaunch);
        assert_eq!(mixed.node_id, Address::repeat_byte(1));

        let wrong_end = classify_all(vec![change(1, 0), change(1, 1), change(1, 2)], false);
        assert_eq!(wrong_end.status, MinipoolStatus::Staking);
        assert_eq!(wrong_end.webhook_status, 2);

        let four = classify_all(vec![change(1, 4), change(1, 0), change(1, 1), change(1, 2)], false);
        assert_eq!(four.status, MinipoolStatus::Staking);
    }

    #[test]
    fn unknown_and_missing() {
        let err = classify(&StatusChanges {
            events: vec![change(1, 9)],
            streamlined: false,
        })
        .unwrap_err();
        assert!(matches!(err, ActionError::UnknownStatus { code: 9 }));

        let err = classify(&StatusChanges {
            events: vec![],
            streamlined: false,
        })
        .unwrap_err();
        assert!(matches!(err, ActionError::EventNotFound { .. }));
    }

    #[test]
    fn codes_round_trip() {
        for code in [0, 1, 2, 3, 4, 5, 6, 10, 11, 12] {
            assert_eq!(MinipoolStatus::from_code(code).unwrap().code(), code);
        }
    }
}
