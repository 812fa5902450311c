//! The action pipeline: extract → enrich → compose → broadcast.

use async_trait::async_trait;
use chainrelay_core::{ActionError, BroadcastReport, Notification, TransactionEvent};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::services::Services;

/// One notification flow triggered by a transaction.
///
/// `extract` and `compose` are pure; only `enrich` touches the chain. An
/// error from any stage aborts the invocation before anything is sent.
#[async_trait]
pub trait Action: Send + Sync {
    type Event: Send + Sync;
    type Enrichment: Send;

    fn name(&self) -> &'static str;

    /// `Ok(None)` means the transaction is not one this flow reports on.
    fn extract(
        &self,
        services: &Services,
        tx: &TransactionEvent,
    ) -> Result<Option<Self::Event>, ActionError>;

    async fn enrich(
        &self,
        services: &Services,
        event: &Self::Event,
    ) -> Result<Self::Enrichment, ActionError>;

    fn compose(
        &self,
        services: &Services,
        tx: &TransactionEvent,
        event: &Self::Event,
        enrichment: Self::Enrichment,
    ) -> Result<Vec<Notification>, ActionError>;
}

/// Run `action` against `tx` and broadcast whatever it composes.
pub async fn execute<A: Action>(
    action: &A,
    services: &Services,
    tx: &TransactionEvent,
) -> Result<BroadcastReport, ActionError> {
    let result = run_pipeline(action, services, tx).await;
    match &result {
        Ok(report) => {
            services.metrics().record_report(action.name(), report);
            info!(
                action = action.name(),
                tx = %tx.hash,
                sent = report.sent(),
                skipped = report.skipped(),
                failed = report.failed(),
                "broadcast finished"
            );
        }
        Err(e) => {
            services.metrics().record_aborted(action.name(), e);
            warn!(action = action.name(), tx = %tx.hash, error = %e, "invocation aborted");
        }
    }
    result
}

async fn run_pipeline<A: Action>(
    action: &A,
    services: &Services,
    tx: &TransactionEvent,
) -> Result<BroadcastReport, ActionError> {
    if tx.network != services.network() {
        return Err(ActionError::InvalidTrigger {
            reason: format!(
                "transaction is on {} but services are set up for {}",
                tx.network,
                services.network()
            ),
        });
    }
    services.init().await?;

    let Some(event) = action.extract(services, tx)? else {
        debug!(action = action.name(), tx = %tx.hash, "nothing to report");
        return Ok(BroadcastReport::default());
    };
    let enrichment = action.enrich(services, &event).await?;
    let notifications = action.compose(services, tx, &event, enrichment)?;
    debug!(
        action = action.name(),
        notifications = notifications.len(),
        "composed"
    );
    Ok(services.dispatcher().broadcast_all(&notifications).await)
}

/// The transaction-triggered flows, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Staking,
    GgAvax,
    Vault,
    MinipoolStatus,
    MinipoolLaunch,
    Undercollateralized,
    HardwareRented,
    CoqnetHardwareRented,
}

impl ActionKind {
    pub const ALL: [ActionKind; 8] = [
        ActionKind::Staking,
        ActionKind::GgAvax,
        ActionKind::Vault,
        ActionKind::MinipoolStatus,
        ActionKind::MinipoolLaunch,
        ActionKind::Undercollateralized,
        ActionKind::HardwareRented,
        ActionKind::CoqnetHardwareRented,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Staking => "staking",
            Self::GgAvax => "ggavax",
            Self::Vault => "vault",
            Self::MinipoolStatus => "minipool-status",
            Self::MinipoolLaunch => "minipool-launch",
            Self::Undercollateralized => "undercollateralized",
            Self::HardwareRented => "hardware-rented",
            Self::CoqnetHardwareRented => "coqnet-hardware-rented",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Staking => "GGP staked or withdrawn",
            Self::GgAvax => "ggAVAX liquid staking deposit or withdrawal",
            Self::Vault => "xGGP vault activity",
            Self::MinipoolStatus => "minipool status changes",
            Self::MinipoolLaunch => "minipool launched through a hardware provider",
            Self::Undercollateralized => "minipool stake ended undercollateralized",
            Self::HardwareRented => "validator hardware rented",
            Self::CoqnetHardwareRented => "validator hardware rented on a subnet",
        }
    }

    /// Run the flow this kind names.
    pub async fn run(
        &self,
        services: &Services,
        tx: &TransactionEvent,
    ) -> Result<BroadcastReport, ActionError> {
        use crate::flows::*;
        match self {
            Self::Staking => execute(&StakingAction, services, tx).await,
            Self::GgAvax => execute(&GgAvaxAction, services, tx).await,
            Self::Vault => execute(&VaultAction, services, tx).await,
            Self::MinipoolStatus => execute(&MinipoolStatusAction, services, tx).await,
            Self::MinipoolLaunch => execute(&MinipoolLaunchAction, services, tx).await,
            Self::Undercollateralized => execute(&UndercollateralizedAction, services, tx).await,
            Self::HardwareRented => execute(&HardwareRentedAction, services, tx).await,
            Self::CoqnetHardwareRented => execute(&CoqnetRentedAction, services, tx).await,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| format!("unknown action '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_by_name() {
        for kind in ActionKind::ALL {
            assert_eq!(kind.name().parse::<ActionKind>().unwrap(), kind);
        }
        assert_eq!(
            "COQNET_HARDWARE_RENTED".parse::<ActionKind>().unwrap(),
            ActionKind::CoqnetHardwareRented
        );
        assert!("transfer".parse::<ActionKind>().is_err());
    }
}
