//! Periodic GGP rewards cycle announcements.
//!
//! Runs on a schedule rather than a transaction. Each announcement is made
//! at most once per cycle: the cycle count it was made for is remembered in
//! the key-value store under the announcement's key.

use chainrelay_core::{
    ActionError, BroadcastReport, DeliveryHints, KeyValueStore, Notification,
    NotificationPayload,
};
use chainrelay_evm::Contract;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::reads::{rewards_info, RewardsInfo};
use crate::services::Services;
use crate::templates::discord;
use crate::templates::RewardsAnnouncement;

const DAY: u64 = 24 * 60 * 60;
const ACTION: &str = "rewards";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardsType {
    NewRewardsCycle,
    EligibilityReminder,
    CycleEndingReminder,
    None,
}

impl RewardsType {
    /// Store key remembering the last cycle this announcement was made for.
    pub fn store_key(self) -> Option<&'static str> {
        match self {
            Self::NewRewardsCycle => Some("NEW_REWARDS_CYCLE"),
            Self::EligibilityReminder => Some("ELIGIBILITY_REMINDER"),
            Self::CycleEndingReminder => Some("CYCLE_ENDING_REMINDER"),
            Self::None => None,
        }
    }

    fn announcement(self) -> Option<RewardsAnnouncement> {
        match self {
            Self::NewRewardsCycle => Some(RewardsAnnouncement::NewCycle),
            Self::EligibilityReminder => Some(RewardsAnnouncement::EligibilityReminder),
            Self::CycleEndingReminder => Some(RewardsAnnouncement::EndingReminder),
            Self::None => None,
        }
    }

    fn is_due(self, now: u64, info: &RewardsInfo) -> bool {
        let eligibility = info.eligibility_time();
        let end = info.cycle_end_time();
        match self {
            Self::NewRewardsCycle => {
                info.cycle_start_time < now && eligibility.saturating_sub(7 * DAY) > now
            }
            Self::EligibilityReminder => {
                eligibility.saturating_sub(7 * DAY) < now && eligibility > now
            }
            Self::CycleEndingReminder => end.saturating_sub(3 * DAY) < now && end > now,
            Self::None => false,
        }
    }
}

/// Pick the announcement due at `now` (unix seconds) and mark it as made.
///
/// The store is written before anything is sent, so a failed delivery is not
/// retried on the next run.
pub async fn rewards_type(
    now: u64,
    info: &RewardsInfo,
    store: &dyn KeyValueStore,
) -> Result<RewardsType, ActionError> {
    let cycle = info.cycle_count;
    for kind in [
        RewardsType::NewRewardsCycle,
        RewardsType::EligibilityReminder,
        RewardsType::CycleEndingReminder,
    ] {
        let Some(key) = kind.store_key() else {
            continue;
        };
        if store.get_number(key).await? == Some(cycle) {
            debug!(key, cycle, "already announced this cycle");
            continue;
        }
        if kind.is_due(now, info) {
            store.put_number(key, cycle).await?;
            return Ok(kind);
        }
    }
    Ok(RewardsType::None)
}

/// Check the rewards cycle at `time` and broadcast whatever announcement is due.
pub async fn check_rewards_periodic(
    services: &Services,
    time: DateTime<Utc>,
) -> Result<BroadcastReport, ActionError> {
    let result = run(services, time).await;
    match &result {
        Ok(report) => {
            services.metrics().record_report(ACTION, report);
            info!(
                action = ACTION,
                sent = report.sent(),
                skipped = report.skipped(),
                failed = report.failed(),
                "rewards check finished"
            );
        }
        Err(e) => {
            services.metrics().record_aborted(ACTION, e);
            warn!(action = ACTION, error = %e, "rewards check aborted");
        }
    }
    result
}

async fn run(services: &Services, time: DateTime<Utc>) -> Result<BroadcastReport, ActionError> {
    services.init().await?;
    let info = rewards_info(
        services.reader()?,
        services.address(Contract::RewardsPool)?,
        services.address(Contract::ProtocolDao)?,
    )
    .await?;

    // Whole seconds, rounded up.
    let now = u64::try_from(time.timestamp_millis()).unwrap_or(0).div_ceil(1000);
    let kind = rewards_type(now, &info, services.store()).await?;
    info!(now, cycle = info.cycle_count, kind = ?kind, "rewards type decided");

    let Some(announcement) = kind.announcement() else {
        return Ok(BroadcastReport::default());
    };
    let notification = Notification::new(
        NotificationPayload::new().with_chat(discord::rewards(announcement, &info)),
        DeliveryHints::new(services.network()),
    );
    Ok(services.dispatcher().broadcast_all(&[notification]).await)
}
