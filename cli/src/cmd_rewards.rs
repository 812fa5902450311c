//! `chainrelay rewards`: the scheduled rewards cycle check.
//!
//! Announcements already made are remembered in the JSON store named by
//! `rewards.store_path`, so the command can run from cron.

use anyhow::{Context, Result};
use chainrelay_actions::{check_rewards_periodic, RelayConfig, Services};
use chainrelay_core::{EnvSecrets, JsonFileStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub async fn run(config: RelayConfig, time: Option<&str>) -> Result<()> {
    let time = match time {
        Some(t) => DateTime::parse_from_rfc3339(t)
            .with_context(|| format!("'{t}' is not an RFC 3339 time"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    println!(
        "Checking rewards cycle on {} at {} (store: {})",
        config.network,
        time.to_rfc3339(),
        config.rewards.store_path.display()
    );

    let store = Arc::new(JsonFileStore::new(&config.rewards.store_path));
    let services = Services::builder(config)
        .secrets(Arc::new(EnvSecrets::new()))
        .store(store)
        .build()?;
    let report = check_rewards_periodic(&services, time)
        .await
        .context("rewards check aborted")?;

    crate::print_report(&report);
    if report.failed() > 0 {
        anyhow::bail!("{} sink(s) failed", report.failed());
    }
    Ok(())
}
