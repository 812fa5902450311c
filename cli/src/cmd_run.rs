//! `chainrelay run`: replay one trigger payload through a flow.

use anyhow::{Context, Result};
use chainrelay_actions::{ActionKind, RelayConfig, Services};
use chainrelay_core::{EnvSecrets, Network, TransactionEvent};
use std::io::Read;
use std::sync::Arc;

pub async fn run(
    mut config: RelayConfig,
    action: &str,
    payload: &str,
    network: Option<Network>,
) -> Result<()> {
    let kind: ActionKind = action.parse().map_err(anyhow::Error::msg)?;

    let text = if payload == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading payload from stdin")?;
        buf
    } else {
        std::fs::read_to_string(payload).with_context(|| format!("reading {payload}"))?
    };
    let mut tx: TransactionEvent =
        serde_json::from_str(&text).context("payload is not a transaction event")?;
    // `--network` wins; otherwise the payload decides.
    if let Some(network) = network {
        tx.network = network;
    }
    config.network = tx.network;

    println!("Running '{kind}' on {} for {}", config.network, tx.hash);

    let services = Services::builder(config)
        .secrets(Arc::new(EnvSecrets::new()))
        .build()?;
    let report = kind
        .run(&services, &tx)
        .await
        .with_context(|| format!("{kind} aborted"))?;

    crate::print_report(&report);
    if report.failed() > 0 {
        anyhow::bail!("{} sink(s) failed", report.failed());
    }
    Ok(())
}
