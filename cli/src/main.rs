//! ChainRelay CLI: run the GoGoPool notification flows outside the monitoring host.
//!
//! # Commands
//! ```
//! chainrelay run      <action> --payload <tx.json> [--network fuji] [--config <path.yaml>]
//! chainrelay rewards  [--time <rfc3339>] [--network fuji] [--config <path.yaml>]
//! chainrelay node-id  <NodeID-… | 0x…>
//! chainrelay actions
//! ```

use anyhow::{Context, Result};
use chainrelay_actions::{ActionKind, RelayConfig};
use chainrelay_core::{BroadcastReport, Network};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

mod cmd_rewards;
mod cmd_run;

#[derive(Parser)]
#[command(
    name = "chainrelay",
    about = "GoGoPool notification relay, ChainRelay CLI",
    long_about = "
ChainRelay CLI: replay transaction trigger payloads through the notification
flows and run the periodic rewards check.

ENVIRONMENT VARIABLES:
  JSON_RPC_URL / JSON_RPC_URL_FUJI   Avalanche C-Chain RPC endpoint
  PROD_WEBHOOK_URL                   Discord webhook
  WEBHOOK_URL / FUJI_WEBHOOK_URL     Generic status webhook
  KNOCK_TOKEN                        Knock API token
  <PROVIDER>_SLACK_URL[_FUJI]        Hardware provider Slack webhooks
",
    version
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one transaction-triggered flow against a trigger payload
    Run {
        /// Flow name, see `chainrelay actions`
        action: String,
        /// Transaction event JSON file, `-` for stdin
        #[arg(long)]
        payload: String,
        /// Network to run on, defaults to the payload's
        #[arg(long)]
        network: Option<String>,
        /// YAML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check the GGP rewards cycle and post any announcement that is due
    Rewards {
        /// Check as of this time instead of now (RFC 3339)
        #[arg(long)]
        time: Option<String>,
        /// Override the configured network
        #[arg(long)]
        network: Option<String>,
        /// YAML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Convert between `NodeID-…` and hex node IDs
    #[command(name = "node-id")]
    NodeId {
        /// Either form
        value: String,
    },

    /// List the transaction-triggered flows
    Actions,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { action, payload, network, config } => {
            let config = load_config(config.as_deref(), cli.verbose)?;
            cmd_run::run(config, &action, &payload, parse_network(network.as_deref())?).await
        }

        Commands::Rewards { time, network, config } => {
            let mut config = load_config(config.as_deref(), cli.verbose)?;
            if let Some(network) = parse_network(network.as_deref())? {
                config.network = network;
            }
            cmd_rewards::run(config, time.as_deref()).await
        }

        Commands::NodeId { value } => cmd_node_id(&value),

        Commands::Actions => cmd_actions(),
    }
}

/// Config from file (or defaults), tracing started.
fn load_config(path: Option<&Path>, verbose: bool) -> Result<RelayConfig> {
    let mut config = match path {
        Some(path) => RelayConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RelayConfig::default(),
    };
    if verbose {
        config.log.level = "debug".into();
    }
    chainrelay_observability::init_tracing(&config.log);
    Ok(config)
}

fn parse_network(value: Option<&str>) -> Result<Option<Network>> {
    value
        .map(|v| v.parse::<Network>().map_err(anyhow::Error::msg))
        .transpose()
}

fn print_report(report: &BroadcastReport) {
    if report.outcomes.is_empty() {
        println!("Nothing to send.");
        return;
    }
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(delivery) => println!("  {:<10} {:?}", outcome.sink, delivery),
            Err(e) => println!("  {:<10} FAILED: {e}", outcome.sink),
        }
    }
    println!(
        "{} sent, {} skipped, {} failed",
        report.sent(),
        report.skipped(),
        report.failed()
    );
}

// ─── Command implementations ─────────────────────────────────────────────────

fn cmd_node_id(value: &str) -> Result<()> {
    let address = chainrelay_evm::parse_node_id(value)
        .with_context(|| format!("'{value}' is not a node ID"))?;
    println!("{}", chainrelay_evm::node_id_from_address(address));
    println!("{}", address.to_checksum(None));
    Ok(())
}

fn cmd_actions() -> Result<()> {
    for kind in ActionKind::ALL {
        println!("  {:<24} {}", kind.name(), kind.description());
    }
    println!("  {:<24} {}", "rewards", "GGP rewards cycle announcements (scheduled)");
    Ok(())
}
