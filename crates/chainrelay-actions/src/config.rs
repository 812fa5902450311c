//! Relay configuration.
//!
//! Loaded from YAML. Every section has a default, so an empty document is a
//! valid configuration; contract addresses are deployment specific and have
//! no default.

use alloy_primitives::{Address, B256};
use chainrelay_core::{ActionError, Network};
use chainrelay_evm::Contract;
use chainrelay_observability::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ARTIFACT_PROVIDER_ID: B256 = B256::new([
    0x9e, 0x8a, 0x01, 0xbb, 0x95, 0x1f, 0xb3, 0x8f, 0xf9, 0xaa, 0x0d, 0xde, 0xcf, 0xcd, 0xa5, 0x9c,
    0x7d, 0x92, 0xb7, 0xe1, 0x56, 0x99, 0x28, 0xf1, 0x4e, 0x6d, 0x7b, 0xd3, 0xcc, 0xe2, 0xf8, 0x60,
]);

pub const CHORUS_ONE_PROVIDER_ID: B256 = B256::new([
    0x29, 0x9e, 0xe5, 0x41, 0x46, 0xec, 0x03, 0x3e, 0xa5, 0x77, 0x59, 0x58, 0xd9, 0x1d, 0xce, 0x74,
    0xdd, 0xe4, 0xbc, 0x03, 0xf3, 0xb6, 0x75, 0x41, 0xfd, 0x0f, 0xfe, 0x59, 0x76, 0x3e, 0xc7, 0xa3,
]);

pub const COQNET_SUBNET_ID: B256 = B256::new([
    0x08, 0x0f, 0xa7, 0x72, 0x7a, 0xc2, 0xb7, 0x32, 0x92, 0xde, 0x26, 0x46, 0x84, 0xf4, 0x69, 0x73,
    0x26, 0x87, 0xb6, 0x19, 0x77, 0xae, 0x5e, 0x95, 0xd7, 0x97, 0x27, 0xa2, 0xe8, 0xdd, 0x7c, 0x54,
]);

/// Name of the primary network in the subnet table.
pub const PRIMARY_NETWORK_NAME: &str = "Avalanche";

/// Contract addresses for one network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressBook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staking: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokengg_avax: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minipool_manager: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewards_pool: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_dao: Option<Address>,
}

impl AddressBook {
    pub fn get(&self, contract: Contract) -> Option<Address> {
        match contract {
            Contract::Staking => self.staking,
            Contract::TokenggAvax => self.tokengg_avax,
            Contract::MinipoolManager => self.minipool_manager,
            Contract::RewardsPool => self.rewards_pool,
            Contract::ProtocolDao => self.protocol_dao,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deployments {
    #[serde(default)]
    pub mainnet: AddressBook,
    #[serde(default)]
    pub fuji: AddressBook,
}

impl Deployments {
    pub fn for_network(&self, network: Network) -> &AddressBook {
        match network {
            Network::Mainnet => &self.mainnet,
            Network::Fuji => &self.fuji,
        }
    }
}

/// A value that differs between mainnet and fuji.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerNetwork<T> {
    #[serde(default)]
    pub mainnet: Option<T>,
    #[serde(default)]
    pub fuji: Option<T>,
}

impl<T> PerNetwork<T> {
    pub fn both(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            mainnet: Some(value.clone()),
            fuji: Some(value),
        }
    }

    pub fn get(&self, network: Network) -> Option<&T> {
        match network {
            Network::Mainnet => self.mainnet.as_ref(),
            Network::Fuji => self.fuji.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareProvider {
    pub name: String,
    pub id: B256,
    /// Secret holding this provider's Slack webhook URL.
    #[serde(default)]
    pub slack_secret: PerNetwork<String>,
    /// Launches through this provider produce notifications.
    #[serde(default = "default_true")]
    pub notify_launch: bool,
    /// Stakes ending undercollateralized on this provider produce notifications.
    #[serde(default = "default_true")]
    pub notify_undercollateralized: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subnet {
    pub name: String,
    pub id: B256,
    /// Rentals on this subnet are rejected.
    #[serde(default)]
    pub unsupported: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Log messages instead of posting them.
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_rpc_timeout_ms")]
    pub rpc_timeout_ms: u64,
    #[serde(default = "default_sink_timeout_ms")]
    pub sink_timeout_ms: u64,
}

fn default_rpc_timeout_ms() -> u64 {
    30_000
}

fn default_sink_timeout_ms() -> u64 {
    10_000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            rpc_timeout_ms: default_rpc_timeout_ms(),
            sink_timeout_ms: default_sink_timeout_ms(),
        }
    }
}

impl HttpConfig {
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }

    pub fn sink_timeout(&self) -> Duration {
        Duration::from_millis(self.sink_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardsConfig {
    /// JSON file remembering which reminders were sent for which cycle.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("chainrelay-rewards.json")
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub deployments: Deployments,
    #[serde(default = "default_providers")]
    pub hardware_providers: Vec<HardwareProvider>,
    #[serde(default = "default_subnets")]
    pub subnets: Vec<Subnet>,
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub rewards: RewardsConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            deployments: Deployments::default(),
            hardware_providers: default_providers(),
            subnets: default_subnets(),
            discord: DiscordConfig::default(),
            http: HttpConfig::default(),
            rewards: RewardsConfig::default(),
            log: LogConfig::default(),
        }
    }
}

fn default_providers() -> Vec<HardwareProvider> {
    vec![
        HardwareProvider {
            name: "Artifact".into(),
            id: ARTIFACT_PROVIDER_ID,
            slack_secret: PerNetwork {
                mainnet: Some("ARTIFACT_SLACK_URL".into()),
                fuji: Some("ARTIFACT_SLACK_URL_FUJI".into()),
            },
            notify_launch: true,
            notify_undercollateralized: false,
        },
        HardwareProvider {
            name: "ChorusOne".into(),
            id: CHORUS_ONE_PROVIDER_ID,
            slack_secret: PerNetwork {
                mainnet: Some("CHORUSONE_SLACK_URL".into()),
                fuji: Some("CHORUSONE_SLACK_URL_FUJI".into()),
            },
            notify_launch: false,
            notify_undercollateralized: true,
        },
        HardwareProvider {
            name: "Manual".into(),
            id: B256::ZERO,
            slack_secret: PerNetwork::default(),
            notify_launch: false,
            notify_undercollateralized: true,
        },
    ]
}

fn default_subnets() -> Vec<Subnet> {
    vec![
        Subnet {
            name: "CoqNet".into(),
            id: COQNET_SUBNET_ID,
            unsupported: false,
        },
        Subnet {
            name: PRIMARY_NETWORK_NAME.into(),
            id: B256::ZERO,
            unsupported: true,
        },
    ]
}

impl RelayConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ActionError> {
        serde_yaml::from_str(yaml).map_err(|e| ActionError::Config {
            reason: format!("invalid YAML: {e}"),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ActionError> {
        let text = std::fs::read_to_string(path).map_err(|e| ActionError::Config {
            reason: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_yaml_str(&text)
    }

    /// Address of `contract` on `network`.
    pub fn address(&self, network: Network, contract: Contract) -> Result<Address, ActionError> {
        self.deployments
            .for_network(network)
            .get(contract)
            .ok_or_else(|| ActionError::Config {
                reason: format!("no {contract} address configured for {network}"),
            })
    }

    pub fn provider(&self, id: &B256) -> Option<&HardwareProvider> {
        self.hardware_providers.iter().find(|p| &p.id == id)
    }

    /// Provider name, or the hex id when the provider is unknown.
    pub fn provider_name(&self, id: &B256) -> String {
        self.provider(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("{id}"))
    }

    pub fn subnet(&self, id: &B256) -> Option<&Subnet> {
        self.subnets.iter().find(|s| &s.id == id)
    }
}
