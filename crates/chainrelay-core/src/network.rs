//! Deployment network identifiers.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The network a trigger fired on.
///
/// Controls contract addresses, explorer links, push workflow keys and which
/// webhook/RPC secrets are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Network {
    Mainnet,
    Fuji,
}

impl Network {
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Mainnet => 43114,
            Self::Fuji => 43113,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Fuji => "fuji",
        }
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, Self::Fuji)
    }

    /// Block explorer link for a transaction hash.
    pub fn tx_url(&self, hash: &str) -> String {
        format!("{}/tx/{hash}", self.explorer_base())
    }

    /// Block explorer link for an account or contract.
    pub fn address_url(&self, address: &str) -> String {
        format!("{}/address/{address}", self.explorer_base())
    }

    /// Validator explorer link for a `NodeID-...` identifier.
    pub fn validator_url(&self, node_id: &str) -> String {
        let base = match self {
            Self::Mainnet => "https://avascan.info",
            Self::Fuji => "https://testnet.avascan.info",
        };
        format!("{base}/staking/validator/{node_id}")
    }

    fn explorer_base(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://snowtrace.io",
            Self::Fuji => "https://testnet.snowtrace.io",
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::Mainnet
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = String;

    /// Accepts the network name or its chain ID, as triggers send either.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "avalanche" | "43114" => Ok(Self::Mainnet),
            "fuji" | "testnet" | "43113" => Ok(Self::Fuji),
            other => Err(format!("unknown network '{other}'")),
        }
    }
}

impl TryFrom<String> for Network {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_chain_ids() {
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("43113".parse::<Network>().unwrap(), Network::Fuji);
        assert_eq!("FUJI".parse::<Network>().unwrap(), Network::Fuji);
        assert!("goerli".parse::<Network>().is_err());
    }

    #[test]
    fn explorer_links_follow_network() {
        assert_eq!(Network::Mainnet.tx_url("0xabc"), "https://snowtrace.io/tx/0xabc");
        assert_eq!(
            Network::Fuji.address_url("0xdef"),
            "https://testnet.snowtrace.io/address/0xdef"
        );
        assert_eq!(
            Network::Fuji.validator_url("NodeID-xyz"),
            "https://testnet.avascan.info/staking/validator/NodeID-xyz"
        );
    }

    #[test]
    fn deserializes_from_chain_id_string() {
        let n: Network = serde_json::from_str("\"43114\"").unwrap();
        assert_eq!(n, Network::Mainnet);
        assert_eq!(serde_json::to_string(&Network::Fuji).unwrap(), "\"fuji\"");
    }
}
