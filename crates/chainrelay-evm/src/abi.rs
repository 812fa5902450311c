//! Embedded contract ABIs.
//!
//! Only the events and view functions the relay touches are included.
//! Historical event layouts get their own entry (see `ArtifactHardwareProvider`
//! vs `ArtifactHardwareProviderNew`) so both can still be decoded.

use alloy_json_abi::{Event, Function, JsonAbi};
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Contract {
    Staking,
    TokenggAvax,
    MinipoolManager,
    MinipoolStreamliner,
    RewardsPool,
    ProtocolDao,
    /// Hardware rental contract, pre-subnet event layout.
    ArtifactHardwareProvider,
    /// Hardware rental contract, current event layout (adds `subnetID`).
    ArtifactHardwareProviderNew,
    GgpVault,
}

impl Contract {
    pub const ALL: [Contract; 9] = [
        Contract::Staking,
        Contract::TokenggAvax,
        Contract::MinipoolManager,
        Contract::MinipoolStreamliner,
        Contract::RewardsPool,
        Contract::ProtocolDao,
        Contract::ArtifactHardwareProvider,
        Contract::ArtifactHardwareProviderNew,
        Contract::GgpVault,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Staking => "Staking",
            Self::TokenggAvax => "TokenggAVAX",
            Self::MinipoolManager => "MinipoolManager",
            Self::MinipoolStreamliner => "MinipoolStreamliner",
            Self::RewardsPool => "RewardsPool",
            Self::ProtocolDao => "ProtocolDAO",
            Self::ArtifactHardwareProvider => "ArtifactHardwareProvider",
            Self::ArtifactHardwareProviderNew => "ArtifactHardwareProviderNew",
            Self::GgpVault => "GGPVault",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            Self::Staking => include_str!("../abi/Staking.json"),
            Self::TokenggAvax => include_str!("../abi/TokenggAVAX.json"),
            Self::MinipoolManager => include_str!("../abi/MinipoolManager.json"),
            Self::MinipoolStreamliner => include_str!("../abi/MinipoolStreamliner.json"),
            Self::RewardsPool => include_str!("../abi/RewardsPool.json"),
            Self::ProtocolDao => include_str!("../abi/ProtocolDAO.json"),
            Self::ArtifactHardwareProvider => include_str!("../abi/ArtifactHardwareProvider.json"),
            Self::ArtifactHardwareProviderNew => {
                include_str!("../abi/ArtifactHardwareProviderNew.json")
            }
            Self::GgpVault => include_str!("../abi/GGPVault.json"),
        }
    }

    /// The parsed ABI. Parsed once per process.
    pub fn abi(&self) -> Result<&'static JsonAbi, DecodeError> {
        static PARSED: OnceLock<HashMap<Contract, Result<JsonAbi, String>>> = OnceLock::new();
        let parsed = PARSED.get_or_init(|| {
            Contract::ALL
                .iter()
                .map(|c| {
                    let abi = serde_json::from_str::<JsonAbi>(c.source()).map_err(|e| e.to_string());
                    (*c, abi)
                })
                .collect()
        });
        match parsed.get(self) {
            Some(Ok(abi)) => Ok(abi),
            Some(Err(reason)) => Err(DecodeError::InvalidAbi {
                contract: self.name().into(),
                reason: reason.clone(),
            }),
            None => Err(DecodeError::InvalidAbi {
                contract: self.name().into(),
                reason: "not loaded".into(),
            }),
        }
    }

    pub fn event(&self, name: &str) -> Result<&'static Event, DecodeError> {
        self.abi()?
            .event(name)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| DecodeError::UnknownAbiItem {
                contract: self.name().into(),
                item: name.into(),
            })
    }

    pub fn function(&self, name: &str) -> Result<&'static Function, DecodeError> {
        self.abi()?
            .function(name)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| DecodeError::UnknownAbiItem {
                contract: self.name().into(),
                item: name.into(),
            })
    }
}

impl std::fmt::Display for Contract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_embedded_abi_parses() {
        for c in Contract::ALL {
            assert!(c.abi().is_ok(), "{c} failed to parse");
        }
    }

    #[test]
    fn hardware_rented_layouts_have_distinct_selectors() {
        let legacy = Contract::ArtifactHardwareProvider.event("HardwareRented").unwrap();
        let current = Contract::ArtifactHardwareProviderNew.event("HardwareRented").unwrap();
        assert_ne!(legacy.selector(), current.selector());
        assert_eq!(
            legacy.signature(),
            "HardwareRented(address,address,bytes32,uint256,uint256)"
        );
    }

    #[test]
    fn erc4626_events_share_signature_across_vaults() {
        let ggavax = Contract::TokenggAvax.event("Deposit").unwrap();
        let vault = Contract::GgpVault.event("Deposit").unwrap();
        assert_eq!(ggavax.selector(), vault.selector());
    }

    #[test]
    fn unknown_item_is_reported() {
        let err = Contract::Staking.function("nope").unwrap_err();
        assert!(matches!(err, DecodeError::UnknownAbiItem { .. }));
    }
}
