//! Typed protocol events.

use alloy_primitives::{Address, B256, U256};
use chainrelay_evm::{
    Contract, DecodeError, DecodedLog, EventSchema, FromLog, SchemaVariants,
};

#[derive(Debug, Clone, PartialEq)]
pub struct GgpStaked {
    pub from: Address,
    pub amount: U256,
}

impl FromLog for GgpStaked {
    fn from_log(log: &DecodedLog) -> Result<Self, DecodeError> {
        Ok(Self {
            from: log.fields.address("from")?,
            amount: log.fields.uint("amount")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GgpWithdrawn {
    pub to: Address,
    pub amount: U256,
}

impl FromLog for GgpWithdrawn {
    fn from_log(log: &DecodedLog) -> Result<Self, DecodeError> {
        Ok(Self {
            to: log.fields.address("to")?,
            amount: log.fields.uint("amount")?,
        })
    }
}

/// ERC-4626 `Deposit`, shared by ggAVAX and the GGP vault.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultDeposit {
    pub sender: Address,
    pub owner: Address,
    pub assets: U256,
    pub shares: U256,
}

impl FromLog for VaultDeposit {
    fn from_log(log: &DecodedLog) -> Result<Self, DecodeError> {
        let sender = if log.fields.has("caller") {
            log.fields.address("caller")?
        } else {
            log.fields.address("sender")?
        };
        Ok(Self {
            sender,
            owner: log.fields.address("owner")?,
            assets: log.fields.uint("assets")?,
            shares: log.fields.uint("shares")?,
        })
    }
}

/// ERC-4626 `Withdraw`, shared by ggAVAX and the GGP vault.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultWithdraw {
    pub sender: Address,
    pub receiver: Address,
    pub owner: Address,
    pub assets: U256,
    pub shares: U256,
}

impl FromLog for VaultWithdraw {
    fn from_log(log: &DecodedLog) -> Result<Self, DecodeError> {
        let sender = if log.fields.has("caller") {
            log.fields.address("caller")?
        } else {
            log.fields.address("sender")?
        };
        Ok(Self {
            sender,
            receiver: log.fields.address("receiver")?,
            owner: log.fields.address("owner")?,
            assets: log.fields.uint("assets")?,
            shares: log.fields.uint("shares")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MinipoolStatusChanged {
    pub node_id: Address,
    pub status: u64,
}

impl FromLog for MinipoolStatusChanged {
    fn from_log(log: &DecodedLog) -> Result<Self, DecodeError> {
        Ok(Self {
            node_id: log.fields.address("nodeID")?,
            status: log.fields.u64("status")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MinipoolLaunched {
    pub node_id: Address,
    pub hardware_provider: B256,
    pub duration: U256,
}

impl FromLog for MinipoolLaunched {
    fn from_log(log: &DecodedLog) -> Result<Self, DecodeError> {
        Ok(Self {
            node_id: log.fields.address("nodeID")?,
            hardware_provider: log.fields.b256("hardwareProvider")?,
            duration: log.fields.uint("duration")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStreamlinedMinipoolMade {
    pub node_id: Address,
    pub owner: Address,
    pub hardware_provider_contract: Address,
}

impl FromLog for NewStreamlinedMinipoolMade {
    fn from_log(log: &DecodedLog) -> Result<Self, DecodeError> {
        Ok(Self {
            node_id: log.fields.address("nodeID")?,
            owner: log.fields.address("owner")?,
            hardware_provider_contract: log.fields.address("hardwareProviderContract")?,
        })
    }
}

/// A hardware rental, normalised across both event layouts.
///
/// The pre-subnet layout carries no subnet and is reported on the primary
/// network (zero id).
#[derive(Debug, Clone, PartialEq)]
pub struct HardwareRented {
    pub user: Address,
    pub node_id: Address,
    pub hardware_provider: B256,
    pub duration: U256,
    pub payment: U256,
    pub subnet_id: B256,
}

impl HardwareRented {
    fn from_legacy(log: &DecodedLog) -> Result<Self, DecodeError> {
        Ok(Self {
            user: log.fields.address("user")?,
            node_id: log.fields.address("nodeID")?,
            hardware_provider: log.fields.b256("hardwareProviderName")?,
            duration: log.fields.uint("duration")?,
            payment: log.fields.uint("payment")?,
            subnet_id: B256::ZERO,
        })
    }

    fn from_current(log: &DecodedLog) -> Result<Self, DecodeError> {
        Ok(Self {
            user: log.fields.address("user")?,
            node_id: log.fields.address("nodeID")?,
            hardware_provider: log.fields.b256("hardwareProviderName")?,
            duration: log.fields.uint("duration")?,
            payment: log.fields.uint("paymentAmount")?,
            subnet_id: log.fields.b256("subnetID")?,
        })
    }

    /// Legacy layout first, then the current one.
    pub fn variants() -> Result<SchemaVariants<Self>, DecodeError> {
        Ok(SchemaVariants::new()
            .variant(
                EventSchema::new(Contract::ArtifactHardwareProvider, "HardwareRented")?,
                Self::from_legacy,
            )
            .variant(
                EventSchema::new(Contract::ArtifactHardwareProviderNew, "HardwareRented")?,
                Self::from_current,
            ))
    }
}

/// Events of the GGP vault (xGGP).
#[derive(Debug, Clone, PartialEq)]
pub enum VaultEvent {
    Deposit(VaultDeposit),
    Withdraw(VaultWithdraw),
    GgpCapUpdated { new_max: U256 },
    TargetAprUpdated { new_target_apr: U256 },
    DepositedFromStaking { caller: Address, amount: U256 },
    WithdrawnForStaking { caller: Address, assets: U256 },
    RewardsDistributed { amount: U256 },
}

impl VaultEvent {
    /// Event names in the order they are looked for.
    pub const NAMES: [&'static str; 7] = [
        "Deposit",
        "Withdraw",
        "GGPCapUpdated",
        "TargetAPRUpdated",
        "DepositedFromStaking",
        "WithdrawnForStaking",
        "RewardsDistributed",
    ];

    pub fn from_named_log(log: &DecodedLog) -> Result<Self, DecodeError> {
        let f = &log.fields;
        Ok(match log.event.as_str() {
            "Deposit" => Self::Deposit(VaultDeposit::from_log(log)?),
            "Withdraw" => Self::Withdraw(VaultWithdraw::from_log(log)?),
            "GGPCapUpdated" => Self::GgpCapUpdated {
                new_max: f.uint("newMax")?,
            },
            "TargetAPRUpdated" => Self::TargetAprUpdated {
                new_target_apr: f.uint("newTargetAPR")?,
            },
            "DepositedFromStaking" => Self::DepositedFromStaking {
                caller: f.address("caller")?,
                amount: f.uint("amount")?,
            },
            "WithdrawnForStaking" => Self::WithdrawnForStaking {
                caller: f.address("caller")?,
                assets: f.uint("assets")?,
            },
            "RewardsDistributed" => Self::RewardsDistributed {
                amount: f.uint("amount")?,
            },
            other => {
                return Err(DecodeError::UnknownAbiItem {
                    contract: Contract::GgpVault.name().into(),
                    item: other.into(),
                })
            }
        })
    }
}
