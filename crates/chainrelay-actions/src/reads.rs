//! Enrichment reads: supplementary on-chain state fetched for display.
//!
//! Independent reads run concurrently; any failure fails the whole
//! enrichment.

use alloy_core::dyn_abi::DynSolValue;
use alloy_primitives::{Address, B256, U256};
use chainrelay_evm::{Contract, ContractReader, DecodeError, ReadError};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct StakerInfo {
    pub staker: Address,
    pub ggp_staked: U256,
    pub avax_staked: U256,
    pub avax_validating_high_water: U256,
}

impl StakerInfo {
    /// Anyone who has ever run a minipool counts as a node operator.
    pub fn is_node_operator(&self) -> bool {
        !self.avax_staked.is_zero() || !self.avax_validating_high_water.is_zero()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GgAvaxInfo {
    pub amount_available_for_staking: U256,
    pub staking_total_assets: U256,
}

/// The fields of a minipool record the notifications use.
#[derive(Debug, Clone, PartialEq)]
pub struct Minipool {
    pub node_id: Address,
    pub owner: Address,
    pub status: u64,
    pub duration: u64,
    pub start_time: u64,
    pub hardware_provider: B256,
}

impl Minipool {
    pub fn end_time(&self) -> u64 {
        self.start_time.saturating_add(self.duration)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RewardsInfo {
    pub cycle_start_time: u64,
    pub cycle_seconds: u64,
    pub cycle_total_amount: U256,
    pub cycle_count: u64,
    pub inflation_amount: U256,
    pub eligibility_min_seconds: u64,
}

impl RewardsInfo {
    pub fn cycle_end_time(&self) -> u64 {
        self.cycle_start_time.saturating_add(self.cycle_seconds)
    }

    pub fn eligibility_time(&self) -> u64 {
        self.cycle_start_time
            .saturating_add(self.eligibility_min_seconds)
    }
}

/// `requireValidStaker` then `getStaker`; the second read needs the first.
pub async fn staker_info(
    reader: &ContractReader,
    staking: Address,
    staker: Address,
) -> Result<StakerInfo, ReadError> {
    let index = reader
        .read(
            Contract::Staking,
            staking,
            "requireValidStaker",
            &[DynSolValue::Address(staker)],
        )
        .await?;
    let index = match index.into_iter().next() {
        Some(v @ DynSolValue::Int(..)) => v,
        _ => {
            return Err(ReadError::Decode {
                contract: Contract::Staking.name().into(),
                function: "requireValidStaker".into(),
                source: DecodeError::TypeMismatch {
                    field: "0".into(),
                    expected: "int256".into(),
                },
            })
        }
    };

    let fields = reader
        .read_fields(Contract::Staking, staking, "getStaker", &[index])
        .await?;
    let decode = |source| ReadError::Decode {
        contract: Contract::Staking.name().into(),
        function: "getStaker".into(),
        source,
    };
    Ok(StakerInfo {
        staker,
        ggp_staked: fields.uint("ggpStaked").map_err(decode)?,
        avax_staked: fields.uint("avaxStaked").map_err(decode)?,
        avax_validating_high_water: fields.uint("avaxValidatingHighWater").map_err(decode)?,
    })
}

pub async fn ggavax_info(
    reader: &ContractReader,
    tokengg_avax: Address,
) -> Result<GgAvaxInfo, ReadError> {
    let (amount_available_for_staking, staking_total_assets) = futures::try_join!(
        reader.read_uint(Contract::TokenggAvax, tokengg_avax, "amountAvailableForStaking", &[]),
        reader.read_uint(Contract::TokenggAvax, tokengg_avax, "stakingTotalAssets", &[]),
    )?;
    Ok(GgAvaxInfo {
        amount_available_for_staking,
        staking_total_assets,
    })
}

pub async fn minipool_by_node_id(
    reader: &ContractReader,
    minipool_manager: Address,
    node_id: Address,
) -> Result<Minipool, ReadError> {
    let fields = reader
        .read_fields(
            Contract::MinipoolManager,
            minipool_manager,
            "getMinipoolByNodeID",
            &[DynSolValue::Address(node_id)],
        )
        .await?;
    let decode = |source| ReadError::Decode {
        contract: Contract::MinipoolManager.name().into(),
        function: "getMinipoolByNodeID".into(),
        source,
    };
    let minipool = Minipool {
        node_id,
        owner: fields.address("owner").map_err(decode)?,
        status: fields.u64("status").map_err(decode)?,
        duration: fields.u64("duration").map_err(decode)?,
        start_time: fields.u64("startTime").map_err(decode)?,
        hardware_provider: fields.b256("hardwareProvider").map_err(decode)?,
    };
    debug!(node = %node_id, owner = %minipool.owner, status = minipool.status, "minipool loaded");
    Ok(minipool)
}

/// Six independent reads across the rewards pool and the protocol DAO.
pub async fn rewards_info(
    reader: &ContractReader,
    rewards_pool: Address,
    protocol_dao: Address,
) -> Result<RewardsInfo, ReadError> {
    let (start, total, count, inflation, cycle_seconds, eligibility_min) = futures::try_join!(
        reader.read_uint(Contract::RewardsPool, rewards_pool, "getRewardsCycleStartTime", &[]),
        reader.read_uint(Contract::RewardsPool, rewards_pool, "getRewardsCycleTotalAmt", &[]),
        reader.read_uint(Contract::RewardsPool, rewards_pool, "getRewardsCycleCount", &[]),
        reader.read_fields(Contract::RewardsPool, rewards_pool, "getInflationAmt", &[]),
        reader.read_uint(Contract::ProtocolDao, protocol_dao, "getRewardsCycleSeconds", &[]),
        reader.read_uint(
            Contract::ProtocolDao,
            protocol_dao,
            "getRewardsEligibilityMinSeconds",
            &[]
        ),
    )?;

    let inflation_decode = |source| ReadError::Decode {
        contract: Contract::RewardsPool.name().into(),
        function: "getInflationAmt".into(),
        source,
    };
    let current = inflation.uint("currentTotalSupply").map_err(inflation_decode)?;
    let new = inflation.uint("newTotalSupply").map_err(inflation_decode)?;

    Ok(RewardsInfo {
        cycle_start_time: to_u64(start, Contract::RewardsPool, "getRewardsCycleStartTime")?,
        cycle_seconds: to_u64(cycle_seconds, Contract::ProtocolDao, "getRewardsCycleSeconds")?,
        cycle_total_amount: total,
        cycle_count: to_u64(count, Contract::RewardsPool, "getRewardsCycleCount")?,
        inflation_amount: new.saturating_sub(current),
        eligibility_min_seconds: to_u64(
            eligibility_min,
            Contract::ProtocolDao,
            "getRewardsEligibilityMinSeconds",
        )?,
    })
}

fn to_u64(value: U256, contract: Contract, function: &str) -> Result<u64, ReadError> {
    u64::try_from(value).map_err(|_| ReadError::Decode {
        contract: contract.name().into(),
        function: function.into(),
        source: DecodeError::TypeMismatch {
            field: "0".into(),
            expected: "uint fitting in 64 bits".into(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::I256;
    use chainrelay_evm::testing::{encode_output, encode_struct_output, uint, ScriptedCaller};
    use std::sync::Arc;

    const STAKING: Address = Address::repeat_byte(0x51);

    fn staker_caller(avax_staked: u64, high_water: u64) -> ScriptedCaller {
        ScriptedCaller::new()
            .reply(
                Contract::Staking,
                "requireValidStaker",
                encode_output(vec![DynSolValue::Int(I256::from_raw(U256::from(4u64)), 256)]),
            )
            .reply(
                Contract::Staking,
                "getStaker",
                encode_struct_output(
                    Contract::Staking,
                    "getStaker",
                    &[
                        ("ggpStaked", uint(2_000)),
                        ("avaxStaked", uint(avax_staked)),
                        ("avaxValidatingHighWater", uint(high_water)),
                    ],
                ),
            )
    }

    #[tokio::test]
    async fn staker_read_is_sequential() {
        let caller = Arc::new(staker_caller(0, 1));
        let reader = ContractReader::new(caller.clone());
        let info = staker_info(&reader, STAKING, Address::repeat_byte(7)).await.unwrap();
        assert_eq!(info.ggp_staked, U256::from(2_000u64));
        assert!(info.is_node_operator());

        let calls = caller.calls();
        assert_eq!(calls.len(), 2);
        let require = Contract::Staking.function("requireValidStaker").unwrap().selector();
        assert_eq!(calls[0].1, require.0);
    }

    #[tokio::test]
    async fn plain_staker_is_not_an_operator() {
        let reader = ContractReader::new(Arc::new(staker_caller(0, 0)));
        let info = staker_info(&reader, STAKING, Address::repeat_byte(7)).await.unwrap();
        assert!(!info.is_node_operator());
    }

    #[tokio::test]
    async fn rewards_derived_values() {
        let rp = Address::repeat_byte(0x0a);
        let dao = Address::repeat_byte(0x0b);
        let caller = ScriptedCaller::new()
            .reply(Contract::RewardsPool, "getRewardsCycleStartTime", encode_output(vec![uint(1_000)]))
            .reply(Contract::RewardsPool, "getRewardsCycleTotalAmt", encode_output(vec![uint(50)]))
            .reply(Contract::RewardsPool, "getRewardsCycleCount", encode_output(vec![uint(4)]))
            .reply(
                Contract::RewardsPool,
                "getInflationAmt",
                encode_output(vec![uint(100), uint(130)]),
            )
            .reply(Contract::ProtocolDao, "getRewardsCycleSeconds", encode_output(vec![uint(2_419_200)]))
            .reply(
                Contract::ProtocolDao,
                "getRewardsEligibilityMinSeconds",
                encode_output(vec![uint(1_209_600)]),
            );
        let reader = ContractReader::new(Arc::new(caller));
        let info = rewards_info(&reader, rp, dao).await.unwrap();
        assert_eq!(info.cycle_end_time(), 2_420_200);
        assert_eq!(info.eligibility_time(), 1_210_600);
        assert_eq!(info.inflation_amount, U256::from(30u64));
        assert_eq!(info.cycle_count, 4);
    }

    #[tokio::test]
    async fn one_failed_read_fails_enrichment() {
        let caller = ScriptedCaller::new().reply(
            Contract::TokenggAvax,
            "amountAvailableForStaking",
            encode_output(vec![uint(1)]),
        );
        let reader = ContractReader::new(Arc::new(caller));
        let err = ggavax_info(&reader, Address::repeat_byte(3)).await.unwrap_err();
        assert!(matches!(err, ReadError::Transport { .. }));
    }
}
