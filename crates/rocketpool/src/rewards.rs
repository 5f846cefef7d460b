//! RPL rewards pool and node claims.

use crate::abi::{names, RocketClaimNode, RocketRewardsPool};
use crate::confirmation::ConfirmationHandler;
use crate::contracts::Contracts;
use crate::error::Result;
use crate::transport::{Receipt, TxOptions};
use crate::units::fraction_from_base_units;
use alloy::primitives::{Address, U256};
use std::sync::Arc;

pub struct Rewards {
    contracts: Arc<Contracts>,
}

impl Rewards {
    pub(crate) fn new(contracts: Arc<Contracts>) -> Self {
        Self { contracts }
    }

    /// Unix timestamp the current claim interval started at.
    pub async fn get_claim_interval_time_start(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(
                names::REWARDS_POOL,
                RocketRewardsPool::getClaimIntervalTimeStartCall {},
            )
            .await?
            ._0)
    }

    /// Claim interval length in seconds.
    pub async fn get_claim_interval_time(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(names::REWARDS_POOL, RocketRewardsPool::getClaimIntervalTimeCall {})
            .await?
            ._0)
    }

    pub async fn get_rpl_balance(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(names::REWARDS_POOL, RocketRewardsPool::getRPLBalanceCall {})
            .await?
            ._0)
    }

    /// Share of each interval's rewards allotted to the claiming contract `contract_name`.
    pub async fn get_claiming_contract_perc(&self, contract_name: &str) -> Result<f64> {
        let perc = self
            .contracts
            .call(
                names::REWARDS_POOL,
                RocketRewardsPool::getClaimingContractPercCall {
                    contractName: contract_name.to_string(),
                },
            )
            .await?
            ._0;
        fraction_from_base_units(perc)
    }

    pub async fn get_node_claim_possible(&self, owner: Address) -> Result<bool> {
        Ok(self
            .contracts
            .call(names::CLAIM_NODE, RocketClaimNode::getClaimPossibleCall { owner })
            .await?
            ._0)
    }

    /// Share of the node rewards `owner` can claim this interval, as a fraction.
    pub async fn get_node_claim_rewards_perc(&self, owner: Address) -> Result<f64> {
        let perc = self
            .contracts
            .call(names::CLAIM_NODE, RocketClaimNode::getClaimRewardsPercCall { owner })
            .await?
            ._0;
        fraction_from_base_units(perc)
    }

    pub async fn claim_node(
        &self,
        options: &TxOptions,
        handler: Option<ConfirmationHandler>,
    ) -> Result<Receipt> {
        self.contracts
            .send(names::CLAIM_NODE, RocketClaimNode::claimCall {}, options, handler)
            .await
    }
}
