//! Network balances and node fee queries.

use crate::abi::{names, RocketNetworkBalances, RocketNetworkFees};
use crate::confirmation::ConfirmationHandler;
use crate::contracts::Contracts;
use crate::error::Result;
use crate::transport::{Receipt, TxOptions};
use crate::units::fraction_from_base_units;
use alloy::primitives::{I256, U256};
use std::sync::Arc;

/// Balances reported by trusted nodes for one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkBalances {
    pub block: U256,
    pub total_eth: U256,
    pub staking_eth: U256,
    pub reth_supply: U256,
}

pub struct Network {
    contracts: Arc<Contracts>,
}

impl Network {
    pub(crate) fn new(contracts: Arc<Contracts>) -> Self {
        Self { contracts }
    }

    pub async fn get_balances_block(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(names::NETWORK_BALANCES, RocketNetworkBalances::getBalancesBlockCall {})
            .await?
            ._0)
    }

    pub async fn get_total_eth_balance(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(names::NETWORK_BALANCES, RocketNetworkBalances::getTotalETHBalanceCall {})
            .await?
            ._0)
    }

    pub async fn get_total_reth_supply(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(names::NETWORK_BALANCES, RocketNetworkBalances::getTotalRETHSupplyCall {})
            .await?
            ._0)
    }

    /// Share of network ETH currently staking, as a fraction.
    pub async fn get_eth_utilization_rate(&self) -> Result<f64> {
        let rate = self
            .contracts
            .call(
                names::NETWORK_BALANCES,
                RocketNetworkBalances::getETHUtilizationRateCall {},
            )
            .await?
            ._0;
        fraction_from_base_units(rate)
    }

    /// Node demand in base units; negative when node capacity exceeds user deposits.
    pub async fn get_node_demand(&self) -> Result<I256> {
        Ok(self
            .contracts
            .call(names::NETWORK_FEES, RocketNetworkFees::getNodeDemandCall {})
            .await?
            ._0)
    }

    /// Current node commission rate, as a fraction.
    pub async fn get_node_fee(&self) -> Result<f64> {
        let fee = self
            .contracts
            .call(names::NETWORK_FEES, RocketNetworkFees::getNodeFeeCall {})
            .await?
            ._0;
        fraction_from_base_units(fee)
    }

    /// Restricted to trusted nodes.
    pub async fn submit_balances(
        &self,
        balances: &NetworkBalances,
        options: &TxOptions,
        handler: Option<ConfirmationHandler>,
    ) -> Result<Receipt> {
        self.contracts
            .send(
                names::NETWORK_BALANCES,
                RocketNetworkBalances::submitBalancesCall {
                    blockNumber: balances.block,
                    totalEth: balances.total_eth,
                    stakingEth: balances.staking_eth,
                    rethSupply: balances.reth_supply,
                },
                options,
                handler,
            )
            .await
    }
}
