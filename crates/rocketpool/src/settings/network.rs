use crate::abi::{names, RocketNetworkSettings};
use crate::contracts::Contracts;
use crate::error::Result;
use crate::units::fraction_from_base_units;
use alloy::primitives::U256;
use std::sync::Arc;

pub struct NetworkSettings {
    contracts: Arc<Contracts>,
}

impl NetworkSettings {
    pub(crate) fn new(contracts: Arc<Contracts>) -> Self {
        Self { contracts }
    }

    /// Share of trusted nodes that must agree on submitted balances.
    pub async fn get_node_consensus_threshold(&self) -> Result<f64> {
        let threshold = self
            .contracts
            .call(
                names::NETWORK_SETTINGS,
                RocketNetworkSettings::getNodeConsensusThresholdCall {},
            )
            .await?
            ._0;
        fraction_from_base_units(threshold)
    }

    pub async fn get_submit_balances_enabled(&self) -> Result<bool> {
        Ok(self
            .contracts
            .call(
                names::NETWORK_SETTINGS,
                RocketNetworkSettings::getSubmitBalancesEnabledCall {},
            )
            .await?
            ._0)
    }

    pub async fn get_submit_balances_frequency(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(
                names::NETWORK_SETTINGS,
                RocketNetworkSettings::getSubmitBalancesFrequencyCall {},
            )
            .await?
            ._0)
    }

    pub async fn get_minimum_node_fee(&self) -> Result<f64> {
        let fee = self
            .contracts
            .call(names::NETWORK_SETTINGS, RocketNetworkSettings::getMinimumNodeFeeCall {})
            .await?
            ._0;
        fraction_from_base_units(fee)
    }

    pub async fn get_target_node_fee(&self) -> Result<f64> {
        let fee = self
            .contracts
            .call(names::NETWORK_SETTINGS, RocketNetworkSettings::getTargetNodeFeeCall {})
            .await?
            ._0;
        fraction_from_base_units(fee)
    }

    pub async fn get_maximum_node_fee(&self) -> Result<f64> {
        let fee = self
            .contracts
            .call(names::NETWORK_SETTINGS, RocketNetworkSettings::getMaximumNodeFeeCall {})
            .await?
            ._0;
        fraction_from_base_units(fee)
    }

    pub async fn get_target_reth_collateral_rate(&self) -> Result<f64> {
        let rate = self
            .contracts
            .call(
                names::NETWORK_SETTINGS,
                RocketNetworkSettings::getTargetRethCollateralRateCall {},
            )
            .await?
            ._0;
        fraction_from_base_units(rate)
    }
}
