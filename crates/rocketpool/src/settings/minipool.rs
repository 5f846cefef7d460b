use crate::abi::{names, RocketMinipoolSettings};
use crate::contracts::Contracts;
use crate::error::Result;
use alloy::primitives::U256;
use std::sync::Arc;

pub struct MinipoolSettings {
    contracts: Arc<Contracts>,
}

impl MinipoolSettings {
    pub(crate) fn new(contracts: Arc<Contracts>) -> Self {
        Self { contracts }
    }

    /// ETH a minipool needs to launch, in base units.
    pub async fn get_launch_balance(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(names::MINIPOOL_SETTINGS, RocketMinipoolSettings::getLaunchBalanceCall {})
            .await?
            ._0)
    }

    pub async fn get_submit_withdrawable_enabled(&self) -> Result<bool> {
        Ok(self
            .contracts
            .call(
                names::MINIPOOL_SETTINGS,
                RocketMinipoolSettings::getSubmitWithdrawableEnabledCall {},
            )
            .await?
            ._0)
    }

    /// Blocks a prelaunch minipool may wait before it can be dissolved.
    pub async fn get_launch_timeout(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(names::MINIPOOL_SETTINGS, RocketMinipoolSettings::getLaunchTimeoutCall {})
            .await?
            ._0)
    }
}
