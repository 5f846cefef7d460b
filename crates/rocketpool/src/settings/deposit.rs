use crate::abi::{names, RocketDepositSettings};
use crate::contracts::Contracts;
use crate::error::Result;
use alloy::primitives::U256;
use std::sync::Arc;

pub struct DepositSettings {
    contracts: Arc<Contracts>,
}

impl DepositSettings {
    pub(crate) fn new(contracts: Arc<Contracts>) -> Self {
        Self { contracts }
    }

    pub async fn get_deposit_enabled(&self) -> Result<bool> {
        Ok(self
            .contracts
            .call(names::DEPOSIT_SETTINGS, RocketDepositSettings::getDepositEnabledCall {})
            .await?
            ._0)
    }

    pub async fn get_assign_deposits_enabled(&self) -> Result<bool> {
        Ok(self
            .contracts
            .call(
                names::DEPOSIT_SETTINGS,
                RocketDepositSettings::getAssignDepositsEnabledCall {},
            )
            .await?
            ._0)
    }

    /// Smallest accepted deposit, in base units.
    pub async fn get_minimum_deposit(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(names::DEPOSIT_SETTINGS, RocketDepositSettings::getMinimumDepositCall {})
            .await?
            ._0)
    }

    pub async fn get_maximum_deposit_assignments(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(
                names::DEPOSIT_SETTINGS,
                RocketDepositSettings::getMaximumDepositAssignmentsCall {},
            )
            .await?
            ._0)
    }
}
