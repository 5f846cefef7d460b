use crate::abi::{names, RocketNodeSettings};
use crate::contracts::Contracts;
use crate::error::Result;
use std::sync::Arc;

pub struct NodeSettings {
    contracts: Arc<Contracts>,
}

impl NodeSettings {
    pub(crate) fn new(contracts: Arc<Contracts>) -> Self {
        Self { contracts }
    }

    pub async fn get_registration_enabled(&self) -> Result<bool> {
        Ok(self
            .contracts
            .call(names::NODE_SETTINGS, RocketNodeSettings::getRegistrationEnabledCall {})
            .await?
            ._0)
    }

    pub async fn get_deposit_enabled(&self) -> Result<bool> {
        Ok(self
            .contracts
            .call(names::NODE_SETTINGS, RocketNodeSettings::getDepositEnabledCall {})
            .await?
            ._0)
    }
}
