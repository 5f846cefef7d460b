//! Minipools: manager and queue queries, plus per-minipool contract wrappers.

use crate::abi::{names, RocketMinipool, RocketMinipoolManager, RocketMinipoolQueue};
use crate::contracts::{ContractBinding, Contracts};
use crate::error::{Error, Result};
use crate::units::fraction_from_base_units;
use alloy::primitives::{Address, U256};
use std::sync::Arc;

const MINIPOOL_CONTRACT: &str = "rocketMinipool";

/// Minipool lifecycle status (matches the contract's enum order).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MinipoolStatus {
    Initialized = 0,
    Prelaunch = 1,
    Staking = 2,
    Withdrawable = 3,
    Dissolved = 4,
}

impl MinipoolStatus {
    pub fn from_u8(n: u8) -> Option<Self> {
        match n {
            0 => Some(MinipoolStatus::Initialized),
            1 => Some(MinipoolStatus::Prelaunch),
            2 => Some(MinipoolStatus::Staking),
            3 => Some(MinipoolStatus::Withdrawable),
            4 => Some(MinipoolStatus::Dissolved),
            _ => None,
        }
    }
}

pub struct Minipool {
    contracts: Arc<Contracts>,
}

impl Minipool {
    pub(crate) fn new(contracts: Arc<Contracts>) -> Self {
        Self { contracts }
    }

    pub fn get_contract(&self, address: Address) -> MinipoolContract {
        MinipoolContract {
            contracts: Arc::clone(&self.contracts),
            binding: self.contracts.at(MINIPOOL_CONTRACT, address),
        }
    }

    pub async fn get_minipool_count(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(names::MINIPOOL_MANAGER, RocketMinipoolManager::getMinipoolCountCall {})
            .await?
            ._0)
    }

    pub async fn get_minipool_at(&self, index: U256) -> Result<Address> {
        Ok(self
            .contracts
            .call(names::MINIPOOL_MANAGER, RocketMinipoolManager::getMinipoolAtCall { index })
            .await?
            ._0)
    }

    pub async fn get_node_minipool_count(&self, owner: Address) -> Result<U256> {
        Ok(self
            .contracts
            .call(
                names::MINIPOOL_MANAGER,
                RocketMinipoolManager::getNodeMinipoolCountCall { owner },
            )
            .await?
            ._0)
    }

    pub async fn get_minipool_exists(&self, minipool: Address) -> Result<bool> {
        Ok(self
            .contracts
            .call(
                names::MINIPOOL_MANAGER,
                RocketMinipoolManager::getMinipoolExistsCall { minipool },
            )
            .await?
            ._0)
    }

    /// Minipools waiting in the assignment queue.
    pub async fn get_queue_total_length(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(names::MINIPOOL_QUEUE, RocketMinipoolQueue::getTotalLengthCall {})
            .await?
            ._0)
    }
}

/// Wrapper over one minipool contract.
pub struct MinipoolContract {
    contracts: Arc<Contracts>,
    binding: ContractBinding,
}

impl MinipoolContract {
    pub fn address(&self) -> Address {
        self.binding.address
    }

    pub async fn get_status(&self) -> Result<MinipoolStatus> {
        let raw = self
            .contracts
            .call_at(&self.binding, RocketMinipool::getStatusCall {})
            .await?
            ._0;
        MinipoolStatus::from_u8(raw)
            .ok_or_else(|| Error::Abi(format!("unknown minipool status {raw}")))
    }

    pub async fn get_node_address(&self) -> Result<Address> {
        Ok(self
            .contracts
            .call_at(&self.binding, RocketMinipool::getNodeAddressCall {})
            .await?
            ._0)
    }

    /// Commission charged by the node operator, as a fraction.
    pub async fn get_node_fee(&self) -> Result<f64> {
        let fee = self
            .contracts
            .call_at(&self.binding, RocketMinipool::getNodeFeeCall {})
            .await?
            ._0;
        fraction_from_base_units(fee)
    }

    pub async fn get_node_deposit_balance(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call_at(&self.binding, RocketMinipool::getNodeDepositBalanceCall {})
            .await?
            ._0)
    }
}
