//! Nodes: registration, node manager queries, and each node's own contract.
//!
//! Every registered node owns a dedicated contract whose address is recorded in the
//! registry under (`rocketNodeContract`, owner). Lookups go through the resolver's per-owner
//! path, so repeated operations on one node reuse the cached binding.

use crate::abi::{names, RocketNodeContract, RocketNodeManager};
use crate::confirmation::ConfirmationHandler;
use crate::contracts::{ContractBinding, Contracts};
use crate::error::Result;
use crate::transport::{Receipt, TxOptions};
use alloy::primitives::{Address, U256};
use std::sync::Arc;

/// Node service.
pub struct Node {
    contracts: Arc<Contracts>,
}

impl Node {
    pub(crate) fn new(contracts: Arc<Contracts>) -> Self {
        Self { contracts }
    }

    /// Register the sender as a node. Returns the address of its new node contract.
    pub async fn add(
        &self,
        timezone_location: &str,
        options: &TxOptions,
        handler: Option<ConfirmationHandler>,
    ) -> Result<Address> {
        let receipt = self
            .contracts
            .send(
                names::NODE_MANAGER,
                RocketNodeManager::addCall {
                    timezoneLocation: timezone_location.to_string(),
                },
                options,
                handler,
            )
            .await?;
        let added: RocketNodeManager::NodeAdd = receipt.event()?;
        tracing::info!(owner = %added.owner, contract = %added.contractAddress, "node registered");
        Ok(added.contractAddress)
    }

    /// Address of the node contract registered for `owner`.
    pub async fn get_contract_address(&self, owner: Address) -> Result<Address> {
        Ok(self
            .contracts
            .get_owned(names::NODE_CONTRACT, owner)
            .await?
            .address)
    }

    /// Contract wrapper for the node registered by `owner`.
    pub async fn get_contract(&self, owner: Address) -> Result<NodeContract> {
        let binding = self.contracts.get_owned(names::NODE_CONTRACT, owner).await?;
        Ok(NodeContract {
            contracts: Arc::clone(&self.contracts),
            binding,
        })
    }

    pub async fn get_node_count(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(names::NODE_MANAGER, RocketNodeManager::getNodeCountCall {})
            .await?
            ._0)
    }

    pub async fn get_node_at(&self, index: U256) -> Result<Address> {
        Ok(self
            .contracts
            .call(names::NODE_MANAGER, RocketNodeManager::getNodeAtCall { index })
            .await?
            ._0)
    }

    pub async fn get_node_exists(&self, owner: Address) -> Result<bool> {
        Ok(self
            .contracts
            .call(names::NODE_MANAGER, RocketNodeManager::getNodeExistsCall { owner })
            .await?
            ._0)
    }

    pub async fn get_trusted(&self, owner: Address) -> Result<bool> {
        Ok(self
            .contracts
            .call(names::NODE_MANAGER, RocketNodeManager::getNodeTrustedCall { owner })
            .await?
            ._0)
    }

    pub async fn get_timezone_location(&self, owner: Address) -> Result<String> {
        Ok(self
            .contracts
            .call(names::NODE_MANAGER, RocketNodeManager::getTimezoneLocationCall { owner })
            .await?
            ._0)
    }

    /// Update the sender's timezone location.
    pub async fn set_timezone_location(
        &self,
        timezone_location: &str,
        options: &TxOptions,
        handler: Option<ConfirmationHandler>,
    ) -> Result<Receipt> {
        self.contracts
            .send(
                names::NODE_MANAGER,
                RocketNodeManager::setTimezoneLocationCall {
                    timezoneLocation: timezone_location.to_string(),
                },
                options,
                handler,
            )
            .await
    }
}

/// Wrapper over one node's contract instance.
pub struct NodeContract {
    contracts: Arc<Contracts>,
    binding: ContractBinding,
}

impl NodeContract {
    pub fn address(&self) -> Address {
        self.binding.address
    }

    pub async fn get_owner(&self) -> Result<Address> {
        Ok(self
            .contracts
            .call_at(&self.binding, RocketNodeContract::getOwnerCall {})
            .await?
            ._0)
    }

    pub async fn get_rewards_address(&self) -> Result<Address> {
        Ok(self
            .contracts
            .call_at(&self.binding, RocketNodeContract::getRewardsAddressCall {})
            .await?
            ._0)
    }

    /// Restricted to the node owner.
    pub async fn set_rewards_address(
        &self,
        rewards_address: Address,
        options: &TxOptions,
        handler: Option<ConfirmationHandler>,
    ) -> Result<Receipt> {
        self.contracts
            .send_at(
                &self.binding,
                RocketNodeContract::setRewardsAddressCall {
                    rewardsAddress: rewards_address,
                },
                options,
                handler,
            )
            .await
    }

    /// ETH held by the node contract, in base units.
    pub async fn get_eth_balance(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call_at(&self.binding, RocketNodeContract::getBalanceETHCall {})
            .await?
            ._0)
    }

    /// RPL held by the node contract, in base units.
    pub async fn get_rpl_balance(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call_at(&self.binding, RocketNodeContract::getBalanceRPLCall {})
            .await?
            ._0)
    }
}
