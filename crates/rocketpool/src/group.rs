//! Groups: registration through the group API and per-group contract instances.

use crate::abi::{names, RocketGroupAPI, RocketGroupContract};
use crate::confirmation::ConfirmationHandler;
use crate::contracts::{ContractBinding, Contracts};
use crate::error::Result;
use crate::transport::{Receipt, TxOptions};
use crate::units::{fraction_from_base_units, fraction_to_base_units};
use alloy::primitives::Address;
use std::sync::Arc;

const GROUP_CONTRACT: &str = "rocketGroupContract";

/// Snapshot of a group's configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDetails {
    pub owner: Address,
    pub group_fee: f64,
    pub rocket_pool_fee: f64,
    pub group_fee_address: Address,
}

/// Group service.
pub struct Group {
    contracts: Arc<Contracts>,
}

impl Group {
    pub(crate) fn new(contracts: Arc<Contracts>) -> Self {
        Self { contracts }
    }

    /// Contract wrapper for the group at `address`.
    ///
    /// Groups are bound by address, not through the registry. An address that holds no group
    /// contract surfaces on the first call as [crate::Error::Abi] or
    /// [crate::Error::ExecutionReverted], never as [crate::Error::NotRegistered].
    pub fn get_contract(&self, address: Address) -> GroupContract {
        GroupContract {
            contracts: Arc::clone(&self.contracts),
            binding: self.contracts.at(GROUP_CONTRACT, address),
        }
    }

    pub async fn get_name(&self, group: Address) -> Result<String> {
        Ok(self
            .contracts
            .call(names::GROUP_API, RocketGroupAPI::getGroupNameCall { group })
            .await?
            ._0)
    }

    /// Fee charged by `group` to its users, as a fraction.
    ///
    /// `group` is bound by address (see [Group::get_contract]), so an unknown address fails
    /// with `Abi` or `ExecutionReverted` rather than `NotRegistered`.
    pub async fn get_group_fee(&self, group: Address) -> Result<f64> {
        self.get_contract(group).get_group_fee().await
    }

    /// Register a new group charging `fee`. Returns the new group contract's address.
    pub async fn add(
        &self,
        name: &str,
        fee: f64,
        options: &TxOptions,
        handler: Option<ConfirmationHandler>,
    ) -> Result<Address> {
        let staking_fee = fraction_to_base_units(fee)?;
        let receipt = self
            .contracts
            .send(
                names::GROUP_API,
                RocketGroupAPI::addCall {
                    name: name.to_string(),
                    stakingFee: staking_fee,
                },
                options,
                handler,
            )
            .await?;
        let added: RocketGroupAPI::GroupAdd = receipt.event()?;
        tracing::info!(group = %added.group, name, "group registered");
        Ok(added.group)
    }
}

/// Wrapper over one group's contract instance.
pub struct GroupContract {
    contracts: Arc<Contracts>,
    binding: ContractBinding,
}

impl GroupContract {
    pub fn address(&self) -> Address {
        self.binding.address
    }

    pub async fn get_details(&self) -> Result<GroupDetails> {
        let (owner, group_fee, rocket_pool_fee, group_fee_address) = tokio::try_join!(
            self.get_owner(),
            self.get_group_fee(),
            self.get_rocket_pool_fee(),
            self.get_group_fee_address(),
        )?;
        Ok(GroupDetails {
            owner,
            group_fee,
            rocket_pool_fee,
            group_fee_address,
        })
    }

    pub async fn get_owner(&self) -> Result<Address> {
        Ok(self
            .contracts
            .call_at(&self.binding, RocketGroupContract::getOwnerCall {})
            .await?
            ._0)
    }

    /// Fee charged to the group's users by the group.
    pub async fn get_group_fee(&self) -> Result<f64> {
        let fee = self
            .contracts
            .call_at(&self.binding, RocketGroupContract::getFeePercCall {})
            .await?
            ._0;
        fraction_from_base_units(fee)
    }

    /// Fee charged to the group's users by Rocket Pool.
    pub async fn get_rocket_pool_fee(&self) -> Result<f64> {
        let fee = self
            .contracts
            .call_at(&self.binding, RocketGroupContract::getFeePercRocketPoolCall {})
            .await?
            ._0;
        fraction_from_base_units(fee)
    }

    /// Address group fees are sent to.
    pub async fn get_group_fee_address(&self) -> Result<Address> {
        Ok(self
            .contracts
            .call_at(&self.binding, RocketGroupContract::getFeeAddressCall {})
            .await?
            ._0)
    }

    /// Restricted to the group owner.
    pub async fn set_group_fee(
        &self,
        fee: f64,
        options: &TxOptions,
        handler: Option<ConfirmationHandler>,
    ) -> Result<Receipt> {
        let staking_fee = fraction_to_base_units(fee)?;
        self.contracts
            .send_at(
                &self.binding,
                RocketGroupContract::setFeePercCall {
                    stakingFee: staking_fee,
                },
                options,
                handler,
            )
            .await
    }

    /// Restricted to the group owner.
    pub async fn set_group_fee_address(
        &self,
        fee_address: Address,
        options: &TxOptions,
        handler: Option<ConfirmationHandler>,
    ) -> Result<Receipt> {
        self.contracts
            .send_at(
                &self.binding,
                RocketGroupContract::setFeeAddressCall {
                    feeAddress: fee_address,
                },
                options,
                handler,
            )
            .await
    }
}
