//! User deposits into the deposit pool.

use crate::abi::{names, RocketDepositPool};
use crate::confirmation::ConfirmationHandler;
use crate::contracts::Contracts;
use crate::error::{Error, Result};
use crate::transport::{Receipt, TxOptions};
use alloy::primitives::U256;
use std::sync::Arc;

pub struct Deposit {
    contracts: Arc<Contracts>,
}

impl Deposit {
    pub(crate) fn new(contracts: Arc<Contracts>) -> Self {
        Self { contracts }
    }

    /// ETH held by the deposit pool, in base units.
    pub async fn get_balance(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(names::DEPOSIT_POOL, RocketDepositPool::getBalanceCall {})
            .await?
            ._0)
    }

    /// Deposit `options.value` base units of ETH.
    pub async fn deposit(
        &self,
        options: &TxOptions,
        handler: Option<ConfirmationHandler>,
    ) -> Result<Receipt> {
        if options.value.map_or(true, |v| v.is_zero()) {
            return Err(Error::InvalidAmount("deposit requires a non-zero value".into()));
        }
        self.contracts
            .send(names::DEPOSIT_POOL, RocketDepositPool::depositCall {}, options, handler)
            .await
    }

    /// Assign pooled deposits to queued minipools.
    pub async fn assign_deposits(
        &self,
        options: &TxOptions,
        handler: Option<ConfirmationHandler>,
    ) -> Result<Receipt> {
        self.contracts
            .send(
                names::DEPOSIT_POOL,
                RocketDepositPool::assignDepositsCall {},
                options,
                handler,
            )
            .await
    }
}
