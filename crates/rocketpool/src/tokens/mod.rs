//! Protocol tokens: rETH and RPL over a shared ERC-20 core.

mod reth;
mod rpl;

pub use reth::RethToken;
pub use rpl::RplToken;

use crate::abi::{names, ERC20};
use crate::confirmation::ConfirmationHandler;
use crate::contracts::Contracts;
use crate::error::{Error, Result};
use crate::transport::{Receipt, TxOptions};
use alloy::primitives::{Address, U256};
use std::sync::Arc;

/// Tokens namespace of [crate::RocketPool].
pub struct Tokens {
    pub reth: RethToken,
    pub rpl: RplToken,
}

impl Tokens {
    pub(crate) fn new(contracts: &Arc<Contracts>) -> Self {
        Self {
            reth: RethToken::new(Erc20Token::new(Arc::clone(contracts), names::TOKEN_RETH)),
            rpl: RplToken::new(Erc20Token::new(Arc::clone(contracts), names::TOKEN_RPL)),
        }
    }
}

/// ERC-20 operations common to every protocol token, addressed by registry name.
pub struct Erc20Token {
    contracts: Arc<Contracts>,
    name: &'static str,
}

impl Erc20Token {
    pub(crate) fn new(contracts: Arc<Contracts>, name: &'static str) -> Self {
        Self { contracts, name }
    }

    /// Registry name of the token contract.
    pub fn name(&self) -> &str {
        self.name
    }

    pub async fn get_balance(&self, account: Address) -> Result<U256> {
        Ok(self
            .contracts
            .call(self.name, ERC20::balanceOfCall { account })
            .await?
            ._0)
    }

    pub async fn get_total_supply(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(self.name, ERC20::totalSupplyCall {})
            .await?
            ._0)
    }

    pub async fn transfer(
        &self,
        to: Address,
        amount: U256,
        options: &TxOptions,
        handler: Option<ConfirmationHandler>,
    ) -> Result<Receipt> {
        if amount.is_zero() {
            return Err(Error::InvalidAmount("transfer amount must be non-zero".into()));
        }
        self.contracts
            .send(self.name, ERC20::transferCall { to, amount }, options, handler)
            .await
    }

    pub(crate) fn contracts(&self) -> &Contracts {
        &self.contracts
    }
}
