use super::Erc20Token;
use crate::abi::RocketTokenRETH;
use crate::confirmation::ConfirmationHandler;
use crate::error::{Error, Result};
use crate::transport::{Receipt, TxOptions};
use crate::units::fraction_from_base_units;
use alloy::primitives::U256;
use std::ops::Deref;

/// rETH, the liquid staking token.
pub struct RethToken {
    token: Erc20Token,
}

impl RethToken {
    pub(crate) fn new(token: Erc20Token) -> Self {
        Self { token }
    }

    /// ETH backing one rETH.
    pub async fn get_exchange_rate(&self) -> Result<f64> {
        let rate = self
            .contracts()
            .call(self.name(), RocketTokenRETH::getExchangeRateCall {})
            .await?
            ._0;
        fraction_from_base_units(rate)
    }

    /// ETH value of `reth_amount` base units of rETH.
    pub async fn get_eth_value(&self, reth_amount: U256) -> Result<U256> {
        Ok(self
            .contracts()
            .call(
                self.name(),
                RocketTokenRETH::getEthValueCall {
                    rethAmount: reth_amount,
                },
            )
            .await?
            ._0)
    }

    /// rETH value of `eth_amount` base units of ETH.
    pub async fn get_reth_value(&self, eth_amount: U256) -> Result<U256> {
        Ok(self
            .contracts()
            .call(
                self.name(),
                RocketTokenRETH::getRethValueCall {
                    ethAmount: eth_amount,
                },
            )
            .await?
            ._0)
    }

    /// Burn rETH for ETH from the collateral pool.
    pub async fn burn(
        &self,
        amount: U256,
        options: &TxOptions,
        handler: Option<ConfirmationHandler>,
    ) -> Result<Receipt> {
        if amount.is_zero() {
            return Err(Error::InvalidAmount("burn amount must be non-zero".into()));
        }
        self.contracts()
            .send(self.name(), RocketTokenRETH::burnCall { amount }, options, handler)
            .await
    }
}

impl Deref for RethToken {
    type Target = Erc20Token;

    fn deref(&self) -> &Erc20Token {
        &self.token
    }
}
