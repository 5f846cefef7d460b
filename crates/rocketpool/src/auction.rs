//! RPL auction lots.

use crate::abi::{names, RocketAuctionManager};
use crate::confirmation::ConfirmationHandler;
use crate::contracts::Contracts;
use crate::error::{Error, Result};
use crate::transport::{Receipt, TxOptions};
use crate::units::fraction_from_base_units;
use alloy::primitives::U256;
use std::sync::Arc;

pub struct Auction {
    contracts: Arc<Contracts>,
}

impl Auction {
    pub(crate) fn new(contracts: Arc<Contracts>) -> Self {
        Self { contracts }
    }

    pub async fn get_total_rpl_balance(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(names::AUCTION_MANAGER, RocketAuctionManager::getTotalRPLBalanceCall {})
            .await?
            ._0)
    }

    pub async fn get_remaining_rpl_balance(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(names::AUCTION_MANAGER, RocketAuctionManager::getRemainingRPLBalanceCall {})
            .await?
            ._0)
    }

    pub async fn get_lot_count(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(names::AUCTION_MANAGER, RocketAuctionManager::getLotCountCall {})
            .await?
            ._0)
    }

    /// Starting price of a lot in ETH per RPL.
    pub async fn get_lot_start_price(&self, index: U256) -> Result<f64> {
        let price = self
            .contracts
            .call(
                names::AUCTION_MANAGER,
                RocketAuctionManager::getLotStartPriceCall { index },
            )
            .await?
            ._0;
        fraction_from_base_units(price)
    }

    pub async fn create_lot(
        &self,
        options: &TxOptions,
        handler: Option<ConfirmationHandler>,
    ) -> Result<Receipt> {
        self.contracts
            .send(
                names::AUCTION_MANAGER,
                RocketAuctionManager::createLotCall {},
                options,
                handler,
            )
            .await
    }

    /// Bid `options.value` base units of ETH on a lot.
    pub async fn place_bid(
        &self,
        lot_index: U256,
        options: &TxOptions,
        handler: Option<ConfirmationHandler>,
    ) -> Result<Receipt> {
        if options.value.map_or(true, |v| v.is_zero()) {
            return Err(Error::InvalidAmount("bid requires a non-zero value".into()));
        }
        self.contracts
            .send(
                names::AUCTION_MANAGER,
                RocketAuctionManager::placeBidCall { lotIndex: lot_index },
                options,
                handler,
            )
            .await
    }

    pub async fn claim_bid(
        &self,
        lot_index: U256,
        options: &TxOptions,
        handler: Option<ConfirmationHandler>,
    ) -> Result<Receipt> {
        self.contracts
            .send(
                names::AUCTION_MANAGER,
                RocketAuctionManager::claimBidCall { lotIndex: lot_index },
                options,
                handler,
            )
            .await
    }
}
