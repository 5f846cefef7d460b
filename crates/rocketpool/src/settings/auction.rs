use crate::abi::{names, RocketAuctionSettings};
use crate::contracts::Contracts;
use crate::error::Result;
use crate::units::fraction_from_base_units;
use alloy::primitives::U256;
use std::sync::Arc;

pub struct AuctionSettings {
    contracts: Arc<Contracts>,
}

impl AuctionSettings {
    pub(crate) fn new(contracts: Arc<Contracts>) -> Self {
        Self { contracts }
    }

    pub async fn get_create_lot_enabled(&self) -> Result<bool> {
        Ok(self
            .contracts
            .call(names::AUCTION_SETTINGS, RocketAuctionSettings::getCreateLotEnabledCall {})
            .await?
            ._0)
    }

    pub async fn get_bid_on_lot_enabled(&self) -> Result<bool> {
        Ok(self
            .contracts
            .call(names::AUCTION_SETTINGS, RocketAuctionSettings::getBidOnLotEnabledCall {})
            .await?
            ._0)
    }

    pub async fn get_lot_minimum_eth_value(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(names::AUCTION_SETTINGS, RocketAuctionSettings::getLotMinimumEthValueCall {})
            .await?
            ._0)
    }

    pub async fn get_lot_maximum_eth_value(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(names::AUCTION_SETTINGS, RocketAuctionSettings::getLotMaximumEthValueCall {})
            .await?
            ._0)
    }

    /// Lot duration in blocks.
    pub async fn get_lot_duration(&self) -> Result<U256> {
        Ok(self
            .contracts
            .call(names::AUCTION_SETTINGS, RocketAuctionSettings::getLotDurationCall {})
            .await?
            ._0)
    }

    pub async fn get_starting_price_ratio(&self) -> Result<f64> {
        let ratio = self
            .contracts
            .call(names::AUCTION_SETTINGS, RocketAuctionSettings::getStartingPriceRatioCall {})
            .await?
            ._0;
        fraction_from_base_units(ratio)
    }

    pub async fn get_reserve_price_ratio(&self) -> Result<f64> {
        let ratio = self
            .contracts
            .call(names::AUCTION_SETTINGS, RocketAuctionSettings::getReservePriceRatioCall {})
            .await?
            ._0;
        fraction_from_base_units(ratio)
    }
}
