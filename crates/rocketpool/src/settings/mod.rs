//! Protocol settings, one service per domain.

mod auction;
mod deposit;
mod minipool;
mod network;
mod node;

pub use auction::AuctionSettings;
pub use deposit::DepositSettings;
pub use minipool::MinipoolSettings;
pub use network::NetworkSettings;
pub use node::NodeSettings;

use crate::contracts::Contracts;
use std::sync::Arc;

/// Settings namespace of [crate::RocketPool].
pub struct Settings {
    pub auction: AuctionSettings,
    pub deposit: DepositSettings,
    pub minipool: MinipoolSettings,
    pub network: NetworkSettings,
    pub node: NodeSettings,
}

impl Settings {
    pub(crate) fn new(contracts: &Arc<Contracts>) -> Self {
        Self {
            auction: AuctionSettings::new(Arc::clone(contracts)),
            deposit: DepositSettings::new(Arc::clone(contracts)),
            minipool: MinipoolSettings::new(Arc::clone(contracts)),
            network: NetworkSettings::new(Arc::clone(contracts)),
            node: NodeSettings::new(Arc::clone(contracts)),
        }
    }
}
