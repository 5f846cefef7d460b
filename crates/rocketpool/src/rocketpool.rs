//! Root facade composing every domain service over one transport and registry.

use crate::auction::Auction;
use crate::config::ClientConfig;
use crate::contracts::Contracts;
use crate::deposit::Deposit;
use crate::error::Result;
use crate::group::Group;
use crate::http::HttpTransport;
use crate::minipool::Minipool;
use crate::network::Network;
use crate::node::Node;
use crate::rewards::Rewards;
use crate::settings::Settings;
use crate::tokens::Tokens;
use crate::transport::Transport;
use alloy::primitives::Address;
use std::sync::Arc;

/// Entry point: one per (transport, registry address) pair.
///
/// Construction makes no remote calls. Services share one [Contracts] resolver, so a
/// contract resolved through any service is cached for all of them.
pub struct RocketPool {
    contracts: Arc<Contracts>,
    group: Group,
    node: Node,
    minipool: Minipool,
    deposit: Deposit,
    auction: Auction,
    network: Network,
    settings: Settings,
    tokens: Tokens,
    rewards: Rewards,
}

impl RocketPool {
    pub fn new(transport: Arc<dyn Transport>, storage_address: Address) -> Self {
        let contracts = Arc::new(Contracts::new(transport, storage_address));
        Self {
            group: Group::new(Arc::clone(&contracts)),
            node: Node::new(Arc::clone(&contracts)),
            minipool: Minipool::new(Arc::clone(&contracts)),
            deposit: Deposit::new(Arc::clone(&contracts)),
            auction: Auction::new(Arc::clone(&contracts)),
            network: Network::new(Arc::clone(&contracts)),
            settings: Settings::new(&contracts),
            tokens: Tokens::new(&contracts),
            rewards: Rewards::new(Arc::clone(&contracts)),
            contracts,
        }
    }

    /// Build an [HttpTransport] from `config` and compose the facade over it.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::from_config(config)?;
        tracing::info!(
            url = %config.http_url,
            storage = %config.storage_address,
            confirmations = config.confirmations,
            "connected rocketpool client"
        );
        Ok(Self::new(Arc::new(transport), config.storage_address))
    }

    pub fn contracts(&self) -> &Contracts {
        &self.contracts
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn minipool(&self) -> &Minipool {
        &self.minipool
    }

    pub fn deposit(&self) -> &Deposit {
        &self.deposit
    }

    pub fn auction(&self) -> &Auction {
        &self.auction
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tokens(&self) -> &Tokens {
        &self.tokens
    }

    pub fn rewards(&self) -> &Rewards {
        &self.rewards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_rejects_bad_config() {
        let mut config = ClientConfig::new("", Address::ZERO);
        assert!(RocketPool::connect(&config).is_err());
        config.http_url = "http://127.0.0.1:8545".into();
        config.confirmations = 0;
        assert!(RocketPool::connect(&config).is_err());
    }

    #[test]
    fn connect_builds_without_remote_calls() {
        let config = ClientConfig::new("http://127.0.0.1:1", Address::repeat_byte(0x11));
        let rp = RocketPool::connect(&config).expect("valid config");
        assert_eq!(rp.contracts().storage().address, Address::repeat_byte(0x11));
        assert_eq!(rp.tokens().reth.name(), "rocketETHToken");
    }
}
