//! Client configuration.

use alloy::primitives::Address;
use std::time::Duration;

/// Client configuration for [crate::RocketPool::connect].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// HTTP JSON-RPC URL (eth_call, eth_sendTransaction, eth_getTransactionReceipt).
    pub http_url: String,
    /// RocketStorage registry contract address.
    pub storage_address: Address,
    /// Confirmations a transaction needs before its receipt is final.
    pub confirmations: u64,
    /// Receipt and block polling.
    pub poll: PollConfig,
}

impl ClientConfig {
    pub fn new(http_url: impl Into<String>, storage_address: Address) -> Self {
        Self {
            http_url: http_url.into(),
            storage_address,
            confirmations: 1,
            poll: PollConfig::default(),
        }
    }
}

/// Receipt polling cadence.
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval_ms: u64,
    /// Upper bound of random jitter added to each interval.
    pub jitter_ms: u64,
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 500,
            jitter_ms: 100,
        }
    }
}
