//! Typed client facade over the Rocket Pool staking contracts.
//!
//! - **Contracts**: resolves logical contract names (and per-owner dynamic contracts) through
//!   the RocketStorage registry, caching each binding and sharing one in-flight lookup per key.
//! - **Confirmation tracking**: [submit] turns a dispatched transaction into a single receipt
//!   future while streaming confirmation counts to an optional [ConfirmationHandler].
//! - **Domain services**: group, node, minipool, deposit, auction, network, settings, tokens
//!   and rewards, composed under [RocketPool]. Fees and rates cross the boundary as `f64`
//!   fractions via [units]; everything remote stays in 18-decimal base units.

pub mod abi;
pub mod auction;
pub mod config;
pub mod confirmation;
pub mod contracts;
pub mod deposit;
pub mod error;
pub mod group;
pub mod http;
pub mod minipool;
pub mod network;
pub mod node;
pub mod rewards;
pub mod rocketpool;
pub mod settings;
pub mod tokens;
pub mod transport;
pub mod units;

pub use config::{ClientConfig, PollConfig};
pub use confirmation::{submit, ConfirmationEvent, ConfirmationHandler, PendingReceipt};
pub use contracts::{ContractBinding, ContractKey, Contracts};
pub use error::{Error, Result};
pub use group::{GroupContract, GroupDetails};
pub use http::{HttpTransport, HttpTransportBuilder};
pub use minipool::{MinipoolContract, MinipoolStatus};
pub use network::NetworkBalances;
pub use node::NodeContract;
pub use rocketpool::RocketPool;
pub use transport::{Log, PendingCall, Receipt, Transport, TxEvent, TxOptions};
pub use units::{to_local_fraction, to_remote_integer};
