//! Common helpers for integration tests: an in-memory ledger implementing [Transport].
//!
//! The ledger deploys a RocketStorage registry plus the group API, node manager, deposit
//! pool, network/node settings and rETH token. Group and node contracts are created on
//! registration. Auction, minipool, network balance and rewards contracts are never
//! registered, so their services fail with `NotRegistered`.

#![allow(dead_code)]

use alloy::primitives::{Address, Bytes, LogData, B256, U256};
use alloy::sol_types::{SolCall, SolEvent};
use async_trait::async_trait;
use rocketpool::abi::{
    names, RocketDepositPool, RocketGroupAPI, RocketGroupContract, RocketNetworkSettings,
    RocketNodeContract, RocketNodeManager, RocketNodeSettings, RocketStorage, RocketTokenRETH,
    ERC20,
};
use rocketpool::{ContractKey, Error, Log, PendingCall, Receipt, Result, Transport, TxEvent, TxOptions};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub const STORAGE: Address = Address::repeat_byte(0x5a);

/// 10^18 base units.
pub fn ether(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("rocketpool=debug".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    GroupApi,
    NodeManager,
    DepositPool,
    NetworkSettings,
    NodeSettings,
    RethToken,
    Group,
    NodeContract,
}

#[derive(Debug, Clone)]
struct GroupState {
    name: String,
    owner: Address,
    fee: U256,
    fee_address: Address,
}

#[derive(Debug, Clone)]
struct NodeState {
    contract: Address,
    timezone: String,
    rewards_address: Address,
    trusted: bool,
}

#[derive(Default)]
struct Ledger {
    registry: HashMap<B256, Address>,
    kinds: HashMap<Address, Kind>,
    groups: HashMap<Address, GroupState>,
    nodes: HashMap<Address, NodeState>,
    node_order: Vec<Address>,
    node_contracts: HashMap<Address, Address>,
    reth_balances: HashMap<Address, U256>,
    deposit_balance: U256,
    next_address: u64,
    block: u64,
}

impl Ledger {
    fn deploy(&mut self, kind: Kind) -> Address {
        self.next_address += 1;
        let mut bytes = [0u8; 20];
        bytes[0] = 0xc0;
        bytes[12..].copy_from_slice(&self.next_address.to_be_bytes());
        let address = Address::from(bytes);
        self.kinds.insert(address, kind);
        address
    }

    fn register(&mut self, key: ContractKey, address: Address) {
        self.registry.insert(key.storage_key(), address);
    }

    fn deploy_singleton(&mut self, name: &str, kind: Kind) -> Address {
        let address = self.deploy(kind);
        self.register(ContractKey::singleton(name), address);
        address
    }
}

/// Outcome of executing one transaction against the ledger.
type Execution = std::result::Result<Vec<Log>, String>;

/// In-memory ledger. Every transaction mines in its own block and is then confirmed
/// `confirmations` times.
pub struct MockLedger {
    state: Mutex<Ledger>,
    confirmations: u64,
    repeat_confirmations: bool,
    lookup_delay: Duration,
    lookups: AtomicUsize,
}

impl MockLedger {
    pub fn new() -> Self {
        let mut ledger = Ledger::default();
        ledger.deploy_singleton(names::GROUP_API, Kind::GroupApi);
        ledger.deploy_singleton(names::NODE_MANAGER, Kind::NodeManager);
        ledger.deploy_singleton(names::DEPOSIT_POOL, Kind::DepositPool);
        ledger.deploy_singleton(names::NETWORK_SETTINGS, Kind::NetworkSettings);
        ledger.deploy_singleton(names::NODE_SETTINGS, Kind::NodeSettings);
        ledger.deploy_singleton(names::TOKEN_RETH, Kind::RethToken);
        Self {
            state: Mutex::new(ledger),
            confirmations: 1,
            repeat_confirmations: false,
            lookup_delay: Duration::from_millis(0),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Confirmation depth reported for every transaction.
    pub fn with_confirmations(mut self, k: u64) -> Self {
        self.confirmations = k;
        self
    }

    /// Emit every confirmation count twice, as a node re-reporting the same block would.
    pub fn with_repeated_confirmations(mut self) -> Self {
        self.repeat_confirmations = true;
        self
    }

    /// Delay registry lookups so concurrent resolutions overlap.
    pub fn with_lookup_delay(mut self, delay: Duration) -> Self {
        self.lookup_delay = delay;
        self
    }

    /// Registry `getAddress` calls served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn mint_reth(&self, account: Address, amount: U256) {
        let mut ledger = self.state.lock().unwrap();
        *ledger.reth_balances.entry(account).or_default() += amount;
    }

    pub fn set_trusted(&self, owner: Address) {
        let mut ledger = self.state.lock().unwrap();
        if let Some(node) = ledger.nodes.get_mut(&owner) {
            node.trusted = true;
        }
    }

    fn read(&self, to: Address, data: &[u8]) -> std::result::Result<Bytes, String> {
        let ledger = self.state.lock().unwrap();
        if to == STORAGE {
            let call = decode::<RocketStorage::getAddressCall>(data)?;
            let address = ledger.registry.get(&call.key).copied().unwrap_or(Address::ZERO);
            return Ok(RocketStorage::getAddressCall::abi_encode_returns(&(address,)).into());
        }
        // A call to an address without code succeeds with empty return data.
        let Some(&kind) = ledger.kinds.get(&to) else {
            return Ok(Bytes::new());
        };
        let selector = selector(data)?;
        let out = match kind {
            Kind::GroupApi if selector == RocketGroupAPI::getGroupNameCall::SELECTOR => {
                let call = decode::<RocketGroupAPI::getGroupNameCall>(data)?;
                let name = ledger
                    .groups
                    .get(&call.group)
                    .map(|g| g.name.clone())
                    .unwrap_or_default();
                RocketGroupAPI::getGroupNameCall::abi_encode_returns(&(name,))
            }
            Kind::Group => {
                let group = ledger.groups.get(&to).ok_or("group missing")?;
                if selector == RocketGroupContract::getOwnerCall::SELECTOR {
                    RocketGroupContract::getOwnerCall::abi_encode_returns(&(group.owner,))
                } else if selector == RocketGroupContract::getFeePercCall::SELECTOR {
                    RocketGroupContract::getFeePercCall::abi_encode_returns(&(group.fee,))
                } else if selector == RocketGroupContract::getFeePercRocketPoolCall::SELECTOR {
                    let fee = ether(1) / U256::from(20);
                    RocketGroupContract::getFeePercRocketPoolCall::abi_encode_returns(&(fee,))
                } else if selector == RocketGroupContract::getFeeAddressCall::SELECTOR {
                    RocketGroupContract::getFeeAddressCall::abi_encode_returns(&(
                        group.fee_address,
                    ))
                } else {
                    return Err(String::new());
                }
            }
            Kind::NodeManager => {
                if selector == RocketNodeManager::getNodeCountCall::SELECTOR {
                    let count = U256::from(ledger.node_order.len());
                    RocketNodeManager::getNodeCountCall::abi_encode_returns(&(count,))
                } else if selector == RocketNodeManager::getNodeAtCall::SELECTOR {
                    let call = decode::<RocketNodeManager::getNodeAtCall>(data)?;
                    let index = usize::try_from(call.index).map_err(|e| e.to_string())?;
                    let owner = *ledger.node_order.get(index).ok_or("index out of range")?;
                    RocketNodeManager::getNodeAtCall::abi_encode_returns(&(owner,))
                } else if selector == RocketNodeManager::getNodeExistsCall::SELECTOR {
                    let call = decode::<RocketNodeManager::getNodeExistsCall>(data)?;
                    let exists = ledger.nodes.contains_key(&call.owner);
                    RocketNodeManager::getNodeExistsCall::abi_encode_returns(&(exists,))
                } else if selector == RocketNodeManager::getNodeTrustedCall::SELECTOR {
                    let call = decode::<RocketNodeManager::getNodeTrustedCall>(data)?;
                    let trusted = ledger.nodes.get(&call.owner).is_some_and(|n| n.trusted);
                    RocketNodeManager::getNodeTrustedCall::abi_encode_returns(&(trusted,))
                } else if selector == RocketNodeManager::getTimezoneLocationCall::SELECTOR {
                    let call = decode::<RocketNodeManager::getTimezoneLocationCall>(data)?;
                    let tz = ledger
                        .nodes
                        .get(&call.owner)
                        .map(|n| n.timezone.clone())
                        .unwrap_or_default();
                    RocketNodeManager::getTimezoneLocationCall::abi_encode_returns(&(tz,))
                } else {
                    return Err(String::new());
                }
            }
            Kind::NodeContract => {
                let owner = *ledger.node_contracts.get(&to).ok_or("node contract missing")?;
                let node = ledger.nodes.get(&owner).ok_or("node missing")?;
                if selector == RocketNodeContract::getOwnerCall::SELECTOR {
                    RocketNodeContract::getOwnerCall::abi_encode_returns(&(owner,))
                } else if selector == RocketNodeContract::getRewardsAddressCall::SELECTOR {
                    RocketNodeContract::getRewardsAddressCall::abi_encode_returns(&(
                        node.rewards_address,
                    ))
                } else if selector == RocketNodeContract::getBalanceETHCall::SELECTOR {
                    RocketNodeContract::getBalanceETHCall::abi_encode_returns(&(U256::ZERO,))
                } else if selector == RocketNodeContract::getBalanceRPLCall::SELECTOR {
                    RocketNodeContract::getBalanceRPLCall::abi_encode_returns(&(U256::ZERO,))
                } else {
                    return Err(String::new());
                }
            }
            Kind::DepositPool if selector == RocketDepositPool::getBalanceCall::SELECTOR => {
                RocketDepositPool::getBalanceCall::abi_encode_returns(&(ledger.deposit_balance,))
            }
            Kind::NetworkSettings => {
                let percent = |n: u64| ether(n) / U256::from(100);
                if selector == RocketNetworkSettings::getMinimumNodeFeeCall::SELECTOR {
                    RocketNetworkSettings::getMinimumNodeFeeCall::abi_encode_returns(&(percent(5),))
                } else if selector == RocketNetworkSettings::getTargetNodeFeeCall::SELECTOR {
                    RocketNetworkSettings::getTargetNodeFeeCall::abi_encode_returns(&(percent(10),))
                } else if selector == RocketNetworkSettings::getMaximumNodeFeeCall::SELECTOR {
                    RocketNetworkSettings::getMaximumNodeFeeCall::abi_encode_returns(&(percent(20),))
                } else if selector == RocketNetworkSettings::getSubmitBalancesEnabledCall::SELECTOR
                {
                    RocketNetworkSettings::getSubmitBalancesEnabledCall::abi_encode_returns(&(true,))
                } else {
                    return Err(String::new());
                }
            }
            Kind::NodeSettings => {
                if selector == RocketNodeSettings::getRegistrationEnabledCall::SELECTOR {
                    RocketNodeSettings::getRegistrationEnabledCall::abi_encode_returns(&(true,))
                } else if selector == RocketNodeSettings::getDepositEnabledCall::SELECTOR {
                    RocketNodeSettings::getDepositEnabledCall::abi_encode_returns(&(false,))
                } else {
                    return Err(String::new());
                }
            }
            Kind::RethToken => {
                if selector == ERC20::balanceOfCall::SELECTOR {
                    let call = decode::<ERC20::balanceOfCall>(data)?;
                    let balance = ledger.reth_balances.get(&call.account).copied().unwrap_or_default();
                    ERC20::balanceOfCall::abi_encode_returns(&(balance,))
                } else if selector == ERC20::totalSupplyCall::SELECTOR {
                    let supply = ledger.reth_balances.values().fold(U256::ZERO, |a, b| a + b);
                    ERC20::totalSupplyCall::abi_encode_returns(&(supply,))
                } else if selector == RocketTokenRETH::getExchangeRateCall::SELECTOR {
                    let rate = ether(102) / U256::from(100);
                    RocketTokenRETH::getExchangeRateCall::abi_encode_returns(&(rate,))
                } else {
                    return Err(String::new());
                }
            }
            _ => return Err(String::new()),
        };
        Ok(out.into())
    }

    fn execute(&self, to: Address, data: &[u8], options: &TxOptions) -> (u64, Execution) {
        let mut ledger = self.state.lock().unwrap();
        ledger.block += 1;
        let block = ledger.block;
        let from = options.from.unwrap_or(Address::ZERO);
        let value = options.value.unwrap_or_default();
        let result = self.apply(&mut ledger, block, to, from, value, data);
        (block, result)
    }

    fn apply(
        &self,
        ledger: &mut Ledger,
        block: u64,
        to: Address,
        from: Address,
        value: U256,
        data: &[u8],
    ) -> Execution {
        let kind = *ledger.kinds.get(&to).ok_or("no contract code at address")?;
        let selector = selector(data)?;
        match kind {
            Kind::GroupApi if selector == RocketGroupAPI::addCall::SELECTOR => {
                let call = decode::<RocketGroupAPI::addCall>(data)?;
                if call.stakingFee > ether(1) {
                    return Err("Invalid fee".into());
                }
                let group = ledger.deploy(Kind::Group);
                ledger.groups.insert(
                    group,
                    GroupState {
                        name: call.name.clone(),
                        owner: from,
                        fee: call.stakingFee,
                        fee_address: from,
                    },
                );
                let event = RocketGroupAPI::GroupAdd {
                    group,
                    name: call.name,
                    stakingFee: call.stakingFee,
                    created: U256::from(block),
                };
                Ok(vec![log(to, event.encode_log_data())])
            }
            Kind::Group => {
                let group = ledger.groups.get_mut(&to).ok_or("group missing")?;
                if group.owner != from {
                    return Err("Sender is not the group owner".into());
                }
                if selector == RocketGroupContract::setFeePercCall::SELECTOR {
                    let call = decode::<RocketGroupContract::setFeePercCall>(data)?;
                    if call.stakingFee > ether(1) {
                        return Err("Invalid fee".into());
                    }
                    group.fee = call.stakingFee;
                } else if selector == RocketGroupContract::setFeeAddressCall::SELECTOR {
                    let call = decode::<RocketGroupContract::setFeeAddressCall>(data)?;
                    group.fee_address = call.feeAddress;
                } else {
                    return Err(String::new());
                }
                Ok(vec![])
            }
            Kind::NodeManager if selector == RocketNodeManager::addCall::SELECTOR => {
                let call = decode::<RocketNodeManager::addCall>(data)?;
                if ledger.nodes.contains_key(&from) {
                    return Err("Node is already registered".into());
                }
                let contract = ledger.deploy(Kind::NodeContract);
                ledger.register(ContractKey::owned(names::NODE_CONTRACT, from), contract);
                ledger.node_contracts.insert(contract, from);
                ledger.node_order.push(from);
                ledger.nodes.insert(
                    from,
                    NodeState {
                        contract,
                        timezone: call.timezoneLocation,
                        rewards_address: from,
                        trusted: false,
                    },
                );
                let event = RocketNodeManager::NodeAdd {
                    owner: from,
                    contractAddress: contract,
                    created: U256::from(block),
                };
                Ok(vec![log(to, event.encode_log_data())])
            }
            Kind::NodeManager if selector == RocketNodeManager::setTimezoneLocationCall::SELECTOR => {
                let call = decode::<RocketNodeManager::setTimezoneLocationCall>(data)?;
                let node = ledger.nodes.get_mut(&from).ok_or("Invalid node")?;
                node.timezone = call.timezoneLocation;
                Ok(vec![])
            }
            Kind::NodeContract if selector == RocketNodeContract::setRewardsAddressCall::SELECTOR => {
                let call = decode::<RocketNodeContract::setRewardsAddressCall>(data)?;
                let owner = *ledger.node_contracts.get(&to).ok_or("node contract missing")?;
                if owner != from {
                    return Err("Sender is not the node owner".into());
                }
                let node = ledger.nodes.get_mut(&owner).ok_or("node missing")?;
                node.rewards_address = call.rewardsAddress;
                Ok(vec![])
            }
            Kind::DepositPool if selector == RocketDepositPool::depositCall::SELECTOR => {
                ledger.deposit_balance += value;
                *ledger.reth_balances.entry(from).or_default() += value;
                Ok(vec![])
            }
            Kind::RethToken if selector == ERC20::transferCall::SELECTOR => {
                let call = decode::<ERC20::transferCall>(data)?;
                let balance = ledger.reth_balances.entry(from).or_default();
                if *balance < call.amount {
                    return Err("Insufficient balance".into());
                }
                *balance -= call.amount;
                *ledger.reth_balances.entry(call.to).or_default() += call.amount;
                let event = ERC20::Transfer {
                    from,
                    to: call.to,
                    value: call.amount,
                };
                Ok(vec![log(to, event.encode_log_data())])
            }
            _ => Err(String::new()),
        }
    }
}

#[async_trait]
impl Transport for MockLedger {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        if to == STORAGE {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if !self.lookup_delay.is_zero() {
                tokio::time::sleep(self.lookup_delay).await;
            }
        }
        self.read(to, &data).map_err(Error::from_revert_reason)
    }

    fn send(&self, to: Address, data: Bytes, options: &TxOptions) -> PendingCall {
        let (tx, pending) = PendingCall::channel();
        let (block, execution) = self.execute(to, &data, options);
        let transaction_hash = B256::from(U256::from(block));
        let _ = tx.send(TxEvent::Hash(transaction_hash));
        match execution {
            Ok(logs) => {
                let mut receipt = Receipt {
                    transaction_hash,
                    block_number: block,
                    confirmations: 0,
                    status: true,
                    gas_used: 21_000,
                    logs,
                };
                for n in 1..=self.confirmations {
                    receipt.confirmations = n;
                    let repeats = if self.repeat_confirmations { 2 } else { 1 };
                    for _ in 0..repeats {
                        let _ = tx.send(TxEvent::Confirmation {
                            confirmations: n,
                            receipt: receipt.clone(),
                        });
                    }
                }
                let _ = tx.send(TxEvent::Receipt(receipt));
            }
            Err(reason) => {
                let _ = tx.send(TxEvent::Failed(Error::from_revert_reason(reason)));
            }
        }
        pending
    }
}

fn selector(data: &[u8]) -> std::result::Result<[u8; 4], String> {
    data.get(..4)
        .and_then(|s| <[u8; 4]>::try_from(s).ok())
        .ok_or_else(|| "calldata shorter than a selector".to_string())
}

fn decode<C: SolCall>(data: &[u8]) -> std::result::Result<C, String> {
    C::abi_decode(data, true).map_err(|e| e.to_string())
}

fn log(address: Address, data: LogData) -> Log {
    Log {
        address,
        topics: data.topics().to_vec(),
        data: data.data,
    }
}
