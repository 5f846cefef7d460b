//! Contract resolution: logical names (and per-owner keys) to bound contract addresses.
//!
//! Addresses come from the RocketStorage registry and are immutable once registered, so a
//! successful resolution is cached for the life of the [Contracts] instance. Concurrent first
//! lookups of one key share a single in-flight registry query. Failed lookups are handed to
//! every waiter and then evicted, so a later call can observe a fresh registration.

use crate::abi::RocketStorage;
use crate::confirmation::{self, ConfirmationHandler};
use crate::error::{Error, Result};
use crate::transport::{Receipt, Transport, TxOptions};
use alloy::primitives::{Address, Bytes, B256};
use alloy::sol_types::SolCall;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use sha3::{Digest, Keccak256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Registry key namespace for contract addresses.
const ADDRESS_NAMESPACE: &[u8] = b"contract.address";

/// Cache key: a singleton contract name, or a name plus owning address for dynamic contracts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractKey {
    pub name: String,
    pub owner: Option<Address>,
}

impl ContractKey {
    pub fn singleton(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: None,
        }
    }

    pub fn owned(name: impl Into<String>, owner: Address) -> Self {
        Self {
            name: name.into(),
            owner: Some(owner),
        }
    }

    /// RocketStorage slot: `keccak256("contract.address" ++ name [++ owner])`, packed.
    pub fn storage_key(&self) -> B256 {
        let mut hasher = Keccak256::new();
        hasher.update(ADDRESS_NAMESPACE);
        hasher.update(self.name.as_bytes());
        if let Some(owner) = &self.owner {
            hasher.update(owner.as_slice());
        }
        B256::from_slice(&hasher.finalize())
    }
}

/// A resolved contract: logical name plus network address. The callable method set is the
/// `sol!` interface the caller encodes against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractBinding {
    pub name: String,
    pub address: Address,
}

impl ContractBinding {
    pub fn new(name: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }

    /// Read-only call, decoded against `C`'s return types.
    pub async fn call<C: SolCall>(&self, transport: &dyn Transport, call: C) -> Result<C::Return> {
        let data = transport
            .call(self.address, Bytes::from(call.abi_encode()))
            .await?;
        C::abi_decode_returns(&data, true)
            .map_err(|e| Error::Abi(format!("{}.{}: {e}", self.name, C::SIGNATURE)))
    }
}

type Resolution = Shared<BoxFuture<'static, Result<ContractBinding>>>;

/// Contract resolver and call helpers shared by every domain service.
pub struct Contracts {
    transport: Arc<dyn Transport>,
    storage: ContractBinding,
    cache: Mutex<HashMap<ContractKey, Resolution>>,
}

impl Contracts {
    pub fn new(transport: Arc<dyn Transport>, storage_address: Address) -> Self {
        Self {
            transport,
            storage: ContractBinding::new("rocketStorage", storage_address),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// The registry contract binding.
    pub fn storage(&self) -> &ContractBinding {
        &self.storage
    }

    /// Resolve `key`, at most one registry lookup in flight per key.
    pub async fn resolve(&self, key: ContractKey) -> Result<ContractBinding> {
        let resolution = {
            let mut cache = self.cache.lock().await;
            cache
                .entry(key.clone())
                .or_insert_with(|| {
                    lookup(Arc::clone(&self.transport), self.storage.clone(), key.clone())
                        .boxed()
                        .shared()
                })
                .clone()
        };
        let result = resolution.clone().await;
        if result.is_err() {
            let mut cache = self.cache.lock().await;
            if cache.get(&key).is_some_and(|r| r.ptr_eq(&resolution)) {
                cache.remove(&key);
            }
        }
        result
    }

    /// Resolve a singleton contract by logical name.
    pub async fn get(&self, name: &str) -> Result<ContractBinding> {
        self.resolve(ContractKey::singleton(name)).await
    }

    /// Resolve the dynamic contract `name` registered for `owner`.
    pub async fn get_owned(&self, name: &str, owner: Address) -> Result<ContractBinding> {
        self.resolve(ContractKey::owned(name, owner)).await
    }

    /// Bind a contract whose address the caller already knows. No registry lookup.
    pub fn at(&self, name: &str, address: Address) -> ContractBinding {
        ContractBinding::new(name, address)
    }

    /// Read-only call on a singleton contract.
    pub async fn call<C: SolCall>(&self, name: &str, call: C) -> Result<C::Return> {
        let binding = self.get(name).await?;
        binding.call(self.transport(), call).await
    }

    /// Read-only call on an already-bound contract.
    pub async fn call_at<C: SolCall>(&self, binding: &ContractBinding, call: C) -> Result<C::Return> {
        binding.call(self.transport(), call).await
    }

    /// State-changing call on a singleton contract, tracked to its final receipt.
    pub async fn send<C: SolCall>(
        &self,
        name: &str,
        call: C,
        options: &TxOptions,
        handler: Option<ConfirmationHandler>,
    ) -> Result<Receipt> {
        options.require_sender()?;
        let binding = self.get(name).await?;
        self.send_at(&binding, call, options, handler).await
    }

    /// State-changing call on an already-bound contract, tracked to its final receipt.
    pub async fn send_at<C: SolCall>(
        &self,
        binding: &ContractBinding,
        call: C,
        options: &TxOptions,
        handler: Option<ConfirmationHandler>,
    ) -> Result<Receipt> {
        let from = options.require_sender()?;
        tracing::debug!(
            contract = %binding.name,
            address = %binding.address,
            method = C::SIGNATURE,
            %from,
            "sending transaction"
        );
        let pending = self
            .transport
            .send(binding.address, Bytes::from(call.abi_encode()), options);
        confirmation::submit(pending, handler).await
    }
}

async fn lookup(
    transport: Arc<dyn Transport>,
    storage: ContractBinding,
    key: ContractKey,
) -> Result<ContractBinding> {
    tracing::debug!(name = %key.name, owner = ?key.owner, "resolving contract address");
    let address = storage
        .call(
            transport.as_ref(),
            RocketStorage::getAddressCall {
                key: key.storage_key(),
            },
        )
        .await?
        ._0;
    if address == Address::ZERO {
        return Err(Error::NotRegistered {
            name: key.name,
            owner: key.owner,
        });
    }
    tracing::debug!(name = %key.name, %address, "contract resolved");
    Ok(ContractBinding::new(key.name, address))
}
