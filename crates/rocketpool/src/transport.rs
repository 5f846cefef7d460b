//! Transport seam: the remote-procedure primitives the facade needs from a blockchain node.
//!
//! A [Transport] offers a read-only `call` and a state-changing `send`. `send` hands back a
//! [PendingCall], a stream of [TxEvent]s ending in exactly one terminal event
//! ([TxEvent::Receipt] or [TxEvent::Failed]). [crate::HttpTransport] is the JSON-RPC
//! implementation; tests supply in-memory ones.

use crate::error::{Error, Result};
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol_types::SolEvent;
use async_trait::async_trait;
use tokio::sync::mpsc;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a read-only call against `to` and return the raw return data.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes>;

    /// Dispatch a state-changing call. Failures, including submission failures, arrive on
    /// the returned stream as [TxEvent::Failed].
    fn send(&self, to: Address, data: Bytes, options: &TxOptions) -> PendingCall;
}

/// Sender options for state-changing calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxOptions {
    /// Sending account. Required by every mutator.
    pub from: Option<Address>,
    /// Gas limit.
    pub gas: Option<u64>,
    /// Base units attached to payable calls.
    pub value: Option<U256>,
}

impl TxOptions {
    pub fn sender(from: Address) -> Self {
        Self {
            from: Some(from),
            ..Default::default()
        }
    }

    pub fn gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    pub fn value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    pub(crate) fn require_sender(&self) -> Result<Address> {
        self.from
            .ok_or_else(|| Error::Config("sender options require `from` for mutators".into()))
    }
}

/// One emitted event log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// Outcome record of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: B256,
    pub block_number: u64,
    /// Blocks built on top of (and including) the receipt's block when this copy was taken.
    pub confirmations: u64,
    pub status: bool,
    pub gas_used: u64,
    pub logs: Vec<Log>,
}

impl Receipt {
    /// Decode every log whose first topic matches `E`.
    pub fn events<E: SolEvent>(&self) -> Vec<E> {
        self.logs
            .iter()
            .filter(|log| log.topics.first() == Some(&E::SIGNATURE_HASH))
            .filter_map(|log| {
                E::decode_raw_log(log.topics.iter().copied(), &log.data, true)
                    .map_err(|e| tracing::debug!(%e, event = E::SIGNATURE, "log decode skipped"))
                    .ok()
            })
            .collect()
    }

    /// Decode the first log matching `E`, failing if the receipt carries none.
    pub fn event<E: SolEvent>(&self) -> Result<E> {
        self.events::<E>()
            .into_iter()
            .next()
            .ok_or_else(|| Error::Abi(format!("receipt has no {} event", E::SIGNATURE)))
    }
}

/// Notification emitted by a pending state-changing call.
#[derive(Debug, Clone)]
pub enum TxEvent {
    /// The node accepted the transaction.
    Hash(B256),
    /// The transaction has `confirmations` blocks on top of it (counting its own).
    Confirmation { confirmations: u64, receipt: Receipt },
    /// Terminal: the transaction reached its final confirmed state.
    Receipt(Receipt),
    /// Terminal: the transaction failed.
    Failed(Error),
}

/// An already-dispatched state-changing call.
#[derive(Debug)]
pub struct PendingCall {
    events: mpsc::UnboundedReceiver<TxEvent>,
}

impl PendingCall {
    /// A pending call plus the sender a transport drives it with.
    pub fn channel() -> (mpsc::UnboundedSender<TxEvent>, PendingCall) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, PendingCall { events: rx })
    }

    /// A pending call that has already failed.
    pub fn failed(error: Error) -> PendingCall {
        let (tx, pending) = Self::channel();
        let _ = tx.send(TxEvent::Failed(error));
        pending
    }

    /// Next notification; `None` once the transport hung up.
    pub async fn next(&mut self) -> Option<TxEvent> {
        self.events.recv().await
    }
}
