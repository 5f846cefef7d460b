//! JSON-RPC transport over HTTP.
//!
//! Reads go through `eth_call`. Writes use `eth_sendTransaction` (the node holds the
//! sender's key), then poll `eth_getTransactionReceipt` and `eth_blockNumber` until the
//! receipt has the configured number of confirmations.

use crate::abi::{decode_receipt, parse_hex_bytes, parse_hex_bytes_32, parse_hex_u64};
use crate::config::{ClientConfig, PollConfig};
use crate::error::{Error, Result};
use crate::transport::{PendingCall, Receipt, Transport, TxEvent, TxOptions};
use alloy::primitives::{Address, Bytes, B256};
use alloy::sol_types::{Revert, SolError};
use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl RpcError {
    fn into_error(self) -> Error {
        tracing::debug!(code = self.code, message = %self.message, "JSON-RPC error");
        let error = Error::from_rpc_message(&self.message);
        if error.reason().map_or(true, |r| !r.is_empty()) {
            return error;
        }
        // Some nodes carry the reason only in `data`, either plain or as ABI-encoded Error(string).
        let from_data = match &self.data {
            Some(Value::String(s)) if s.starts_with("0x") => parse_hex_bytes(s)
                .ok()
                .and_then(|b| Revert::abi_decode(&b, true).ok())
                .map(|r| r.reason),
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        };
        match from_data {
            Some(reason) if !reason.is_empty() => Error::from_revert_reason(reason),
            _ => error,
        }
    }
}

struct RpcClient {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params
        });
        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let resp: RpcResponse = resp.json().await?;
        if let Some(err) = resp.error {
            return Err(err.into_error());
        }
        Ok(resp.result.unwrap_or(Value::Null))
    }

    async fn block_number(&self) -> Result<u64> {
        let result = self.request("eth_blockNumber", json!([])).await?;
        let s = result
            .as_str()
            .ok_or_else(|| Error::Transport("blockNumber not string".into()))?;
        parse_hex_u64(s)
    }
}

fn tx_object(to: Address, data: &Bytes, options: &TxOptions) -> Value {
    let mut tx = json!({
        "to": format!("{to:#x}"),
        "data": format!("0x{}", hex::encode(data)),
    });
    if let Some(from) = options.from {
        tx["from"] = Value::String(format!("{from:#x}"));
    }
    if let Some(gas) = options.gas {
        tx["gas"] = Value::String(format!("0x{gas:x}"));
    }
    if let Some(value) = options.value {
        tx["value"] = Value::String(format!("0x{value:x}"));
    }
    tx
}

/// Builder for [HttpTransport].
pub struct HttpTransportBuilder {
    http_url: Option<String>,
    confirmations: u64,
    poll: PollConfig,
}

impl HttpTransportBuilder {
    pub fn new() -> Self {
        Self {
            http_url: None,
            confirmations: 1,
            poll: PollConfig::default(),
        }
    }

    pub fn http_url(mut self, url: impl Into<String>) -> Self {
        self.http_url = Some(url.into());
        self
    }

    /// Confirmations required before a receipt is final (minimum 1).
    pub fn confirmations(mut self, k: u64) -> Self {
        self.confirmations = k;
        self
    }

    pub fn poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn build(self) -> Result<HttpTransport> {
        let url = self
            .http_url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| Error::Config("http_url required".into()))?;
        if self.confirmations == 0 {
            return Err(Error::Config("confirmations must be at least 1".into()));
        }
        if self.poll.interval_ms == 0 {
            return Err(Error::Config("poll interval must be non-zero".into()));
        }
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;
        Ok(HttpTransport {
            rpc: Arc::new(RpcClient {
                client,
                url,
                next_id: AtomicU64::new(1),
            }),
            confirmations: self.confirmations,
            poll: self.poll,
        })
    }
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Ethereum JSON-RPC transport.
pub struct HttpTransport {
    rpc: Arc<RpcClient>,
    confirmations: u64,
    poll: PollConfig,
}

impl HttpTransport {
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::new()
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        HttpTransportBuilder::new()
            .http_url(&config.http_url)
            .confirmations(config.confirmations)
            .poll(config.poll.clone())
            .build()
    }

    /// Current chain tip.
    pub async fn block_number(&self) -> Result<u64> {
        self.rpc.block_number().await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let tx = tx_object(to, &data, &TxOptions::default());
        let result = self.rpc.request("eth_call", json!([tx, "latest"])).await?;
        let s = result
            .as_str()
            .ok_or_else(|| Error::Transport("eth_call result not string".into()))?;
        Ok(Bytes::from(parse_hex_bytes(s)?))
    }

    fn send(&self, to: Address, data: Bytes, options: &TxOptions) -> PendingCall {
        let (events, pending) = PendingCall::channel();
        let tx = tx_object(to, &data, options);
        let rpc = Arc::clone(&self.rpc);
        let required = self.confirmations;
        let poll = self.poll.clone();
        tokio::spawn(async move {
            if let Err(e) = drive(&rpc, tx, required, &poll, &events).await {
                tracing::warn!(reason = %e, "transaction failed");
                let _ = events.send(TxEvent::Failed(e));
            }
        });
        pending
    }
}

async fn pause(poll: &PollConfig) {
    let jitter = if poll.jitter_ms > 0 {
        rand::thread_rng().gen_range(0..poll.jitter_ms)
    } else {
        0
    };
    sleep(poll.interval() + Duration::from_millis(jitter)).await;
}

/// Submit `tx` and stream its confirmations. Returns early (Ok) when nobody is listening.
async fn drive(
    rpc: &RpcClient,
    tx: Value,
    required: u64,
    poll: &PollConfig,
    events: &mpsc::UnboundedSender<TxEvent>,
) -> Result<()> {
    let hash = rpc.request("eth_sendTransaction", json!([tx.clone()])).await?;
    let hash = parse_hex_bytes_32(
        hash.as_str()
            .ok_or_else(|| Error::Transport("transaction hash not string".into()))?,
    )?;
    if events.send(TxEvent::Hash(hash)).is_err() {
        return Ok(());
    }

    let receipt = wait_for_receipt(rpc, hash, poll, events).await?;
    let Some(receipt) = receipt else {
        return Ok(());
    };
    if !receipt.status {
        return Err(replay_failure(rpc, tx, receipt.block_number).await);
    }

    let mut seen = 0u64;
    loop {
        let tip = rpc.block_number().await?;
        // A tip behind the receipt block (another backend answered) confirms nothing yet.
        let confirmations = tip
            .checked_sub(receipt.block_number)
            .map_or(0, |depth| depth + 1);
        while seen < confirmations.min(required) {
            seen += 1;
            let progress = Receipt {
                confirmations: seen,
                ..receipt.clone()
            };
            let event = TxEvent::Confirmation {
                confirmations: seen,
                receipt: progress,
            };
            if events.send(event).is_err() {
                return Ok(());
            }
        }
        if seen >= required {
            let final_receipt = Receipt {
                confirmations: seen,
                ..receipt
            };
            let _ = events.send(TxEvent::Receipt(final_receipt));
            return Ok(());
        }
        pause(poll).await;
    }
}

async fn wait_for_receipt(
    rpc: &RpcClient,
    hash: B256,
    poll: &PollConfig,
    events: &mpsc::UnboundedSender<TxEvent>,
) -> Result<Option<Receipt>> {
    loop {
        if events.is_closed() {
            return Ok(None);
        }
        let value = rpc
            .request("eth_getTransactionReceipt", json!([format!("{hash:#x}")]))
            .await?;
        if !value.is_null() {
            return decode_receipt(&value).map(Some);
        }
        pause(poll).await;
    }
}

/// Re-run a failed transaction as a call at its block to recover the revert reason.
async fn replay_failure(rpc: &RpcClient, mut tx: Value, block_number: u64) -> Error {
    if let Some(obj) = tx.as_object_mut() {
        obj.remove("gas");
    }
    let block = format!("0x{block_number:x}");
    match rpc.request("eth_call", json!([tx, block])).await {
        Err(e @ (Error::Unauthorized(_) | Error::ExecutionReverted(_))) => e,
        _ => Error::ExecutionReverted("transaction reverted without a reason".into()),
    }
}
