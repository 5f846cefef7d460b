//! Confirmation tracking: turns a [PendingCall] into a single receipt future while streaming
//! progress to an optional handler.
//!
//! The stream is always drained on a spawned task, so a caller that drops its
//! [PendingReceipt] (or registers no handler) still gets terminal failures logged rather
//! than lost. The handler observes every notification before the receipt future settles and
//! nothing after it.

use crate::error::{Error, Result};
use crate::transport::{PendingCall, Receipt, TxEvent};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Progress notification delivered to a [ConfirmationHandler].
#[derive(Debug)]
pub enum ConfirmationEvent<'a> {
    Confirmed {
        confirmations: u64,
        receipt: &'a Receipt,
    },
    Failed(&'a Error),
}

/// Caller-supplied observer of a transaction's confirmation stream.
pub type ConfirmationHandler = Box<dyn FnMut(ConfirmationEvent<'_>) + Send>;

/// Resolves once with the final receipt, or fails once with the terminal error.
#[must_use = "dropping a PendingReceipt leaves the transaction tracked only by logs"]
pub struct PendingReceipt {
    rx: oneshot::Receiver<Result<Receipt>>,
}

impl Future for PendingReceipt {
    type Output = Result<Receipt>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|r| {
            r.unwrap_or_else(|_| Err(Error::Transport("confirmation tracker stopped".into())))
        })
    }
}

/// Track `pending` to its terminal state. Must be called within a tokio runtime.
pub fn submit(pending: PendingCall, handler: Option<ConfirmationHandler>) -> PendingReceipt {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let outcome = track(pending, handler).await;
        if let Err(Err(e)) = tx.send(outcome) {
            tracing::warn!(reason = %e, "transaction failed with no caller awaiting its receipt");
        }
    });
    PendingReceipt { rx }
}

async fn track(mut pending: PendingCall, mut handler: Option<ConfirmationHandler>) -> Result<Receipt> {
    let mut last_seen = 0u64;
    let outcome = loop {
        let event = pending.next().await.unwrap_or_else(|| {
            TxEvent::Failed(Error::Transport(
                "confirmation stream closed before a receipt".into(),
            ))
        });
        match event {
            TxEvent::Hash(hash) => {
                tracing::debug!(tx = %hash, "transaction submitted");
            }
            TxEvent::Confirmation {
                confirmations,
                receipt,
            } => {
                if confirmations <= last_seen {
                    continue;
                }
                last_seen = confirmations;
                tracing::debug!(tx = %receipt.transaction_hash, confirmations, "confirmation");
                if let Some(h) = handler.as_mut() {
                    h(ConfirmationEvent::Confirmed {
                        confirmations,
                        receipt: &receipt,
                    });
                }
            }
            TxEvent::Receipt(receipt) => {
                tracing::info!(
                    tx = %receipt.transaction_hash,
                    block = receipt.block_number,
                    confirmations = receipt.confirmations,
                    "transaction confirmed"
                );
                break Ok(receipt);
            }
            TxEvent::Failed(e) => {
                if let Some(h) = handler.as_mut() {
                    h(ConfirmationEvent::Failed(&e));
                }
                break Err(e);
            }
        }
    };
    // Dropping the stream here guarantees the handler sees nothing after settlement.
    drop(pending);
    outcome
}
