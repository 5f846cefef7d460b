//! Error taxonomy for the contract facade.
//!
//! Every failure reaches the caller as one of these variants; nothing is retried internally.
//! `Error` is `Clone` because a single in-flight contract resolution hands the same outcome
//! to every waiter.

use alloy::primitives::Address;
use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Local input rejected before any remote interaction.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The registry holds the zero address for the requested key.
    #[error("contract not registered: {name}{}", owner_suffix(.owner))]
    NotRegistered {
        name: String,
        owner: Option<Address>,
    },

    /// The remote call failed at the network or JSON-RPC layer.
    #[error("transport error: {0}")]
    Transport(String),

    /// The contract rejected the caller's authority. Carries the raw revert reason.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The transaction ran but was rolled back. Carries the raw revert reason.
    #[error("execution reverted: {0}")]
    ExecutionReverted(String),

    /// Return data or event logs could not be decoded against the expected ABI.
    #[error("ABI error: {0}")]
    Abi(String),

    /// Missing or malformed client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

fn owner_suffix(owner: &Option<Address>) -> String {
    owner.map(|o| format!(" (owner {o})")).unwrap_or_default()
}

/// Fragments of revert reasons emitted when the sender lacks an on-chain role.
const ROLE_FRAGMENTS: &[&str] = &[
    "not the owner",
    "not the group owner",
    "not the node owner",
    "only owner",
    "onlyowner",
    "unauthorized",
    "unauthorised",
    "permission",
    "invalid or outdated contract",
    "account is not",
    "sender is not",
];

impl Error {
    /// Classify a raw revert reason into [Error::Unauthorized] or [Error::ExecutionReverted].
    pub fn from_revert_reason(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let lower = reason.to_ascii_lowercase();
        if ROLE_FRAGMENTS.iter().any(|f| lower.contains(f)) {
            Error::Unauthorized(reason)
        } else {
            Error::ExecutionReverted(reason)
        }
    }

    /// Classify a JSON-RPC error message. Messages that carry a revert are split into the
    /// reason string; everything else is a transport failure.
    pub fn from_rpc_message(message: &str) -> Self {
        match revert_reason(message) {
            Some(reason) => Error::from_revert_reason(reason),
            None => Error::Transport(message.to_string()),
        }
    }

    /// The raw remote failure reason, when the remote side supplied one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Error::Unauthorized(r) | Error::ExecutionReverted(r) => Some(r),
            _ => None,
        }
    }
}

/// Extract the reason from node messages such as
/// `execution reverted: Sender is not the group owner` or
/// `VM Exception while processing transaction: revert Invalid fee`.
fn revert_reason(message: &str) -> Option<String> {
    let lower = message.to_ascii_lowercase();
    for marker in ["execution reverted:", "reverted with reason string", "revert "] {
        if let Some(idx) = lower.find(marker) {
            let reason = message[idx + marker.len()..]
                .trim()
                .trim_matches(|c| c == '\'' || c == '"')
                .trim();
            return Some(reason.to_string());
        }
    }
    if lower.contains("execution reverted") || lower.ends_with("revert") {
        return Some(String::new());
    }
    None
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e.to_string())
    }
}

impl From<alloy::sol_types::Error> for Error {
    fn from(e: alloy::sol_types::Error) -> Self {
        Error::Abi(e.to_string())
    }
}
