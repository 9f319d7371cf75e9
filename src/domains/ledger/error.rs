//! Ledger client error types.

use thiserror::Error;

use crate::domains::network::Network;

/// Errors raised by a [`LedgerClient`](super::LedgerClient).
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The HTTP request to the node failed.
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The node answered with a non-success status.
    #[error("Node returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The sender's key is not held by this client.
    #[error("No signing key for {address} on {network}; generate or restore the account first")]
    UnknownSigner { address: String, network: Network },

    /// No account is available to fund from.
    #[error("Dispenser unavailable on {network}: {reason}")]
    DispenserUnavailable { network: Network, reason: String },

    #[error("Invalid address '{0}'")]
    InvalidAddress(String),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// A value could not be encoded for the wire.
    #[error("Encoding failed: {0}")]
    Encoding(String),

    /// The node or signer rejected the operation.
    #[error("{0}")]
    Rejected(String),

    /// The configured node endpoint is unusable.
    #[error("Invalid node endpoint '{0}'")]
    InvalidEndpoint(String),
}

impl LedgerError {
    /// Create a new "rejected" error.
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    pub fn dispenser_unavailable(network: Network, reason: impl Into<String>) -> Self {
        Self::DispenserUnavailable {
            network,
            reason: reason.into(),
        }
    }
}

impl From<rmp_serde::encode::Error> for LedgerError {
    fn from(err: rmp_serde::encode::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}
