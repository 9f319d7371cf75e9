//! Network-specific error types.

use thiserror::Error;

use super::Network;

/// Errors that can occur while selecting or scoping a network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The value is not one of `localnet`, `testnet`, `mainnet`.
    #[error("Invalid network '{0}'. Expected one of: localnet, testnet, mainnet")]
    InvalidNetwork(String),

    /// The operation is only meaningful on a different network.
    #[error("{operation} is only available on {required}. Current network: {active}")]
    OutOfScope {
        operation: String,
        required: Network,
        active: Network,
    },
}

impl NetworkError {
    /// Create a new "invalid network" error.
    pub fn invalid(value: impl Into<String>) -> Self {
        Self::InvalidNetwork(value.into())
    }

    /// Create a new "out of scope" error.
    pub fn out_of_scope(operation: impl Into<String>, required: Network, active: Network) -> Self {
        Self::OutOfScope {
            operation: operation.into(),
            required,
            active,
        }
    }
}
