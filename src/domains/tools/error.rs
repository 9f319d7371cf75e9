//! Tool-specific error types.

use thiserror::Error;

use crate::domains::ledger::LedgerError;
use crate::domains::network::NetworkError;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Input passed the schema but failed local validation.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Unknown network or network-scope violation.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The delegated ledger call failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Two tools were registered under the same name.
    #[error("Tool '{0}' is registered more than once")]
    DuplicateName(&'static str),
}

impl ToolError {
    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }
}
