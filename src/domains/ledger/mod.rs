//! Ledger domain module.
//!
//! The collaborator boundary: everything that actually touches an Algorand
//! node (lookups, signing, submission, confirmation) sits behind the
//! [`LedgerClient`] trait. Tools only marshal typed requests into it and
//! format the typed outcomes it returns.
//!
//! - `types.rs` - request and outcome model
//! - `algod.rs` - algod REST implementation with an in-process signer map
//! - `kmd.rs` - KMD lookup of the localnet dispenser
//! - `account.rs` - addresses, mnemonics and signing keys
//! - `transaction.rs` - wire encoding and signing of transactions
//! - `abi.rs` - ARC-4 argument encoding and return decoding
//! - `error.rs` - ledger error type

mod abi;
mod account;
mod algod;
mod error;
mod kmd;
mod transaction;
mod types;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

use crate::domains::network::Network;

pub use account::SigningAccount;
pub use algod::{AlgodClient, Dispenser};
pub use kmd::KmdClient;
pub use error::LedgerError;
pub use types::*;

/// Capability set of one network's client handle.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// The network this client is bound to.
    fn network(&self) -> Network;

    /// Node version and sync status.
    async fn network_status(&self) -> Result<NetworkStatus, LedgerError>;

    /// Balance, status and holdings of an account.
    async fn account_information(&self, address: &str)
    -> Result<AccountInformation, LedgerError>;

    /// Create a fresh random account.
    async fn generate_account(&self) -> Result<GeneratedAccount, LedgerError>;

    /// Restore an account from its 25-word mnemonic, returning its address.
    async fn account_from_mnemonic(&self, mnemonic: &str) -> Result<String, LedgerError>;

    /// Top up `address` from the dispenser so it can spend at least
    /// `min_balance` above its minimum balance.
    ///
    /// Returns `None` when the account was already sufficiently funded.
    async fn ensure_funded(
        &self,
        address: &str,
        min_balance: MicroAlgos,
    ) -> Result<Option<FundingReceipt>, LedgerError>;

    /// Sign, send and await confirmation of a single transaction.
    ///
    /// The sender must be an account this client generated or restored.
    async fn submit(&self, request: TransactionRequest) -> Result<TransactionOutcome, LedgerError>;
}
