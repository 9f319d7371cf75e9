//! Recording ledger client for tests.
//!
//! Counts every delegated call, records submitted requests and can be primed
//! with an outcome or a failure.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{
    AccountInformation, FundingReceipt, GeneratedAccount, LedgerClient, LedgerError, MicroAlgos,
    NetworkStatus, TransactionOutcome, TransactionRequest,
};
use crate::domains::network::{Network, NetworkClients, NetworkRegistry};

pub(crate) const TEST_TX_ID: &str = "TESTTXID";
pub(crate) const TEST_ROUND: u64 = 42;
pub(crate) const GENERATED_ADDRESS: &str = "GENERATEDADDRESS";
pub(crate) const RECOVERED_ADDRESS: &str = "RECOVEREDADDRESS";
pub(crate) const DISPENSER_ADDRESS: &str = "DISPENSERADDRESS";

pub(crate) struct RecordingLedger {
    network: Network,
    calls: AtomicUsize,
    requests: Mutex<Vec<TransactionRequest>>,
    failure: Mutex<Option<String>>,
    outcome: Mutex<TransactionOutcome>,
    account: Mutex<AccountInformation>,
    already_funded: AtomicBool,
    account_missing: AtomicBool,
}

impl RecordingLedger {
    pub(crate) fn new(network: Network) -> Self {
        let mut outcome = TransactionOutcome::new(TEST_TX_ID);
        outcome.confirmed_round = Some(TEST_ROUND);
        Self {
            network,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            outcome: Mutex::new(outcome),
            account: Mutex::new(AccountInformation::default()),
            already_funded: AtomicBool::new(false),
            account_missing: AtomicBool::new(false),
        }
    }

    /// Fresh recording clients for every network.
    pub(crate) fn clients() -> NetworkClients {
        MockNetworks::new().clients()
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<TransactionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> Option<TransactionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub(crate) fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub(crate) fn clear_failure(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub(crate) fn set_outcome(&self, outcome: TransactionOutcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub(crate) fn set_account(&self, account: AccountInformation) {
        *self.account.lock().unwrap() = account;
    }

    pub(crate) fn set_already_funded(&self, funded: bool) {
        self.already_funded.store(funded, Ordering::SeqCst);
    }

    /// Make account lookups answer 404.
    pub(crate) fn set_account_missing(&self, missing: bool) {
        self.account_missing.store(missing, Ordering::SeqCst);
    }

    fn record(&self) -> Result<(), LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(LedgerError::rejected(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LedgerClient for RecordingLedger {
    fn network(&self) -> Network {
        self.network
    }

    async fn network_status(&self) -> Result<NetworkStatus, LedgerError> {
        self.record()?;
        Ok(NetworkStatus {
            genesis_id: format!("{}-v1", self.network),
            genesis_hash: "R2VuZXNpc0hhc2g=".to_string(),
            build_version: "3.24.1-stable".to_string(),
            last_round: TEST_ROUND,
        })
    }

    async fn account_information(
        &self,
        address: &str,
    ) -> Result<AccountInformation, LedgerError> {
        self.record()?;
        if self.account_missing.load(Ordering::SeqCst) {
            return Err(LedgerError::Api {
                status: 404,
                message: "account not found".to_string(),
            });
        }
        let mut account = self.account.lock().unwrap().clone();
        account.address = address.to_string();
        Ok(account)
    }

    async fn generate_account(&self) -> Result<GeneratedAccount, LedgerError> {
        self.record()?;
        Ok(GeneratedAccount {
            address: GENERATED_ADDRESS.to_string(),
            mnemonic: "abandon ".repeat(24) + "art",
        })
    }

    async fn account_from_mnemonic(&self, _mnemonic: &str) -> Result<String, LedgerError> {
        self.record()?;
        Ok(RECOVERED_ADDRESS.to_string())
    }

    async fn ensure_funded(
        &self,
        _address: &str,
        min_balance: MicroAlgos,
    ) -> Result<Option<FundingReceipt>, LedgerError> {
        self.record()?;
        if self.already_funded.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(Some(FundingReceipt {
            sender: DISPENSER_ADDRESS.to_string(),
            amount: min_balance,
            tx_ids: vec![TEST_TX_ID.to_string()],
            group_id: None,
            confirmed_round: Some(TEST_ROUND),
        }))
    }

    async fn submit(&self, request: TransactionRequest) -> Result<TransactionOutcome, LedgerError> {
        self.requests.lock().unwrap().push(request);
        self.record()?;
        Ok(self.outcome.lock().unwrap().clone())
    }
}

/// Recording clients for all three networks, with handles kept for assertions.
pub(crate) struct MockNetworks {
    pub localnet: Arc<RecordingLedger>,
    pub testnet: Arc<RecordingLedger>,
    pub mainnet: Arc<RecordingLedger>,
}

impl MockNetworks {
    pub(crate) fn new() -> Self {
        Self {
            localnet: Arc::new(RecordingLedger::new(Network::Localnet)),
            testnet: Arc::new(RecordingLedger::new(Network::Testnet)),
            mainnet: Arc::new(RecordingLedger::new(Network::Mainnet)),
        }
    }

    pub(crate) fn clients(&self) -> NetworkClients {
        NetworkClients {
            localnet: self.localnet.clone(),
            testnet: self.testnet.clone(),
            mainnet: self.mainnet.clone(),
        }
    }

    pub(crate) fn registry(&self, default_network: Network) -> Arc<NetworkRegistry> {
        Arc::new(NetworkRegistry::new(default_network, self.clients()))
    }

    pub(crate) fn get(&self, network: Network) -> &Arc<RecordingLedger> {
        match network {
            Network::Localnet => &self.localnet,
            Network::Testnet => &self.testnet,
            Network::Mainnet => &self.mainnet,
        }
    }

    pub(crate) fn total_calls(&self) -> usize {
        Network::ALL.iter().map(|n| self.get(*n).calls()).sum()
    }
}
