//! Request and outcome types exchanged with a ledger client.

use std::fmt;

/// MicroAlgos per Algo.
pub const MICRO_ALGOS_PER_ALGO: u64 = 1_000_000;

/// An amount of Algo expressed in microAlgos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct MicroAlgos(pub u64);

impl MicroAlgos {
    /// Convert a decimal Algo amount, rounding to the nearest microAlgo.
    ///
    /// Returns `None` for negative, non-finite or out-of-range amounts.
    pub fn from_algos(algos: f64) -> Option<Self> {
        if !algos.is_finite() || algos < 0.0 {
            return None;
        }
        let micro = (algos * MICRO_ALGOS_PER_ALGO as f64).round();
        if micro > u64::MAX as f64 {
            return None;
        }
        Some(Self(micro as u64))
    }

    /// The amount in whole Algos.
    pub fn as_algos(&self) -> f64 {
        self.0 as f64 / MICRO_ALGOS_PER_ALGO as f64
    }
}

impl fmt::Display for MicroAlgos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} microAlgos ({} Algos)", self.0, self.as_algos())
    }
}

// ============================================================================
// Reads
// ============================================================================

/// Node identity and progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkStatus {
    pub genesis_id: String,
    pub genesis_hash: String,
    pub build_version: String,
    pub last_round: u64,
}

/// One asset held by an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetHolding {
    pub asset_id: u64,
    pub amount: u64,
    pub is_frozen: bool,
}

/// Account state as reported by the node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountInformation {
    pub address: String,
    pub amount_without_pending_rewards: MicroAlgos,
    pub min_balance: MicroAlgos,
    pub pending_rewards: MicroAlgos,
    pub status: Option<String>,
    pub apps_opted_in: usize,
    pub created_apps: usize,
    pub assets: Vec<AssetHolding>,
    pub created_assets: usize,
}

/// A newly generated account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAccount {
    pub address: String,
    pub mnemonic: String,
}

/// Dispenser funding result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingReceipt {
    pub sender: String,
    pub amount: MicroAlgos,
    pub tx_ids: Vec<String>,
    pub group_id: Option<String>,
    pub confirmed_round: Option<u64>,
}

// ============================================================================
// Writes
// ============================================================================

/// Application on-completion action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnComplete {
    #[default]
    NoOp,
    OptIn,
    CloseOut,
    UpdateApplication,
    DeleteApplication,
}

impl fmt::Display for OnComplete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OnComplete::NoOp => "NoOp",
            OnComplete::OptIn => "OptIn",
            OnComplete::CloseOut => "CloseOut",
            OnComplete::UpdateApplication => "UpdateApplication",
            OnComplete::DeleteApplication => "DeleteApplication",
        };
        f.write_str(name)
    }
}

/// A box reference. `app_id` 0 means the called application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxReference {
    pub app_id: u64,
    pub name: Vec<u8>,
}

/// Foreign references, note and lease of an application call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionReferences {
    pub accounts: Vec<String>,
    pub apps: Vec<u64>,
    pub assets: Vec<u64>,
    pub boxes: Vec<BoxReference>,
    pub note: Option<Vec<u8>>,
    pub lease: Option<[u8; 32]>,
}

/// Global and local state allocation of a new application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateSchema {
    pub global_ints: u64,
    pub global_byte_slices: u64,
    pub local_ints: u64,
    pub local_byte_slices: u64,
}

/// TEAL sources of an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPrograms {
    pub approval: String,
    pub clear_state: String,
}

/// Arguments of an application call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppArguments {
    /// Raw application arguments.
    Bare(Vec<Vec<u8>>),
    /// ARC-4 method call; the client encodes `args` against `method`.
    Abi { method: String, args: Vec<String> },
}

/// Any application transaction: create, update, delete or call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCallRequest {
    pub sender: String,
    /// `None` creates a new application.
    pub app_id: Option<u64>,
    pub on_complete: OnComplete,
    pub programs: Option<AppPrograms>,
    pub schema: Option<StateSchema>,
    pub extra_pages: Option<u32>,
    pub arguments: AppArguments,
    pub references: TransactionReferences,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub sender: String,
    pub receiver: String,
    pub amount: MicroAlgos,
    pub close_remainder_to: Option<String>,
    pub note: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetCreateRequest {
    pub sender: String,
    pub total: u64,
    pub decimals: Option<u32>,
    pub asset_name: Option<String>,
    pub unit_name: Option<String>,
    pub url: Option<String>,
    pub metadata_hash: Option<String>,
    pub default_frozen: Option<bool>,
    pub manager: Option<String>,
    pub reserve: Option<String>,
    pub freeze: Option<String>,
    pub clawback: Option<String>,
    pub note: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetConfigRequest {
    pub sender: String,
    pub asset_id: u64,
    pub manager: Option<String>,
    pub reserve: Option<String>,
    pub freeze: Option<String>,
    pub clawback: Option<String>,
    pub note: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetTransferRequest {
    pub sender: String,
    pub receiver: String,
    pub asset_id: u64,
    pub amount: u64,
    pub clawback_target: Option<String>,
    pub close_asset_to: Option<String>,
    pub note: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetOptOutRequest {
    pub sender: String,
    pub asset_id: u64,
    pub creator: Option<String>,
    pub ensure_zero_balance: bool,
    pub note: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetFreezeRequest {
    pub sender: String,
    pub asset_id: u64,
    pub account: String,
    pub frozen: bool,
    pub note: Option<Vec<u8>>,
}

/// Opt-in and destroy carry the same fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetRequest {
    pub sender: String,
    pub asset_id: u64,
    pub note: Option<Vec<u8>>,
}

/// Every transaction the tools can ask a client to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionRequest {
    Payment(PaymentRequest),
    AssetCreate(AssetCreateRequest),
    AssetConfig(AssetConfigRequest),
    AssetTransfer(AssetTransferRequest),
    AssetOptIn(AssetRequest),
    AssetOptOut(AssetOptOutRequest),
    AssetFreeze(AssetFreezeRequest),
    AssetDestroy(AssetRequest),
    AppCall(AppCallRequest),
}

impl TransactionRequest {
    /// Short human label for logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            TransactionRequest::Payment(_) => "Payment",
            TransactionRequest::AssetCreate(_) => "Asset creation",
            TransactionRequest::AssetConfig(_) => "Asset configuration",
            TransactionRequest::AssetTransfer(_) => "Asset transfer",
            TransactionRequest::AssetOptIn(_) => "Asset opt-in",
            TransactionRequest::AssetOptOut(_) => "Asset opt-out",
            TransactionRequest::AssetFreeze(_) => "Asset freeze",
            TransactionRequest::AssetDestroy(_) => "Asset destruction",
            TransactionRequest::AppCall(call) => match (call.app_id, call.on_complete) {
                (None, _) => "Application creation",
                (Some(_), OnComplete::UpdateApplication) => "Application update",
                (Some(_), OnComplete::DeleteApplication) => "Application deletion",
                (Some(_), _) => "Application call",
            },
        }
    }

    /// The sending address.
    pub fn sender(&self) -> &str {
        match self {
            TransactionRequest::Payment(r) => &r.sender,
            TransactionRequest::AssetCreate(r) => &r.sender,
            TransactionRequest::AssetConfig(r) => &r.sender,
            TransactionRequest::AssetTransfer(r) => &r.sender,
            TransactionRequest::AssetOptIn(r) | TransactionRequest::AssetDestroy(r) => &r.sender,
            TransactionRequest::AssetOptOut(r) => &r.sender,
            TransactionRequest::AssetFreeze(r) => &r.sender,
            TransactionRequest::AppCall(r) => &r.sender,
        }
    }
}

/// Decoded ARC-4 return value of a method call.
#[derive(Debug, Clone, PartialEq)]
pub enum AbiReturn {
    Value {
        value: serde_json::Value,
        return_type: String,
    },
    DecodeError(String),
}

/// Confirmation metadata of a sent transaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionOutcome {
    pub tx_id: String,
    pub confirmed_round: Option<u64>,
    /// Set when the transaction created an asset.
    pub asset_id: Option<u64>,
    /// Set when the transaction created an application.
    pub app_id: Option<u64>,
    pub logs: Vec<Vec<u8>>,
    pub abi_return: Option<AbiReturn>,
}

impl TransactionOutcome {
    /// Outcome with only a transaction id.
    pub fn new(tx_id: impl Into<String>) -> Self {
        Self {
            tx_id: tx_id.into(),
            ..Default::default()
        }
    }
}
