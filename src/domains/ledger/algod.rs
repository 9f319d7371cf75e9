//! Algod REST client.
//!
//! Implements [`LedgerClient`] against an algod node. Accounts generated or
//! restored through a client are remembered in its signer map; `submit`
//! signs with the key registered for the request's sender and waits for the
//! transaction to be confirmed. Funding pays from the configured dispenser.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use super::account::SigningAccount;
use super::kmd::KmdClient;
use super::transaction::{self, CompiledPrograms, SuggestedParams};
use super::{
    AccountInformation, AppPrograms, AssetHolding, AssetOptOutRequest, FundingReceipt,
    GeneratedAccount, LedgerClient, LedgerError, MicroAlgos, NetworkStatus, PaymentRequest,
    TransactionOutcome, TransactionRequest,
};
use crate::core::config::NodeEndpoint;
use crate::domains::network::Network;

/// Header carrying the algod API token.
const TOKEN_HEADER: &str = "X-Algo-API-Token";

/// Fee used when the node reports no minimum.
const MIN_FEE: u64 = 1000;

/// Rounds to wait for a transaction before giving up.
const CONFIRMATION_ROUNDS: u64 = 10;

/// Where the funding account for [`LedgerClient::ensure_funded`] comes from.
#[derive(Debug)]
pub enum Dispenser {
    /// A fixed account, e.g. restored from a configured mnemonic.
    Account(Arc<SigningAccount>),
    /// The richest account of KMD's default wallet.
    Kmd(KmdClient),
}

/// Ledger client backed by an algod node.
#[derive(Debug)]
pub struct AlgodClient {
    network: Network,
    base_url: Url,
    token: String,
    http: reqwest::Client,
    signers: RwLock<HashMap<String, Arc<SigningAccount>>>,
    dispenser: Option<Dispenser>,
    dispenser_account: OnceCell<Arc<SigningAccount>>,
}

impl AlgodClient {
    /// Create a client for `network` talking to `endpoint`.
    pub fn new(
        network: Network,
        endpoint: &NodeEndpoint,
        timeout: Duration,
    ) -> Result<Self, LedgerError> {
        let base_url = Url::parse(&endpoint.url)
            .map_err(|_| LedgerError::InvalidEndpoint(endpoint.url.clone()))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(LedgerError::InvalidEndpoint(endpoint.url.clone()));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            network,
            base_url,
            token: endpoint.token.clone(),
            http,
            signers: RwLock::new(HashMap::new()),
            dispenser: None,
            dispenser_account: OnceCell::new(),
        })
    }

    /// Fund accounts from `dispenser`.
    pub fn with_dispenser(mut self, dispenser: Dispenser) -> Self {
        self.dispenser = Some(dispenser);
        self
    }

    /// Keep `account`'s key for later submissions, returning its address.
    fn remember(&self, account: SigningAccount) -> String {
        let address = account.address().to_string();
        self.signers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address.clone(), Arc::new(account));
        address
    }

    fn signer(&self, address: &str) -> Result<Arc<SigningAccount>, LedgerError> {
        self.signers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(address)
            .cloned()
            .ok_or_else(|| LedgerError::UnknownSigner {
                address: address.to_string(),
                network: self.network,
            })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, LedgerError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| LedgerError::InvalidEndpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, LedgerError> {
        let url = self.url(segments)?;
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?;
        handle_response(response).await
    }

    async fn post_body<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<T, LedgerError> {
        let url = self.url(segments)?;
        debug!("POST {} ({} bytes)", url, body.len());
        let response = self
            .http
            .post(url)
            .header(TOKEN_HEADER, &self.token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;
        handle_response(response).await
    }

    async fn suggested_params(&self) -> Result<SuggestedParams, LedgerError> {
        let params: ParamsResponse = self.get_json(&["v2", "transactions", "params"]).await?;
        let genesis_hash = STANDARD
            .decode(&params.genesis_hash)
            .map_err(|e| LedgerError::encoding(format!("genesis hash: {}", e)))?;
        Ok(SuggestedParams {
            fee: params.min_fee.max(MIN_FEE),
            first_valid: params.last_round,
            genesis_id: params.genesis_id,
            genesis_hash,
        })
    }

    async fn compile(&self, source: &str) -> Result<Vec<u8>, LedgerError> {
        let compiled: CompileResponse = self
            .post_body(
                &["v2", "teal", "compile"],
                "text/plain",
                source.as_bytes().to_vec(),
            )
            .await?;
        STANDARD
            .decode(&compiled.result)
            .map_err(|e| LedgerError::encoding(format!("compiled program: {}", e)))
    }

    async fn compile_programs(
        &self,
        programs: &AppPrograms,
    ) -> Result<CompiledPrograms, LedgerError> {
        Ok(CompiledPrograms {
            approval: self.compile(&programs.approval).await?,
            clear_state: self.compile(&programs.clear_state).await?,
        })
    }

    async fn wait_for_confirmation(&self, tx_id: &str) -> Result<PendingResponse, LedgerError> {
        let status: StatusResponse = self.get_json(&["v2", "status"]).await?;
        let mut round = status.last_round;
        let deadline = round + CONFIRMATION_ROUNDS;
        loop {
            let pending: PendingResponse = self
                .get_json(&["v2", "transactions", "pending", tx_id])
                .await?;
            if pending.confirmed_round.is_some_and(|r| r > 0) {
                return Ok(pending);
            }
            if !pending.pool_error.is_empty() {
                return Err(LedgerError::rejected(format!(
                    "Transaction {} was rejected: {}",
                    tx_id, pending.pool_error
                )));
            }
            if round >= deadline {
                return Err(LedgerError::rejected(format!(
                    "Transaction {} not confirmed after {} rounds",
                    tx_id, CONFIRMATION_ROUNDS
                )));
            }
            let round_str = round.to_string();
            let _: StatusResponse = self
                .get_json(&["v2", "status", "wait-for-block-after", &round_str])
                .await?;
            round += 1;
        }
    }

    /// Fill in what an opt-out needs from the chain and enforce its balance guard.
    async fn resolve_opt_out(
        &self,
        mut request: AssetOptOutRequest,
    ) -> Result<AssetOptOutRequest, LedgerError> {
        let asset_id = request.asset_id.to_string();
        if request.ensure_zero_balance {
            let held: AccountAssetResponse = self
                .get_json(&["v2", "accounts", &request.sender, "assets", &asset_id])
                .await?;
            if held.asset_holding.amount > 0 {
                return Err(LedgerError::rejected(format!(
                    "Account {} still holds {} units of asset {}",
                    request.sender, held.asset_holding.amount, request.asset_id
                )));
            }
        }
        if request.creator.is_none() {
            let asset: AssetResponse = self.get_json(&["v2", "assets", &asset_id]).await?;
            request.creator = Some(asset.params.creator);
        }
        Ok(request)
    }

    /// Build, sign, broadcast and confirm `request` as `account`.
    async fn send(
        &self,
        account: &SigningAccount,
        request: TransactionRequest,
    ) -> Result<TransactionOutcome, LedgerError> {
        let programs = match &request {
            TransactionRequest::AppCall(call) => match &call.programs {
                Some(programs) => Some(self.compile_programs(programs).await?),
                None => None,
            },
            _ => None,
        };

        let params = self.suggested_params().await?;
        let prepared = transaction::build(&request, &params, programs.as_ref())?;
        let (tx_id, signed) = transaction::sign(prepared.transaction, account)?;

        let sent: BroadcastResponse = self
            .post_body(&["v2", "transactions"], "application/x-binary", signed)
            .await?;
        if sent.tx_id != tx_id {
            warn!("Node reported id {} for transaction {}", sent.tx_id, tx_id);
        }

        let pending = self.wait_for_confirmation(&tx_id).await?;
        let logs = pending
            .logs
            .iter()
            .map(|log| STANDARD.decode(log))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| LedgerError::encoding(format!("transaction log: {}", e)))?;
        info!(
            "{} {} confirmed in round {:?}",
            request.kind(),
            tx_id,
            pending.confirmed_round
        );

        Ok(TransactionOutcome {
            abi_return: prepared.method.and_then(|m| m.decode_return(&logs)),
            tx_id,
            confirmed_round: pending.confirmed_round,
            asset_id: pending.asset_index,
            app_id: pending.application_index,
            logs,
        })
    }

    async fn dispenser(&self) -> Result<Arc<SigningAccount>, LedgerError> {
        self.dispenser_account
            .get_or_try_init(|| async {
                match &self.dispenser {
                    None => Err(LedgerError::dispenser_unavailable(
                        self.network,
                        "no dispenser account is configured",
                    )),
                    Some(Dispenser::Account(account)) => Ok(account.clone()),
                    Some(Dispenser::Kmd(kmd)) => self
                        .richest(kmd)
                        .await
                        .map_err(|e| LedgerError::dispenser_unavailable(self.network, e.to_string())),
                }
            })
            .await
            .cloned()
    }

    async fn richest(&self, kmd: &KmdClient) -> Result<Arc<SigningAccount>, LedgerError> {
        let mut best: Option<(MicroAlgos, SigningAccount)> = None;
        for account in kmd.default_wallet_accounts().await? {
            let info = self.account_information(account.address()).await?;
            let balance = info.amount_without_pending_rewards;
            if best.as_ref().is_none_or(|(top, _)| balance > *top) {
                best = Some((balance, account));
            }
        }
        let (balance, account) =
            best.ok_or_else(|| LedgerError::rejected("the KMD default wallet has no accounts"))?;
        info!(
            "Using KMD account {} holding {} as dispenser",
            account.address(),
            balance
        );
        Ok(Arc::new(account))
    }
}

/// Read a JSON body, turning non-success statuses into [`LedgerError::Api`].
pub(super) async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, LedgerError> {
    let status = response.status();
    if status.is_success() {
        Ok(response.json().await?)
    } else {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".into());
        // algod and kmd wrap failures as {"message": "..."}
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        Err(LedgerError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl LedgerClient for AlgodClient {
    fn network(&self) -> Network {
        self.network
    }

    #[instrument(skip(self), fields(network = %self.network))]
    async fn network_status(&self) -> Result<NetworkStatus, LedgerError> {
        let versions: VersionsResponse = self.get_json(&["versions"]).await?;
        let status: StatusResponse = self.get_json(&["v2", "status"]).await?;
        Ok(NetworkStatus {
            genesis_id: versions.genesis_id,
            genesis_hash: versions.genesis_hash_b64,
            build_version: versions.build.to_string(),
            last_round: status.last_round,
        })
    }

    #[instrument(skip(self), fields(network = %self.network))]
    async fn account_information(
        &self,
        address: &str,
    ) -> Result<AccountInformation, LedgerError> {
        let account: AccountResponse = self.get_json(&["v2", "accounts", address]).await?;
        Ok(account.into())
    }

    async fn generate_account(&self) -> Result<GeneratedAccount, LedgerError> {
        let account = SigningAccount::generate();
        let mnemonic = account.mnemonic();
        let address = self.remember(account);
        info!("Generated account {} on {}", address, self.network);
        Ok(GeneratedAccount { address, mnemonic })
    }

    async fn account_from_mnemonic(&self, mnemonic: &str) -> Result<String, LedgerError> {
        let address = self.remember(SigningAccount::from_mnemonic(mnemonic)?);
        info!("Restored account {} on {}", address, self.network);
        Ok(address)
    }

    #[instrument(skip(self), fields(network = %self.network))]
    async fn ensure_funded(
        &self,
        address: &str,
        min_balance: MicroAlgos,
    ) -> Result<Option<FundingReceipt>, LedgerError> {
        let account = self.account_information(address).await?;
        let spendable = account
            .amount_without_pending_rewards
            .0
            .saturating_sub(account.min_balance.0);
        if spendable >= min_balance.0 {
            return Ok(None);
        }

        let amount = MicroAlgos(min_balance.0 - spendable);
        let dispenser = self.dispenser().await?;
        let request = TransactionRequest::Payment(PaymentRequest {
            sender: dispenser.address().to_string(),
            receiver: address.to_string(),
            amount,
            close_remainder_to: None,
            note: None,
        });
        let outcome = self.send(&dispenser, request).await?;

        Ok(Some(FundingReceipt {
            sender: dispenser.address().to_string(),
            amount,
            tx_ids: vec![outcome.tx_id],
            group_id: None,
            confirmed_round: outcome.confirmed_round,
        }))
    }

    #[instrument(skip_all, fields(network = %self.network, kind = request.kind()))]
    async fn submit(&self, request: TransactionRequest) -> Result<TransactionOutcome, LedgerError> {
        let signer = self.signer(request.sender())?;
        let request = match request {
            TransactionRequest::AssetOptOut(opt_out) => {
                TransactionRequest::AssetOptOut(self.resolve_opt_out(opt_out).await?)
            }
            other => other,
        };
        self.send(&signer, request).await
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
struct VersionsResponse {
    genesis_id: String,
    genesis_hash_b64: String,
    build: BuildVersion,
}

#[derive(Debug, Deserialize)]
struct BuildVersion {
    major: u64,
    minor: u64,
    build_number: u64,
    #[serde(default)]
    channel: String,
}

impl std::fmt::Display for BuildVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build_number)?;
        if !self.channel.is_empty() {
            write!(f, "-{}", self.channel)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct StatusResponse {
    last_round: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ParamsResponse {
    #[serde(default)]
    min_fee: u64,
    last_round: u64,
    genesis_id: String,
    genesis_hash: String,
}

#[derive(Debug, Deserialize)]
struct CompileResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct BroadcastResponse {
    #[serde(rename = "txId")]
    tx_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct PendingResponse {
    #[serde(default)]
    confirmed_round: Option<u64>,
    #[serde(default)]
    pool_error: String,
    #[serde(default)]
    asset_index: Option<u64>,
    #[serde(default)]
    application_index: Option<u64>,
    #[serde(default)]
    logs: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AssetResponse {
    params: AssetParamsResponse,
}

#[derive(Debug, Deserialize)]
struct AssetParamsResponse {
    creator: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct AccountAssetResponse {
    asset_holding: HoldingResponse,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct AccountResponse {
    address: String,
    #[serde(default)]
    amount_without_pending_rewards: u64,
    #[serde(default)]
    min_balance: u64,
    #[serde(default)]
    pending_rewards: u64,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    apps_local_state: Vec<serde_json::Value>,
    #[serde(default)]
    created_apps: Vec<serde_json::Value>,
    #[serde(default)]
    assets: Vec<HoldingResponse>,
    #[serde(default)]
    created_assets: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct HoldingResponse {
    asset_id: u64,
    #[serde(default)]
    amount: u64,
    #[serde(default)]
    is_frozen: bool,
}

impl From<AccountResponse> for AccountInformation {
    fn from(account: AccountResponse) -> Self {
        Self {
            address: account.address,
            amount_without_pending_rewards: MicroAlgos(account.amount_without_pending_rewards),
            min_balance: MicroAlgos(account.min_balance),
            pending_rewards: MicroAlgos(account.pending_rewards),
            status: account.status,
            apps_opted_in: account.apps_local_state.len(),
            created_apps: account.created_apps.len(),
            assets: account
                .assets
                .into_iter()
                .map(|h| AssetHolding {
                    asset_id: h.asset_id,
                    amount: h.amount,
                    is_frozen: h.is_frozen,
                })
                .collect(),
            created_assets: account.created_assets.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use axum::body::Bytes;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use data_encoding::BASE32_NOPAD;
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};
    use serde_json::json;

    use super::*;
    use crate::domains::ledger::account::sha512_256;
    use crate::domains::ledger::transaction::{SignedTransaction, signing_bytes};
    use crate::domains::ledger::{AssetRequest, LedgerClient};

    const CREATOR_SEED: [u8; 32] = [3u8; 32];

    fn endpoint(url: &str) -> NodeEndpoint {
        NodeEndpoint {
            url: url.to_string(),
            token: "a".repeat(64),
        }
    }

    fn client(url: &str) -> AlgodClient {
        AlgodClient::new(Network::Localnet, &endpoint(url), Duration::from_secs(5)).unwrap()
    }

    /// Transactions the fake node accepted.
    type Received = Arc<Mutex<Vec<SignedTransaction>>>;

    /// Accept a signed transaction only if its signature matches the sender.
    fn verify(body: &[u8]) -> Result<(SignedTransaction, String), String> {
        let signed: SignedTransaction = rmp_serde::from_slice(body).map_err(|e| e.to_string())?;
        let key: [u8; 32] = signed
            .txn
            .snd
            .as_slice()
            .try_into()
            .map_err(|_| "bad sender".to_string())?;
        let key = VerifyingKey::from_bytes(&key).map_err(|e| e.to_string())?;
        let signature = Signature::from_slice(&signed.sig).map_err(|e| e.to_string())?;
        let message = signing_bytes(&signed.txn).map_err(|e| e.to_string())?;
        key.verify(&message, &signature)
            .map_err(|_| "invalid signature".to_string())?;
        Ok((signed, BASE32_NOPAD.encode(&sha512_256(&message))))
    }

    /// An in-process algod that verifies signatures and confirms everything
    /// in round 7. Every account holds `balance` microAlgos and 5 units of
    /// any asset.
    async fn spawn_algod(balance: u64) -> (String, Received) {
        let received = Received::default();
        let accepted = received.clone();
        let creator = SigningAccount::from_seed(&CREATOR_SEED).address().to_string();

        let app = Router::new()
            .route(
                "/v2/transactions/params",
                get(|| async {
                    Json(json!({
                        "fee": 0,
                        "min-fee": 1000,
                        "last-round": 6,
                        "genesis-id": "dockernet-v1",
                        "genesis-hash": STANDARD.encode([1u8; 32]),
                    }))
                }),
            )
            .route(
                "/v2/transactions",
                post(move |body: Bytes| {
                    let accepted = accepted.clone();
                    async move {
                        match verify(&body) {
                            Ok((signed, tx_id)) => {
                                accepted.lock().unwrap().push(signed);
                                (StatusCode::OK, Json(json!({ "txId": tx_id })))
                            }
                            Err(message) => {
                                (StatusCode::BAD_REQUEST, Json(json!({ "message": message })))
                            }
                        }
                    }
                }),
            )
            .route(
                "/v2/transactions/pending/{tx_id}",
                get(|Path(_tx_id): Path<String>| async {
                    Json(json!({ "confirmed-round": 7, "pool-error": "" }))
                }),
            )
            .route(
                "/v2/status",
                get(|| async { Json(json!({ "last-round": 6 })) }),
            )
            .route(
                "/v2/accounts/{address}",
                get(move |Path(address): Path<String>| async move {
                    Json(json!({
                        "address": address,
                        "amount-without-pending-rewards": balance,
                        "min-balance": 100_000,
                    }))
                }),
            )
            .route(
                "/v2/accounts/{address}/assets/{asset_id}",
                get(|Path((_, asset_id)): Path<(String, u64)>| async move {
                    Json(json!({ "asset-holding": { "asset-id": asset_id, "amount": 5 } }))
                }),
            )
            .route(
                "/v2/assets/{asset_id}",
                get(move |Path(asset_id): Path<u64>| async move {
                    Json(json!({ "index": asset_id, "params": { "creator": creator } }))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), received)
    }

    fn payment(sender: &str, receiver: &str, amount: u64) -> TransactionRequest {
        TransactionRequest::Payment(PaymentRequest {
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            amount: MicroAlgos(amount),
            close_remainder_to: None,
            note: None,
        })
    }

    #[test]
    fn test_rejects_invalid_endpoint() {
        let timeout = Duration::from_secs(5);
        let err = AlgodClient::new(Network::Testnet, &endpoint("not a url"), timeout).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidEndpoint(_)));

        let err = AlgodClient::new(Network::Testnet, &endpoint("ftp://node"), timeout).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_url_building() {
        let local = client("http://localhost:4001");
        let url = local.url(&["v2", "accounts", "ADDR"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:4001/v2/accounts/ADDR");

        let proxied = client("https://node.example/algod/");
        let url = proxied.url(&["v2", "status"]).unwrap();
        assert_eq!(url.as_str(), "https://node.example/algod/v2/status");
    }

    #[test]
    fn test_url_escapes_segments() {
        let local = client("http://localhost:4001");
        let url = local.url(&["v2", "accounts", "../status"]).unwrap();
        assert!(url.path().ends_with("/v2/accounts/..%2Fstatus"));
    }

    #[test]
    fn test_account_response_conversion() {
        let json = serde_json::json!({
            "address": "ADDR",
            "amount": 5_100_000u64,
            "amount-without-pending-rewards": 5_000_000u64,
            "min-balance": 200_000u64,
            "pending-rewards": 100_000u64,
            "status": "Offline",
            "apps-local-state": [{"id": 1}],
            "assets": [
                {"asset-id": 10, "amount": 3, "is-frozen": false},
                {"asset-id": 11, "amount": 0, "is-frozen": true}
            ],
            "created-assets": [{"index": 10}]
        });
        let account: AccountResponse = serde_json::from_value(json).unwrap();
        let info = AccountInformation::from(account);

        assert_eq!(info.amount_without_pending_rewards, MicroAlgos(5_000_000));
        assert_eq!(info.min_balance, MicroAlgos(200_000));
        assert_eq!(info.status.as_deref(), Some("Offline"));
        assert_eq!(info.apps_opted_in, 1);
        assert_eq!(info.created_apps, 0);
        assert_eq!(info.created_assets, 1);
        assert_eq!(info.assets.len(), 2);
        assert!(info.assets[1].is_frozen);
    }

    #[test]
    fn test_build_version_display() {
        let build: BuildVersion = serde_json::from_value(serde_json::json!({
            "major": 3, "minor": 24, "build_number": 1, "channel": "stable"
        }))
        .unwrap();
        assert_eq!(build.to_string(), "3.24.1-stable");
    }

    #[tokio::test]
    async fn test_generated_account_is_registered_as_signer() {
        let local = client("http://localhost:4001");
        let generated = local.generate_account().await.unwrap();
        assert_eq!(local.signer(&generated.address).unwrap().address(), generated.address);

        // The mnemonic handed back restores the same account elsewhere.
        let other = client("http://localhost:4001");
        let restored = other.account_from_mnemonic(&generated.mnemonic).await.unwrap();
        assert_eq!(restored, generated.address);
    }

    #[tokio::test]
    async fn test_submit_rejects_unknown_sender_before_contacting_node() {
        // Nothing listens on the discard port; reaching the node would fail differently.
        let local = client("http://127.0.0.1:9");
        let stranger = SigningAccount::from_seed(&[8u8; 32]);
        let request = TransactionRequest::AssetOptIn(AssetRequest {
            sender: stranger.address().to_string(),
            asset_id: 1,
            note: None,
        });
        let err = local.submit(request).await.unwrap_err();
        assert!(matches!(err, LedgerError::UnknownSigner { .. }));
        assert!(err.to_string().starts_with(&format!(
            "No signing key for {} on localnet",
            stranger.address()
        )));
    }

    #[tokio::test]
    async fn test_restored_account_can_submit() {
        let (url, received) = spawn_algod(5_000_000).await;
        let local = client(&url);
        let owner = SigningAccount::from_seed(&[4u8; 32]);
        let receiver = SigningAccount::from_seed(&[5u8; 32]);

        let address = local.account_from_mnemonic(&owner.mnemonic()).await.unwrap();
        assert_eq!(address, owner.address());

        let outcome = local
            .submit(payment(&address, receiver.address(), 250_000))
            .await
            .unwrap();
        assert_eq!(outcome.tx_id.len(), 52);
        assert_eq!(outcome.confirmed_round, Some(7));
        assert!(outcome.abi_return.is_none());

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        let txn = &received[0].txn;
        assert_eq!(txn.kind, "pay");
        assert_eq!(txn.amt, 250_000);
        assert_eq!(txn.fee, 1000);
        assert_eq!((txn.fv, txn.lv), (6, 1006));
        assert_eq!(txn.genesis_id, "dockernet-v1");
    }

    #[tokio::test]
    async fn test_opt_out_resolves_creator_and_checks_balance() {
        let (url, received) = spawn_algod(5_000_000).await;
        let local = client(&url);
        let holder = SigningAccount::from_seed(&[6u8; 32]);
        let address = local.account_from_mnemonic(&holder.mnemonic()).await.unwrap();

        let opt_out = |ensure_zero_balance| {
            TransactionRequest::AssetOptOut(AssetOptOutRequest {
                sender: address.clone(),
                asset_id: 77,
                creator: None,
                ensure_zero_balance,
                note: None,
            })
        };

        // The fake node reports 5 units held.
        let err = local.submit(opt_out(true)).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Account {} still holds 5 units of asset 77", address)
        );
        assert!(received.lock().unwrap().is_empty());

        local.submit(opt_out(false)).await.unwrap();
        let creator = SigningAccount::from_seed(&CREATOR_SEED).public_key().to_vec();
        let received = received.lock().unwrap();
        let txn = &received[0].txn;
        assert_eq!(txn.xaid, 77);
        assert_eq!(txn.arcv.clone().map(|b| b.into_vec()), Some(creator.clone()));
        assert_eq!(txn.aclose.clone().map(|b| b.into_vec()), Some(creator));
    }

    #[tokio::test]
    async fn test_ensure_funded_pays_shortfall_from_dispenser() {
        // 150_000 held against a 100_000 minimum leaves 50_000 spendable.
        let (url, received) = spawn_algod(150_000).await;
        let dispenser = Arc::new(SigningAccount::from_seed(&[9u8; 32]));
        let local = client(&url).with_dispenser(Dispenser::Account(dispenser.clone()));
        let target = SigningAccount::from_seed(&[10u8; 32]);

        let receipt = local
            .ensure_funded(target.address(), MicroAlgos(1_000_000))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(receipt.sender, dispenser.address());
        assert_eq!(receipt.amount, MicroAlgos(950_000));
        assert_eq!(receipt.confirmed_round, Some(7));
        assert_eq!(received.lock().unwrap()[0].txn.amt, 950_000);

        let none = local
            .ensure_funded(target.address(), MicroAlgos(50_000))
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_ensure_funded_without_dispenser() {
        let (url, _) = spawn_algod(0).await;
        let local = client(&url);
        let target = SigningAccount::from_seed(&[11u8; 32]);

        let err = local
            .ensure_funded(target.address(), MicroAlgos(1))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::DispenserUnavailable { .. }));
    }
}
