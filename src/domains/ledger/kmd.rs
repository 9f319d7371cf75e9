//! KMD client used to find the localnet dispenser.
//!
//! AlgoKit's localnet pre-funds the accounts of its unencrypted default
//! wallet. Their keys are exported here so the richest one can pay for
//! `ensure_funded`.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::LedgerError;
use super::account::SigningAccount;
use super::algod::handle_response;
use crate::core::config::NodeEndpoint;

const TOKEN_HEADER: &str = "X-KMD-API-Token";

/// Wallet whose accounts localnet funds at genesis.
pub const DEFAULT_WALLET: &str = "unencrypted-default-wallet";

#[derive(Debug)]
pub struct KmdClient {
    base_url: Url,
    token: String,
    http: reqwest::Client,
}

impl KmdClient {
    pub fn new(endpoint: &NodeEndpoint, timeout: Duration) -> Result<Self, LedgerError> {
        let base_url = Url::parse(&endpoint.url)
            .map_err(|_| LedgerError::InvalidEndpoint(endpoint.url.clone()))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(LedgerError::InvalidEndpoint(endpoint.url.clone()));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            token: endpoint.token.clone(),
            http,
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

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, LedgerError> {
        let url = self.url(segments)?;
        debug!("POST {}", url);
        let response = self
            .http
            .post(url)
            .header(TOKEN_HEADER, &self.token)
            .json(body)
            .send()
            .await?;
        handle_response(response).await
    }

    /// Every account of the default wallet, with its signing key.
    #[instrument(skip(self))]
    pub async fn default_wallet_accounts(&self) -> Result<Vec<SigningAccount>, LedgerError> {
        let url = self.url(&["v1", "wallets"])?;
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?;
        let wallets: WalletsResponse = handle_response(response).await?;
        let wallet = wallets
            .wallets
            .into_iter()
            .find(|w| w.name == DEFAULT_WALLET)
            .ok_or_else(|| LedgerError::rejected(format!("KMD has no '{}'", DEFAULT_WALLET)))?;

        let handle: InitResponse = self
            .post(
                &["v1", "wallet", "init"],
                &InitRequest {
                    wallet_id: &wallet.id,
                    wallet_password: "",
                },
            )
            .await?;
        let token = handle.wallet_handle_token;

        let exported = self.export_all(&token).await;

        // Handles expire on their own; a failed release is not fatal.
        let released: Result<serde_json::Value, _> = self
            .post(
                &["v1", "wallet", "release"],
                &HandleRequest {
                    wallet_handle_token: &token,
                },
            )
            .await;
        if let Err(e) = released {
            debug!("Releasing KMD wallet handle failed: {}", e);
        }

        exported
    }

    async fn export_all(&self, token: &str) -> Result<Vec<SigningAccount>, LedgerError> {
        let keys: KeyListResponse = self
            .post(
                &["v1", "key", "list"],
                &HandleRequest {
                    wallet_handle_token: token,
                },
            )
            .await?;

        let mut accounts = Vec::with_capacity(keys.addresses.len());
        for address in &keys.addresses {
            let exported: ExportResponse = self
                .post(
                    &["v1", "key", "export"],
                    &ExportRequest {
                        wallet_handle_token: token,
                        address,
                        wallet_password: "",
                    },
                )
                .await?;
            accounts.push(account_from_export(&exported.private_key)?);
        }
        Ok(accounts)
    }
}

/// KMD exports the 64-byte ed25519 keypair; the seed is its first half.
fn account_from_export(private_key: &str) -> Result<SigningAccount, LedgerError> {
    let bytes = STANDARD
        .decode(private_key)
        .map_err(|e| LedgerError::encoding(format!("KMD private key: {}", e)))?;
    let seed: [u8; 32] = bytes
        .get(..32)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| LedgerError::encoding("KMD private key is too short"))?;
    Ok(SigningAccount::from_seed(&seed))
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct WalletsResponse {
    #[serde(default)]
    wallets: Vec<Wallet>,
}

#[derive(Debug, Deserialize)]
struct Wallet {
    id: String,
    name: String,
}

#[derive(Serialize)]
struct InitRequest<'a> {
    wallet_id: &'a str,
    wallet_password: &'a str,
}

#[derive(Debug, Deserialize)]
struct InitResponse {
    wallet_handle_token: String,
}

#[derive(Serialize)]
struct HandleRequest<'a> {
    wallet_handle_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct KeyListResponse {
    #[serde(default)]
    addresses: Vec<String>,
}

#[derive(Serialize)]
struct ExportRequest<'a> {
    wallet_handle_token: &'a str,
    address: &'a str,
    wallet_password: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExportResponse {
    private_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_from_export_uses_seed_half() {
        let account = SigningAccount::from_seed(&[5u8; 32]);
        let mut keypair = [5u8; 32].to_vec();
        keypair.extend_from_slice(&account.public_key());

        let restored = account_from_export(&STANDARD.encode(&keypair)).unwrap();
        assert_eq!(restored.address(), account.address());

        assert!(account_from_export(&STANDARD.encode([1u8; 16])).is_err());
        assert!(account_from_export("not base64!").is_err());
    }

    #[test]
    fn test_rejects_invalid_endpoint() {
        let endpoint = NodeEndpoint {
            url: "ftp://kmd".into(),
            token: String::new(),
        };
        let err = KmdClient::new(&endpoint, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidEndpoint(_)));
    }
}
