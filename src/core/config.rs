//! Configuration management for the MCP server.
//!
//! Configuration is assembled from defaults overridden by `MCP_`-prefixed
//! environment variables (a `.env` file is honoured).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::{Error, Result};
use super::transport::TransportConfig;
use crate::domains::network::Network;

/// AlgoKit localnet's well-known algod and KMD token.
const LOCALNET_TOKEN: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Algod endpoints and default network.
    pub networks: NetworksConfig,

    /// Block explorer links.
    pub explorer: ExplorerConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Connection details of one algod or KMD node.
#[derive(Clone, Serialize, Deserialize)]
pub struct NodeEndpoint {
    pub url: String,
    pub token: String,
}

/// Custom Debug implementation to redact the API token from logs.
impl std::fmt::Debug for NodeEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeEndpoint")
            .field("url", &self.url)
            .field(
                "token",
                &if self.token.is_empty() { "" } else { "[REDACTED]" },
            )
            .finish()
    }
}

impl NodeEndpoint {
    fn new(url: &str, token: &str) -> Self {
        Self {
            url: url.to_string(),
            token: token.to_string(),
        }
    }
}

/// A mnemonic that must never reach the logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretMnemonic(String);

impl SecretMnemonic {
    pub fn new(mnemonic: impl Into<String>) -> Self {
        Self(mnemonic.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretMnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretMnemonic([REDACTED])")
    }
}

/// Per-network node configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworksConfig {
    /// Network active at startup.
    pub default_network: Network,

    pub localnet: NodeEndpoint,
    pub testnet: NodeEndpoint,
    pub mainnet: NodeEndpoint,

    /// KMD holding the localnet dispenser wallet.
    pub localnet_kmd: NodeEndpoint,

    /// Localnet dispenser account; used instead of KMD when set.
    pub dispenser_mnemonic: Option<SecretMnemonic>,

    /// Timeout applied to every algod request.
    pub request_timeout: Duration,
}

impl NetworksConfig {
    /// The endpoint configured for `network`.
    pub fn endpoint(&self, network: Network) -> &NodeEndpoint {
        match network {
            Network::Localnet => &self.localnet,
            Network::Testnet => &self.testnet,
            Network::Mainnet => &self.mainnet,
        }
    }

    fn endpoint_mut(&mut self, network: Network) -> &mut NodeEndpoint {
        match network {
            Network::Localnet => &mut self.localnet,
            Network::Testnet => &mut self.testnet,
            Network::Mainnet => &mut self.mainnet,
        }
    }
}

impl Default for NetworksConfig {
    fn default() -> Self {
        Self {
            default_network: Network::Localnet,
            localnet: NodeEndpoint::new("http://localhost:4001", LOCALNET_TOKEN),
            testnet: NodeEndpoint::new("https://testnet-api.algonode.cloud", ""),
            mainnet: NodeEndpoint::new("https://mainnet-api.algonode.cloud", ""),
            localnet_kmd: NodeEndpoint::new("http://localhost:4002", LOCALNET_TOKEN),
            dispenser_mnemonic: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Block explorer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Base URL; links are `<base>/<network>/<type>/<id>`.
    pub base_url: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://lora.algokit.io".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "algorand-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            networks: NetworksConfig::default(),
            explorer: ExplorerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_DEFAULT_NETWORK`,
    /// `MCP_TESTNET_ALGOD_URL`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        if let Ok(network) = std::env::var("MCP_DEFAULT_NETWORK") {
            config.networks.default_network = network
                .parse()
                .map_err(|e| Error::config(format!("MCP_DEFAULT_NETWORK: {e}")))?;
        }

        for network in Network::ALL {
            let prefix = format!("MCP_{}_ALGOD", network.as_str().to_uppercase());
            let endpoint = config.networks.endpoint_mut(network);
            if let Ok(url) = std::env::var(format!("{prefix}_URL")) {
                info!("Using custom algod endpoint for {}: {}", network, url);
                endpoint.url = url;
            }
            if let Ok(token) = std::env::var(format!("{prefix}_TOKEN")) {
                endpoint.token = token;
            }
        }

        if let Ok(url) = std::env::var("MCP_LOCALNET_KMD_URL") {
            config.networks.localnet_kmd.url = url;
        }
        if let Ok(token) = std::env::var("MCP_LOCALNET_KMD_TOKEN") {
            config.networks.localnet_kmd.token = token;
        }

        if let Ok(mnemonic) = std::env::var("MCP_DISPENSER_MNEMONIC") {
            if !mnemonic.trim().is_empty() {
                info!("Localnet dispenser will use the configured mnemonic");
                config.networks.dispenser_mnemonic = Some(SecretMnemonic::new(mnemonic));
            }
        }

        if let Ok(timeout) = std::env::var("MCP_HTTP_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) if secs > 0 => {
                    config.networks.request_timeout = Duration::from_secs(secs)
                }
                _ => warn!(
                    "Ignoring invalid MCP_HTTP_TIMEOUT_SECS '{}', using {}s",
                    timeout,
                    config.networks.request_timeout.as_secs()
                ),
            }
        }

        if let Ok(base_url) = std::env::var("MCP_EXPLORER_BASE_URL") {
            config.explorer.base_url = base_url.trim_end_matches('/').to_string();
        }

        if config.networks.default_network == Network::Mainnet {
            warn!("Default network is mainnet: write operations will move real funds");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_network_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_DEFAULT_NETWORK", "Testnet");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.networks.default_network, Network::Testnet);
        unsafe {
            std::env::remove_var("MCP_DEFAULT_NETWORK");
        }
    }

    #[test]
    fn test_invalid_default_network_is_error() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_DEFAULT_NETWORK", "betanet");
        }
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("betanet"));
        unsafe {
            std::env::remove_var("MCP_DEFAULT_NETWORK");
        }
    }

    #[test]
    fn test_algod_endpoint_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_TESTNET_ALGOD_URL", "https://node.example");
            std::env::set_var("MCP_TESTNET_ALGOD_TOKEN", "secret");
            std::env::set_var("MCP_HTTP_TIMEOUT_SECS", "5");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.networks.testnet.url, "https://node.example");
        assert_eq!(config.networks.testnet.token, "secret");
        assert_eq!(config.networks.request_timeout, Duration::from_secs(5));
        assert_eq!(config.networks.mainnet.url, "https://mainnet-api.algonode.cloud");
        unsafe {
            std::env::remove_var("MCP_TESTNET_ALGOD_URL");
            std::env::remove_var("MCP_TESTNET_ALGOD_TOKEN");
            std::env::remove_var("MCP_HTTP_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_invalid_timeout_keeps_default() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_HTTP_TIMEOUT_SECS", "soon");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.networks.request_timeout, Duration::from_secs(30));
        unsafe {
            std::env::remove_var("MCP_HTTP_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_token_redacted_in_debug() {
        let endpoint = NodeEndpoint::new("http://localhost:4001", "super_secret_token");
        let debug_str = format!("{:?}", endpoint);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_token"));
        assert!(debug_str.contains("localhost:4001"));
    }

    #[test]
    fn test_dispenser_settings_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_DISPENSER_MNEMONIC", "abandon ability able");
            std::env::set_var("MCP_LOCALNET_KMD_URL", "http://kmd.local:7833");
        }
        let config = Config::from_env().unwrap();
        let mnemonic = config.networks.dispenser_mnemonic.clone().unwrap();
        assert_eq!(mnemonic.expose(), "abandon ability able");
        assert!(!format!("{:?}", config.networks).contains("abandon"));
        assert_eq!(config.networks.localnet_kmd.url, "http://kmd.local:7833");
        assert_eq!(config.networks.localnet_kmd.token, "a".repeat(64));
        unsafe {
            std::env::remove_var("MCP_DISPENSER_MNEMONIC");
            std::env::remove_var("MCP_LOCALNET_KMD_URL");
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.name, "algorand-mcp");
        assert_eq!(config.networks.default_network, Network::Localnet);
        assert_eq!(config.networks.localnet.token, "a".repeat(64));
        assert_eq!(config.explorer.base_url, "https://lora.algokit.io");
        assert_eq!(config.networks.localnet_kmd.url, "http://localhost:4002");
        assert!(config.networks.dispenser_mnemonic.is_none());
    }
}
