//! Network registry.
//!
//! The registry is built once at startup and shared by reference with every
//! tool and resource. It owns one ledger client per network, all constructed
//! eagerly, and a single active-network selector.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tracing::{debug, info};

use super::{Network, NetworkError};
use crate::core::config::NetworksConfig;
use crate::domains::ledger::{
    AlgodClient, Dispenser, KmdClient, LedgerClient, LedgerError, SigningAccount,
};

/// Phrases recognised by [`NetworkRegistry::infer_from_text`], in match order.
const NETWORK_PHRASES: [(&str, Network); 3] = [
    ("on testnet", Network::Testnet),
    ("on mainnet", Network::Mainnet),
    ("on localnet", Network::Localnet),
];

/// One client handle per network.
#[derive(Clone)]
pub struct NetworkClients {
    pub localnet: Arc<dyn LedgerClient>,
    pub testnet: Arc<dyn LedgerClient>,
    pub mainnet: Arc<dyn LedgerClient>,
}

impl NetworkClients {
    /// Build algod-backed clients for every network from configuration.
    ///
    /// Only localnet gets a dispenser: the configured mnemonic when set,
    /// KMD's default wallet otherwise.
    pub fn from_config(config: &NetworksConfig) -> Result<Self, LedgerError> {
        let build = |network: Network| {
            AlgodClient::new(network, config.endpoint(network), config.request_timeout)
        };

        let dispenser = match &config.dispenser_mnemonic {
            Some(mnemonic) => {
                Dispenser::Account(Arc::new(SigningAccount::from_mnemonic(mnemonic.expose())?))
            }
            None => Dispenser::Kmd(KmdClient::new(
                &config.localnet_kmd,
                config.request_timeout,
            )?),
        };
        debug!("Localnet dispenser: {:?}", dispenser);

        Ok(Self {
            localnet: Arc::new(build(Network::Localnet)?.with_dispenser(dispenser)),
            testnet: Arc::new(build(Network::Testnet)?),
            mainnet: Arc::new(build(Network::Mainnet)?),
        })
    }

    fn get(&self, network: Network) -> &Arc<dyn LedgerClient> {
        match network {
            Network::Localnet => &self.localnet,
            Network::Testnet => &self.testnet,
            Network::Mainnet => &self.mainnet,
        }
    }
}

/// Single source of truth for the active network.
///
/// The selector is an atomic, so reads and switches are never torn. There is
/// no scoping of a network to a call: a switch made by one call is observed by
/// every later read, including reads from calls already in flight.
pub struct NetworkRegistry {
    clients: NetworkClients,
    active: AtomicU8,
}

impl NetworkRegistry {
    /// Create a registry with the given clients and default network.
    pub fn new(default_network: Network, clients: NetworkClients) -> Self {
        info!("Network registry initialized (default: {})", default_network);
        Self {
            clients,
            active: AtomicU8::new(default_network.index()),
        }
    }

    /// Create a registry with algod clients built from configuration.
    pub fn from_config(config: &NetworksConfig) -> Result<Self, LedgerError> {
        Ok(Self::new(
            config.default_network,
            NetworkClients::from_config(config)?,
        ))
    }

    /// The active network.
    pub fn current_network(&self) -> Network {
        // Only `Network::index` values are ever stored.
        Network::from_index(self.active.load(Ordering::SeqCst)).unwrap_or(Network::Localnet)
    }

    /// Make `network` the active network, returning the previous one.
    pub fn set_network(&self, network: Network) -> Network {
        let previous = self.active.swap(network.index(), Ordering::SeqCst);
        let previous = Network::from_index(previous).unwrap_or(Network::Localnet);
        if previous != network {
            info!("Active network switched from {} to {}", previous, network);
        }
        previous
    }

    /// Parse `name` and make it the active network.
    ///
    /// Unknown names fail with [`NetworkError::InvalidNetwork`] and leave the
    /// active network unchanged.
    pub fn select(&self, name: &str) -> Result<Network, NetworkError> {
        let network: Network = name.parse()?;
        self.set_network(network);
        Ok(network)
    }

    /// The client bound to the active network.
    pub fn active_client(&self) -> Arc<dyn LedgerClient> {
        self.client_for(self.current_network())
    }

    /// The client bound to `network`, regardless of which one is active.
    pub fn client_for(&self, network: Network) -> Arc<dyn LedgerClient> {
        Arc::clone(self.clients.get(network))
    }

    /// Scan free-form text for "on testnet" / "on mainnet" / "on localnet".
    ///
    /// A match switches the active network. Returns the active network after
    /// the scan.
    pub fn infer_from_text(&self, text: &str) -> Network {
        let lowered = text.to_lowercase();
        if let Some((_, network)) = NETWORK_PHRASES
            .iter()
            .find(|(phrase, _)| lowered.contains(phrase))
        {
            debug!("Network '{}' inferred from text", network);
            self.set_network(*network);
        }
        self.current_network()
    }

    /// Fail unless `required` is the active network.
    pub fn require(&self, operation: &str, required: Network) -> Result<(), NetworkError> {
        let active = self.current_network();
        if active == required {
            Ok(())
        } else {
            Err(NetworkError::out_of_scope(operation, required, active))
        }
    }
}
