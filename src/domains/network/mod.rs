//! Network domain module.
//!
//! Holds the closed set of Algorand environments the server can talk to and
//! the registry that tracks which one is active.
//!
//! - `Network` - the network identifier (`localnet`, `testnet`, `mainnet`)
//! - `NetworkRegistry` - one pre-built client per network plus the active selector
//! - `NetworkError` - invalid selectors and network-scope violations

mod error;
mod registry;

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use error::NetworkError;
pub use registry::{NetworkClients, NetworkRegistry};

/// One of the three fixed deployment environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// AlgoKit LocalNet sandbox.
    Localnet,
    /// Public TestNet.
    Testnet,
    /// Public MainNet (real funds).
    Mainnet,
}

impl Network {
    /// Every supported network, in display order.
    pub const ALL: [Network; 3] = [Network::Localnet, Network::Testnet, Network::Mainnet];

    /// Lowercase identifier as used on the wire and in URIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Localnet => "localnet",
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
        }
    }

    pub(crate) fn index(self) -> u8 {
        match self {
            Network::Localnet => 0,
            Network::Testnet => 1,
            Network::Mainnet => 2,
        }
    }

    pub(crate) fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Network::Localnet),
            1 => Some(Network::Testnet),
            2 => Some(Network::Mainnet),
            _ => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "localnet" => Ok(Network::Localnet),
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            _ => Err(NetworkError::invalid(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("TestNet".parse::<Network>(), Ok(Network::Testnet));
        assert_eq!(" mainnet ".parse::<Network>(), Ok(Network::Mainnet));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "devnet".parse::<Network>().unwrap_err();
        assert_eq!(err, NetworkError::invalid("devnet"));
        assert!(err.to_string().contains("devnet"));
    }

    #[test]
    fn test_index_round_trip() {
        for network in Network::ALL {
            assert_eq!(Network::from_index(network.index()), Some(network));
        }
        assert_eq!(Network::from_index(3), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Network::Localnet).unwrap();
        assert_eq!(json, "\"localnet\"");
        assert!(serde_json::from_str::<Network>("\"betanet\"").is_err());
    }
}
