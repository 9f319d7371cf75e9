//! Per-network resources (`network://localnet`, `network://testnet`, `network://mainnet`).

use rmcp::model::{AnnotateAble, RawResource};
use serde_json::{Value, json};

use crate::domains::network::Network;
use crate::domains::resources::service::{ResourceContent, ResourceEntry};

pub fn uri(network: Network) -> String {
    format!("network://{}", network)
}

/// Registry entry for one network's resource.
pub fn network_info_entry(network: Network) -> ResourceEntry {
    let mut raw = RawResource::new(uri(network), format!("network-{}", network));
    raw.description = Some(format!("Whether {} is the active network", network));
    raw.mime_type = Some("application/json".to_string());

    ResourceEntry {
        resource: raw.no_annotation(),
        content: ResourceContent::Network(network),
    }
}

pub fn document(network: Network, current: Network, timestamp: &str) -> Value {
    json!({
        "network": network,
        "isActive": network == current,
        "timestamp": timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_metadata() {
        let entry = network_info_entry(Network::Testnet);
        assert_eq!(entry.resource.raw.uri, "network://testnet");
        assert_eq!(entry.resource.raw.name, "network-testnet");
    }

    #[test]
    fn test_is_active_flag() {
        assert_eq!(document(Network::Localnet, Network::Localnet, "t")["isActive"], true);
        assert_eq!(document(Network::Mainnet, Network::Localnet, "t")["isActive"], false);
    }
}
