//! Active network resource.

use serde_json::{Value, json};

use super::ResourceDefinition;
use crate::domains::network::Network;
use crate::domains::resources::service::ResourceContent;

pub struct NetworkCurrentResource;

impl ResourceDefinition for NetworkCurrentResource {
    const URI: &'static str = "network://current";
    const NAME: &'static str = "network-current";
    const DESCRIPTION: &'static str = "The Algorand network currently targeted by every tool";

    fn content() -> ResourceContent {
        ResourceContent::Current
    }
}

pub fn document(current: Network, timestamp: &str) -> Value {
    json!({
        "current": current,
        "timestamp": timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document() {
        assert_eq!(
            document(Network::Testnet, "2025-01-01T00:00:00.000Z"),
            json!({"current": "testnet", "timestamp": "2025-01-01T00:00:00.000Z"})
        );
    }
}
