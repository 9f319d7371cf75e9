//! Resource service implementation.
//!
//! Documents are built at read time from the shared network registry, so a
//! read always reflects the latest `network_set`.

use std::sync::Arc;

use rmcp::model::{ReadResourceResult, Resource, ResourceContents};
use tracing::{debug, info};

use super::definitions::{current, info as network_info, list, timestamp};
use super::error::ResourceError;
use super::registry::get_all_resources;
use crate::domains::network::{Network, NetworkRegistry};

/// Service for listing and reading resources.
pub struct ResourceService {
    registry: Arc<NetworkRegistry>,
    resources: Vec<ResourceEntry>,
}

/// An entry in the resource registry.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    /// The resource metadata.
    pub resource: Resource,

    /// Which document the resource serves.
    pub content: ResourceContent,
}

/// The documents the server can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceContent {
    /// The active network.
    Current,

    /// All networks plus the active one.
    List,

    /// One network and whether it is active.
    Network(Network),
}

impl ResourceService {
    pub fn new(registry: Arc<NetworkRegistry>) -> Self {
        let resources = get_all_resources();
        info!("Initializing ResourceService with {} resources", resources.len());
        Self {
            registry,
            resources,
        }
    }

    /// List all available resources.
    pub async fn list_resources(&self) -> Vec<Resource> {
        self.resources
            .iter()
            .map(|entry| entry.resource.clone())
            .collect()
    }

    /// Read a resource by URI.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let entry = self
            .resources
            .iter()
            .find(|entry| entry.resource.raw.uri == uri)
            .ok_or_else(|| ResourceError::not_found(uri))?;
        debug!("Reading resource {}", uri);

        let current = self.registry.current_network();
        let now = timestamp();
        let document = match entry.content {
            ResourceContent::Current => current::document(current, &now),
            ResourceContent::List => list::document(current, &now),
            ResourceContent::Network(network) => network_info::document(network, current, &now),
        };

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::TextResourceContents {
                uri: uri.to_string(),
                mime_type: entry.resource.raw.mime_type.clone(),
                text: serde_json::to_string_pretty(&document)?,
                meta: None,
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::ledger::testing::MockNetworks;

    fn read_json(result: &ReadResourceResult) -> serde_json::Value {
        match &result.contents[0] {
            ResourceContents::TextResourceContents {
                text, mime_type, ..
            } => {
                assert_eq!(mime_type.as_deref(), Some("application/json"));
                serde_json::from_str(text).unwrap()
            }
            _ => panic!("expected text contents"),
        }
    }

    #[tokio::test]
    async fn test_list_resources() {
        let mocks = MockNetworks::new();
        let service = ResourceService::new(mocks.registry(Network::Localnet));
        assert_eq!(service.list_resources().await.len(), 5);
    }

    #[tokio::test]
    async fn test_reads_follow_network_switch() {
        let mocks = MockNetworks::new();
        let registry = mocks.registry(Network::Localnet);
        let service = ResourceService::new(registry.clone());

        let doc = read_json(&service.read_resource("network://current").await.unwrap());
        assert_eq!(doc["current"], "localnet");
        assert!(doc["timestamp"].is_string());

        registry.set_network(Network::Testnet);
        let doc = read_json(&service.read_resource("network://list").await.unwrap());
        assert_eq!(doc["current"], "testnet");

        let doc = read_json(&service.read_resource("network://testnet").await.unwrap());
        assert_eq!(doc["network"], "testnet");
        assert_eq!(doc["isActive"], true);
        assert_eq!(mocks.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_read_unknown_resource() {
        let mocks = MockNetworks::new();
        let service = ResourceService::new(mocks.registry(Network::Localnet));
        let err = service.read_resource("network://devnet").await.unwrap_err();
        assert!(matches!(err, ResourceError::NotFound(_)));
    }
}
