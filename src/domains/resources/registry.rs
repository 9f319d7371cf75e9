//! Resource Registry - central registration of all resources.

use rmcp::model::{AnnotateAble, RawResource};

use super::definitions::{
    NetworkCurrentResource, NetworkListResource, ResourceDefinition, network_info_entry,
};
use super::service::ResourceEntry;
use crate::domains::network::Network;

/// Helper function to create an annotated resource from a definition.
fn build_resource<R: ResourceDefinition>() -> ResourceEntry {
    let mut raw = RawResource::new(R::URI, R::NAME);
    raw.description = Some(R::DESCRIPTION.to_string());
    raw.mime_type = Some(R::MIME_TYPE.to_string());

    ResourceEntry {
        resource: raw.no_annotation(),
        content: R::content(),
    }
}

/// Get all registered resources, in listing order.
pub fn get_all_resources() -> Vec<ResourceEntry> {
    let mut resources = vec![
        build_resource::<NetworkCurrentResource>(),
        build_resource::<NetworkListResource>(),
    ];
    resources.extend(Network::ALL.into_iter().map(network_info_entry));
    resources
}

/// Get the list of all resource URIs.
pub fn resource_uris() -> Vec<String> {
    get_all_resources()
        .into_iter()
        .map(|entry| entry.resource.raw.uri)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_all_resources() {
        let resources = get_all_resources();
        assert_eq!(resources.len(), 5);
        assert!(
            resources
                .iter()
                .all(|r| r.resource.raw.mime_type.as_deref() == Some("application/json"))
        );
    }

    #[test]
    fn test_resource_uris() {
        assert_eq!(
            resource_uris(),
            vec![
                "network://current",
                "network://list",
                "network://localnet",
                "network://testnet",
                "network://mainnet",
            ]
        );
    }
}
