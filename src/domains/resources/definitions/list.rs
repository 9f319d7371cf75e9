//! Supported networks resource.

use serde_json::{Value, json};

use super::ResourceDefinition;
use crate::domains::network::Network;
use crate::domains::resources::service::ResourceContent;

pub struct NetworkListResource;

impl ResourceDefinition for NetworkListResource {
    const URI: &'static str = "network://list";
    const NAME: &'static str = "network-list";
    const DESCRIPTION: &'static str = "All supported Algorand networks and the active one";

    fn content() -> ResourceContent {
        ResourceContent::List
    }
}

pub fn document(current: Network, timestamp: &str) -> Value {
    json!({
        "networks": Network::ALL,
        "current": current,
        "timestamp": timestamp,
    })
}
