//! Explorer-URL tool definition.
//!
//! Builds `<base>/<network>/<resourceType>/<resourceId>`. The requested
//! network (default localnet) also becomes the active network.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::domains::network::{Network, NetworkRegistry};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Kinds of resource the explorer can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Transaction,
    Block,
    Asset,
    Application,
    Account,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceType::Transaction => "transaction",
            ResourceType::Block => "block",
            ResourceType::Asset => "asset",
            ResourceType::Application => "application",
            ResourceType::Account => "account",
        };
        f.write_str(name)
    }
}

fn default_network() -> Network {
    Network::Localnet
}

/// Parameters for the explorer-URL tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerGetUrlParams {
    /// Network the resource lives on (default: localnet).
    #[serde(default = "default_network")]
    pub network: Network,

    /// Kind of resource: transaction, block, asset, application or account.
    pub resource_type: ResourceType,

    /// Transaction id, round, asset id, application id or address.
    pub resource_id: String,
}

pub struct ExplorerGetUrlTool {
    registry: Arc<NetworkRegistry>,
    base_url: String,
}

#[derive(Debug)]
pub struct ExplorerLink {
    pub network: Network,
    pub resource_type: ResourceType,
    pub resource_id: String,
    pub url: String,
}

#[async_trait]
impl ToolDefinition for ExplorerGetUrlTool {
    const NAME: &'static str = "explorer_get_url";
    const DESCRIPTION: &'static str =
        "Generate a URL to view an Algorand resource in Lora Explorer";
    const FAILURE_CONTEXT: &'static str = "Error generating explorer URL";

    type Params = ExplorerGetUrlParams;
    type Output = ExplorerLink;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
            base_url: context.config.explorer.base_url.clone(),
        }
    }

    #[instrument(skip_all, fields(network = %params.network, resource = %params.resource_type))]
    async fn run(&self, params: ExplorerGetUrlParams) -> Result<ExplorerLink, ToolError> {
        let resource_id = params.resource_id.trim();
        if resource_id.is_empty() {
            return Err(ToolError::invalid_arguments("resourceId must not be empty"));
        }

        self.registry.set_network(params.network);
        let url = format!(
            "{}/{}/{}/{}",
            self.base_url, params.network, params.resource_type, resource_id
        );
        debug!("Explorer URL: {}", url);

        Ok(ExplorerLink {
            network: params.network,
            resource_type: params.resource_type,
            resource_id: resource_id.to_string(),
            url,
        })
    }

    fn render(output: &ExplorerLink) -> String {
        [
            "Explorer URL Generated:".to_string(),
            String::new(),
            "Resource Details:".to_string(),
            format!("Network: {}", output.network),
            format!("Resource Type: {}", output.resource_type),
            format!("Resource ID: {}", output.resource_id),
            String::new(),
            "URL:".to_string(),
            output.url.clone(),
            String::new(),
            format!(
                "Note: Use this URL to view the {} in the Lora Explorer.",
                output.resource_type
            ),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::ledger::testing::MockNetworks;
    use crate::domains::tools::definitions::test_support::{is_error, text, tool_context};
    use crate::domains::tools::router::dispatch;

    async fn get_url(context: &ToolContext, args: serde_json::Value) -> rmcp::model::CallToolResult {
        let tool = ExplorerGetUrlTool::new(context);
        dispatch(&tool, args.as_object().cloned().unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_url_and_network_switch() {
        let mocks = MockNetworks::new();
        let context = tool_context(&mocks, Network::Localnet);

        let result = get_url(
            &context,
            serde_json::json!({
                "network": "testnet",
                "resourceType": "transaction",
                "resourceId": "ABC"
            }),
        )
        .await;

        assert!(!is_error(&result));
        let message = text(&result);
        assert!(message.contains("\nhttps://lora.algokit.io/testnet/transaction/ABC\n"));
        assert!(message.ends_with("view the transaction in the Lora Explorer."));
        assert_eq!(context.registry.current_network(), Network::Testnet);
        assert_eq!(mocks.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_network_defaults_to_localnet() {
        let mocks = MockNetworks::new();
        let context = tool_context(&mocks, Network::Mainnet);

        let result = get_url(
            &context,
            serde_json::json!({ "resourceType": "asset", "resourceId": "1234" }),
        )
        .await;

        assert!(text(&result).contains("https://lora.algokit.io/localnet/asset/1234"));
        assert_eq!(context.registry.current_network(), Network::Localnet);
    }

    #[tokio::test]
    async fn test_unknown_resource_type_fails_schema() {
        let mocks = MockNetworks::new();
        let tool = ExplorerGetUrlTool::new(&tool_context(&mocks, Network::Localnet));
        let args = serde_json::json!({ "resourceType": "box", "resourceId": "1" });

        assert!(dispatch(&tool, args.as_object().cloned().unwrap()).await.is_err());
    }
}
