//! Detect-network tool definition.
//!
//! Scans a free-form request for "on testnet" / "on mainnet" / "on localnet"
//! and switches to the network it names.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::network::{Network, NetworkRegistry};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the detect-network tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NetworkDetectParams {
    /// Free-form text that may name a network, e.g. "deploy this on testnet".
    pub query: String,
}

pub struct NetworkDetectTool {
    registry: Arc<NetworkRegistry>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct NetworkDetection {
    pub previous: Network,
    pub current: Network,
}

#[async_trait]
impl ToolDefinition for NetworkDetectTool {
    const NAME: &'static str = "network_detect";
    const DESCRIPTION: &'static str = "Detect the Algorand network named in a request (\"on testnet\", \"on mainnet\", \"on localnet\") and make it the current network";
    const FAILURE_CONTEXT: &'static str = "Error detecting network";

    type Params = NetworkDetectParams;
    type Output = NetworkDetection;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all)]
    async fn run(&self, params: NetworkDetectParams) -> Result<NetworkDetection, ToolError> {
        let previous = self.registry.current_network();
        let current = self.registry.infer_from_text(&params.query);
        Ok(NetworkDetection { previous, current })
    }

    fn render(output: &NetworkDetection) -> String {
        if output.previous == output.current {
            format!(
                "Current network: {} (no change detected in the request).",
                output.current
            )
        } else {
            format!(
                "Current network: {} (switched from {}).",
                output.current, output.previous
            )
        }
    }
}
