//! Set-network tool definition.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::domains::network::{Network, NetworkRegistry};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

const MAINNET_WARNING: &str =
    "WARNING: You are now operating on mainnet. All transactions will use real ALGO.";

/// Parameters for the set-network tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NetworkSetParams {
    /// Network to use (localnet, testnet, mainnet).
    #[schemars(extend("enum" = ["localnet", "testnet", "mainnet"]))]
    pub network: String,
}

pub struct NetworkSetTool {
    registry: Arc<NetworkRegistry>,
}

/// Outcome of a switch.
#[derive(Debug, PartialEq, Eq)]
pub struct NetworkSwitch {
    pub previous: Network,
    pub current: Network,
}

#[async_trait]
impl ToolDefinition for NetworkSetTool {
    const NAME: &'static str = "network_set";
    const DESCRIPTION: &'static str = "Set the current Algorand network to use";
    const FAILURE_CONTEXT: &'static str = "Error setting network";

    type Params = NetworkSetParams;
    type Output = NetworkSwitch;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all, fields(network = %params.network))]
    async fn run(&self, params: NetworkSetParams) -> Result<NetworkSwitch, ToolError> {
        let current: Network = params.network.parse()?;
        let previous = self.registry.set_network(current);
        if current == Network::Mainnet {
            warn!("Switched to mainnet, transactions will use real ALGO");
        } else {
            info!("Switched to {}", current);
        }
        Ok(NetworkSwitch { previous, current })
    }

    fn render(output: &NetworkSwitch) -> String {
        let mut text = format!(
            "Network switched from {} to {}.",
            output.previous, output.current
        );
        if output.current == Network::Mainnet {
            text.push_str("\n\n");
            text.push_str(MAINNET_WARNING);
        }
        text
    }
}
