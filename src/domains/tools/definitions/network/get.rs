//! Get-network tool definition.
//!
//! Reports the active network together with the status its node returns.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::domains::ledger::NetworkStatus;
use crate::domains::network::{Network, NetworkRegistry};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

// ============================================================================
// Tool Parameters
// ============================================================================

/// The tool takes no parameters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NetworkGetParams {}

// ============================================================================
// Tool Definition
// ============================================================================

pub struct NetworkGetTool {
    registry: Arc<NetworkRegistry>,
}

/// Active network and its node status.
#[derive(Debug)]
pub struct NetworkReport {
    pub network: Network,
    pub status: NetworkStatus,
}

#[async_trait]
impl ToolDefinition for NetworkGetTool {
    const NAME: &'static str = "network_get";
    const DESCRIPTION: &'static str = "Get the current Algorand network being used";
    const FAILURE_CONTEXT: &'static str = "Error getting network";

    type Params = NetworkGetParams;
    type Output = NetworkReport;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all)]
    async fn run(&self, _params: NetworkGetParams) -> Result<NetworkReport, ToolError> {
        let network = self.registry.current_network();
        info!("Reading status of {}", network);
        let status = self.registry.client_for(network).network_status().await?;
        Ok(NetworkReport { network, status })
    }

    fn render(output: &NetworkReport) -> String {
        let info = serde_json::json!({
            "genesisId": output.status.genesis_id,
            "genesisHash": output.status.genesis_hash,
            "buildVersion": output.status.build_version,
            "lastRound": output.status.last_round,
        });
        let info = serde_json::to_string_pretty(&info).unwrap_or_else(|_| info.to_string());
        format!(
            "Current network: {}. Network information: {}",
            output.network, info
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::ledger::testing::MockNetworks;
    use crate::domains::tools::definitions::test_support::{call, is_error, text};

    #[tokio::test]
    async fn test_reports_active_network() {
        let mocks = MockNetworks::new();
        let result = call::<NetworkGetTool>(&mocks, Network::Testnet, serde_json::json!({})).await;

        assert!(!is_error(&result));
        let message = text(&result);
        assert!(message.starts_with("Current network: testnet. Network information: {"));
        assert!(message.contains("\"genesisId\": \"testnet-v1\""));
        assert!(message.contains("\"lastRound\": 42"));
        assert_eq!(mocks.testnet.calls(), 1);
        assert_eq!(mocks.localnet.calls(), 0);
    }

    #[tokio::test]
    async fn test_status_failure() {
        let mocks = MockNetworks::new();
        mocks.localnet.fail_with("connection refused");
        let result = call::<NetworkGetTool>(&mocks, Network::Localnet, serde_json::json!({})).await;

        assert!(is_error(&result));
        assert_eq!(text(&result), "Error getting network: connection refused");
    }
}
