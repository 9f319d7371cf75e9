//! Generate-account tool definition.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::domains::ledger::GeneratedAccount;
use crate::domains::network::{Network, NetworkRegistry};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// The tool takes no parameters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct AccountGenerateParams {}

pub struct AccountGenerateTool {
    registry: Arc<NetworkRegistry>,
}

#[derive(Debug)]
pub struct NewAccount {
    pub network: Network,
    pub account: GeneratedAccount,
}

#[async_trait]
impl ToolDefinition for AccountGenerateTool {
    const NAME: &'static str = "account_generate";
    const DESCRIPTION: &'static str = "Generate a new random Algorand account";
    const FAILURE_CONTEXT: &'static str = "Error generating account";

    type Params = AccountGenerateParams;
    type Output = NewAccount;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all)]
    async fn run(&self, _params: AccountGenerateParams) -> Result<NewAccount, ToolError> {
        let network = self.registry.current_network();
        let account = self.registry.client_for(network).generate_account().await?;
        info!("Generated account {} on {}", account.address, network);
        Ok(NewAccount { network, account })
    }

    fn render(output: &NewAccount) -> String {
        [
            "Successfully generated a new Algorand account:".to_string(),
            String::new(),
            format!("Network: {}", output.network),
            format!("Address: {}", output.account.address),
            format!("Mnemonic: {}", output.account.mnemonic),
            String::new(),
            "Note: Keep your mnemonic phrase secure. It provides full access to your account."
                .to_string(),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::ledger::testing::{GENERATED_ADDRESS, MockNetworks};
    use crate::domains::tools::definitions::test_support::{call, is_error, text};

    #[tokio::test]
    async fn test_generate_on_active_network() {
        let mocks = MockNetworks::new();
        let result =
            call::<AccountGenerateTool>(&mocks, Network::Testnet, serde_json::json!({})).await;

        assert!(!is_error(&result));
        let message = text(&result);
        assert!(message.starts_with("Successfully generated a new Algorand account:"));
        assert!(message.contains("Network: testnet"));
        assert!(message.contains(&format!("Address: {}", GENERATED_ADDRESS)));
        assert!(message.contains("Mnemonic: abandon"));
        assert_eq!(mocks.testnet.calls(), 1);
    }

    #[tokio::test]
    async fn test_generate_failure() {
        let mocks = MockNetworks::new();
        mocks.localnet.fail_with("no signer");
        let result =
            call::<AccountGenerateTool>(&mocks, Network::Localnet, serde_json::json!({})).await;

        assert!(is_error(&result));
        assert_eq!(text(&result), "Error generating account: no signer");
    }
}
