//! Restore-from-mnemonic tool definition.
//!
//! The on-chain lookup after recovery is best effort: a lookup failure is
//! reported as a note, never as a tool error.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::domains::ledger::AccountInformation;
use crate::domains::network::{Network, NetworkRegistry};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

const MNEMONIC_WORDS: usize = 25;

/// Parameters for the restore tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AccountFromMnemonicParams {
    /// The 25-word mnemonic phrase.
    pub mnemonic: String,
}

pub struct AccountFromMnemonicTool {
    registry: Arc<NetworkRegistry>,
}

#[derive(Debug)]
pub struct RestoredAccount {
    pub network: Network,
    pub address: String,
    /// `None` when the account could not be found on-chain.
    pub account: Option<AccountInformation>,
}

#[async_trait]
impl ToolDefinition for AccountFromMnemonicTool {
    const NAME: &'static str = "account_from_mnemonic";
    const DESCRIPTION: &'static str = "Create an Algorand account from a mnemonic phrase";
    const FAILURE_CONTEXT: &'static str = "Error restoring account";

    type Params = AccountFromMnemonicParams;
    type Output = RestoredAccount;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all)]
    async fn run(&self, params: AccountFromMnemonicParams) -> Result<RestoredAccount, ToolError> {
        let words = params.mnemonic.split_whitespace().count();
        if words != MNEMONIC_WORDS {
            return Err(ToolError::invalid_arguments(format!(
                "mnemonic must have {} words, got {}",
                MNEMONIC_WORDS, words
            )));
        }

        let network = self.registry.current_network();
        let client = self.registry.client_for(network);
        let address = client.account_from_mnemonic(&params.mnemonic).await?;
        let account = match client.account_information(&address).await {
            Ok(account) => Some(account),
            Err(e) => {
                debug!("Lookup of restored account failed: {}", e);
                None
            }
        };

        Ok(RestoredAccount {
            network,
            address,
            account,
        })
    }

    fn render(output: &RestoredAccount) -> String {
        let mut lines = vec![
            "Successfully restored account from mnemonic:".to_string(),
            String::new(),
            format!("Network: {}", output.network),
            format!("Address: {}", output.address),
            String::new(),
        ];
        match &output.account {
            Some(account) => lines.extend([
                "Account Status:".to_string(),
                format!("Balance: {}", account.amount_without_pending_rewards),
                format!("Minimum Balance: {} microAlgos", account.min_balance.0),
                format!("Status: {}", account.status.as_deref().unwrap_or("Unknown")),
                format!("Total Apps Opted In: {}", account.apps_opted_in),
                format!("Total Assets Opted In: {}", account.assets.len()),
            ]),
            None => {
                lines.push("Note: This account does not appear to exist on-chain yet.".to_string())
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::ledger::testing::{MockNetworks, RECOVERED_ADDRESS};
    use crate::domains::ledger::MicroAlgos;
    use crate::domains::tools::definitions::test_support::{is_error, text, tool_context};
    use crate::domains::tools::router::dispatch;

    fn mnemonic() -> serde_json::Value {
        serde_json::json!({ "mnemonic": format!("{}art", "abandon ".repeat(24)) })
    }

    #[tokio::test]
    async fn test_restore_with_lookup() {
        let mocks = MockNetworks::new();
        mocks.localnet.set_account(AccountInformation {
            amount_without_pending_rewards: MicroAlgos(1_000_000),
            ..Default::default()
        });
        let tool = AccountFromMnemonicTool::new(&tool_context(&mocks, Network::Localnet));

        let result = dispatch(&tool, mnemonic().as_object().cloned().unwrap())
            .await
            .unwrap();

        assert!(!is_error(&result));
        let message = text(&result);
        assert!(message.contains(&format!("Address: {}", RECOVERED_ADDRESS)));
        assert!(message.contains("Balance: 1000000 microAlgos (1 Algos)"));
        assert_eq!(mocks.localnet.calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_lookup_is_a_note() {
        let mocks = MockNetworks::new();
        mocks.localnet.set_account_missing(true);
        let tool = AccountFromMnemonicTool::new(&tool_context(&mocks, Network::Localnet));

        let result = dispatch(&tool, mnemonic().as_object().cloned().unwrap())
            .await
            .unwrap();

        assert!(!is_error(&result));
        let message = text(&result);
        assert!(message.contains(&format!("Address: {}", RECOVERED_ADDRESS)));
        assert!(message.ends_with("Note: This account does not appear to exist on-chain yet."));
    }

    #[tokio::test]
    async fn test_wrong_word_count() {
        let mocks = MockNetworks::new();
        let tool = AccountFromMnemonicTool::new(&tool_context(&mocks, Network::Localnet));
        let args = serde_json::json!({ "mnemonic": "too short" });

        let result = dispatch(&tool, args.as_object().cloned().unwrap())
            .await
            .unwrap();

        assert!(is_error(&result));
        assert_eq!(
            text(&result),
            "Error restoring account: Invalid arguments: mnemonic must have 25 words, got 2"
        );
        assert_eq!(mocks.total_calls(), 0);
    }
}
