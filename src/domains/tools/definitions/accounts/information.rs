//! Account-information tool definition.
//!
//! Looks up balance, status and holdings of an account on the active network.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::ledger::AccountInformation;
use crate::domains::network::{Network, NetworkRegistry};
use crate::domains::tools::definitions::common::validate_address;
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Holdings listed before the remainder is summarised.
const LISTED_HOLDINGS: usize = 5;

/// Parameters for the account-information tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AccountInformationParams {
    /// The Algorand address to look up.
    pub address: String,
}

pub struct AccountInformationTool {
    registry: Arc<NetworkRegistry>,
}

#[derive(Debug)]
pub struct AccountReport {
    pub network: Network,
    pub account: AccountInformation,
}

#[async_trait]
impl ToolDefinition for AccountInformationTool {
    const NAME: &'static str = "account_get_information";
    const DESCRIPTION: &'static str = "Get information about an Algorand account";
    const FAILURE_CONTEXT: &'static str = "Error retrieving account information";

    type Params = AccountInformationParams;
    type Output = AccountReport;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all, fields(address = %params.address))]
    async fn run(&self, params: AccountInformationParams) -> Result<AccountReport, ToolError> {
        let address = validate_address("address", &params.address)?;
        let network = self.registry.current_network();
        let account = self
            .registry
            .client_for(network)
            .account_information(&address)
            .await?;
        Ok(AccountReport { network, account })
    }

    fn render(output: &AccountReport) -> String {
        let account = &output.account;
        let mut lines = vec![
            "Account Information:".to_string(),
            String::new(),
            format!("Network: {}", output.network),
            format!("Address: {}", account.address),
            String::new(),
            "Balance Information:".to_string(),
            format!("Balance: {}", account.amount_without_pending_rewards),
            format!("Minimum Balance: {} microAlgos", account.min_balance.0),
            format!("Pending Rewards: {} microAlgos", account.pending_rewards.0),
            String::new(),
            "Account Status:".to_string(),
            format!("Status: {}", account.status.as_deref().unwrap_or("Unknown")),
            String::new(),
            "Applications:".to_string(),
            format!("Total Apps Opted In: {}", account.apps_opted_in),
            format!("Created Apps: {}", account.created_apps),
            String::new(),
            "Assets:".to_string(),
            format!("Total Assets Opted In: {}", account.assets.len()),
            format!("Created Assets: {}", account.created_assets),
        ];

        if !account.assets.is_empty() {
            lines.push(String::new());
            lines.push(format!("Asset Holdings (first {}):", LISTED_HOLDINGS));
            for (i, asset) in account.assets.iter().take(LISTED_HOLDINGS).enumerate() {
                lines.push(format!(
                    "Asset #{}: ID {}, Amount: {}, Frozen: {}",
                    i + 1,
                    asset.asset_id,
                    asset.amount,
                    if asset.is_frozen { "Yes" } else { "No" }
                ));
            }
            if account.assets.len() > LISTED_HOLDINGS {
                lines.push(format!(
                    "... and {} more assets",
                    account.assets.len() - LISTED_HOLDINGS
                ));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::ledger::testing::MockNetworks;
    use crate::domains::ledger::{AssetHolding, MicroAlgos};
    use crate::domains::tools::definitions::test_support::{ALICE, call, is_error, text};

    fn holding(asset_id: u64) -> AssetHolding {
        AssetHolding {
            asset_id,
            amount: asset_id * 10,
            is_frozen: asset_id == 2,
        }
    }

    #[tokio::test]
    async fn test_renders_balances_and_first_holdings() {
        let mocks = MockNetworks::new();
        mocks.localnet.set_account(AccountInformation {
            amount_without_pending_rewards: MicroAlgos(2_500_000),
            min_balance: MicroAlgos(100_000),
            status: Some("Offline".into()),
            assets: (1..=7).map(holding).collect(),
            ..Default::default()
        });

        let result = call::<AccountInformationTool>(
            &mocks,
            Network::Localnet,
            serde_json::json!({ "address": ALICE }),
        )
        .await;

        assert!(!is_error(&result));
        let message = text(&result);
        assert!(message.contains(&format!("Address: {}", ALICE)));
        assert!(message.contains("Balance: 2500000 microAlgos (2.5 Algos)"));
        assert!(message.contains("Minimum Balance: 100000 microAlgos"));
        assert!(message.contains("Status: Offline"));
        assert!(message.contains("Total Assets Opted In: 7"));
        assert!(message.contains("Asset #2: ID 2, Amount: 20, Frozen: Yes"));
        assert!(message.contains("Asset #5: ID 5"));
        assert!(!message.contains("Asset #6"));
        assert!(message.ends_with("... and 2 more assets"));
    }

    #[tokio::test]
    async fn test_no_holdings_section_when_empty() {
        let mocks = MockNetworks::new();
        let result = call::<AccountInformationTool>(
            &mocks,
            Network::Localnet,
            serde_json::json!({ "address": ALICE }),
        )
        .await;

        let message = text(&result);
        assert!(message.contains("Status: Unknown"));
        assert!(!message.contains("Asset Holdings"));
    }

    #[tokio::test]
    async fn test_malformed_address_is_not_delegated() {
        let mocks = MockNetworks::new();
        let result = call::<AccountInformationTool>(
            &mocks,
            Network::Localnet,
            serde_json::json!({ "address": "not-an-address" }),
        )
        .await;

        assert!(is_error(&result));
        assert!(text(&result).starts_with("Error retrieving account information: Invalid arguments"));
        assert_eq!(mocks.total_calls(), 0);
    }
}
