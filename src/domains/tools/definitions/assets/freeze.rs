//! Asset freeze tool definition.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::ledger::{AssetFreezeRequest, TransactionOutcome, TransactionRequest};
use crate::domains::network::NetworkRegistry;
use crate::domains::tools::definitions::common::{
    note_bytes, submit, transaction_lines, validate_address,
};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the freeze tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetFreezeParams {
    /// The Algorand address with freeze authority for the asset.
    pub sender: String,

    /// The ID of the asset to freeze or unfreeze.
    pub asset_id: u64,

    /// The account whose holding is frozen or unfrozen.
    pub account: String,

    /// Whether to freeze (true) or unfreeze (false) the holding.
    pub frozen: bool,

    /// Optional note to include with the transaction.
    #[serde(default)]
    pub note: Option<String>,
}

pub struct AssetFreezeTool {
    registry: Arc<NetworkRegistry>,
}

#[derive(Debug)]
pub struct AssetFrozen {
    pub request: AssetFreezeRequest,
    pub outcome: TransactionOutcome,
}

#[async_trait]
impl ToolDefinition for AssetFreezeTool {
    const NAME: &'static str = "asset_freeze";
    const DESCRIPTION: &'static str = "Freeze or unfreeze an account's holding of an Algorand Standard Asset";
    const FAILURE_CONTEXT: &'static str = "Error freezing asset";

    type Params = AssetFreezeParams;
    type Output = AssetFrozen;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    fn failure_context(params: &AssetFreezeParams) -> String {
        if params.frozen {
            Self::FAILURE_CONTEXT.to_string()
        } else {
            "Error unfreezing asset".to_string()
        }
    }

    #[instrument(skip_all, fields(asset_id = params.asset_id, frozen = params.frozen))]
    async fn run(&self, params: AssetFreezeParams) -> Result<AssetFrozen, ToolError> {
        let request = AssetFreezeRequest {
            sender: validate_address("sender", &params.sender)?,
            asset_id: params.asset_id,
            account: validate_address("account", &params.account)?,
            frozen: params.frozen,
            note: note_bytes(params.note.as_deref()),
        };
        let (_, outcome) =
            submit(&self.registry, TransactionRequest::AssetFreeze(request.clone())).await?;
        Ok(AssetFrozen { request, outcome })
    }

    fn render(output: &AssetFrozen) -> String {
        let request = &output.request;
        let (action, status, ability) = if request.frozen {
            ("Freeze", "Frozen", "can no longer")
        } else {
            ("Unfreeze", "Unfrozen", "can now")
        };
        let mut lines = vec![
            format!("Asset {} Successful:", action),
            String::new(),
            format!("Asset ID: {}", request.asset_id),
            format!("Account: {}", request.account),
            format!("Freeze Status: {}", status),
            format!("Freeze Authority: {}", request.sender),
            String::new(),
            "Transaction Details:".to_string(),
        ];
        lines.extend(transaction_lines(&output.outcome));
        lines.push(String::new());
        lines.push(format!("Note: The account {} transfer this asset.", ability));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::ledger::testing::MockNetworks;
    use crate::domains::network::Network;
    use crate::domains::tools::definitions::test_support::{ALICE, BOB, call, is_error, text};

    fn args(frozen: bool) -> serde_json::Value {
        serde_json::json!({ "sender": ALICE, "assetId": 9, "account": BOB, "frozen": frozen })
    }

    #[tokio::test]
    async fn test_freeze() {
        let mocks = MockNetworks::new();
        let result = call::<AssetFreezeTool>(&mocks, Network::Localnet, args(true)).await;

        let message = text(&result);
        assert!(message.starts_with("Asset Freeze Successful:"));
        assert!(message.contains("Freeze Status: Frozen"));
        assert!(message.ends_with("Note: The account can no longer transfer this asset."));
    }

    #[tokio::test]
    async fn test_unfreeze_failure_context() {
        let mocks = MockNetworks::new();
        mocks.localnet.fail_with("asset not found");
        let result = call::<AssetFreezeTool>(&mocks, Network::Localnet, args(false)).await;

        assert!(is_error(&result));
        assert_eq!(text(&result), "Error unfreezing asset: asset not found");

        mocks.localnet.clear_failure();
        let result = call::<AssetFreezeTool>(&mocks, Network::Localnet, args(false)).await;
        assert!(text(&result).starts_with("Asset Unfreeze Successful:"));
    }
}
