//! Asset opt-out tool definition.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::ledger::{AssetOptOutRequest, TransactionOutcome, TransactionRequest};
use crate::domains::network::NetworkRegistry;
use crate::domains::tools::definitions::common::{
    note_bytes, submit, transaction_lines, validate_address, validate_optional_address,
};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the opt-out tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetOptOutParams {
    /// The Algorand address to opt out of the asset.
    pub sender: String,

    /// The ID of the asset to opt out of.
    pub asset_id: u64,

    /// The creator address of the asset (looked up by the client when omitted).
    #[serde(default)]
    pub creator: Option<String>,

    /// Whether to ensure the account has a zero balance before opting out.
    pub ensure_zero_balance: bool,

    /// Optional note to include with the transaction.
    #[serde(default)]
    pub note: Option<String>,
}

pub struct AssetOptOutTool {
    registry: Arc<NetworkRegistry>,
}

#[derive(Debug)]
pub struct AssetOptedOut {
    pub request: AssetOptOutRequest,
    pub outcome: TransactionOutcome,
}

#[async_trait]
impl ToolDefinition for AssetOptOutTool {
    const NAME: &'static str = "asset_opt_out";
    const DESCRIPTION: &'static str = "Opt an account out of an Algorand Standard Asset";
    const FAILURE_CONTEXT: &'static str = "Error opting out of asset";

    type Params = AssetOptOutParams;
    type Output = AssetOptedOut;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all, fields(asset_id = params.asset_id))]
    async fn run(&self, params: AssetOptOutParams) -> Result<AssetOptedOut, ToolError> {
        let request = AssetOptOutRequest {
            sender: validate_address("sender", &params.sender)?,
            asset_id: params.asset_id,
            creator: validate_optional_address("creator", params.creator.as_deref())?,
            ensure_zero_balance: params.ensure_zero_balance,
            note: note_bytes(params.note.as_deref()),
        };
        let (_, outcome) =
            submit(&self.registry, TransactionRequest::AssetOptOut(request.clone())).await?;
        Ok(AssetOptedOut { request, outcome })
    }

    fn render(output: &AssetOptedOut) -> String {
        let request = &output.request;
        let mut lines = vec![
            "Asset Opt-Out Successful:".to_string(),
            String::new(),
            format!("Account: {}", request.sender),
            format!("Asset ID: {}", request.asset_id),
        ];
        if let Some(creator) = &request.creator {
            lines.push(format!("Asset Creator: {}", creator));
        }
        lines.push(String::new());
        lines.push("Transaction Details:".to_string());
        lines.extend(transaction_lines(&output.outcome));
        lines.push(String::new());
        lines.push(
            "Note: The account is now opted out of this asset and can no longer hold it."
                .to_string(),
        );
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::ledger::testing::MockNetworks;
    use crate::domains::network::Network;
    use crate::domains::tools::definitions::test_support::{
        ALICE, BOB, call, is_error, text, tool_context,
    };
    use crate::domains::tools::router::dispatch;

    #[tokio::test]
    async fn test_opt_out_with_creator() {
        let mocks = MockNetworks::new();
        let result = call::<AssetOptOutTool>(
            &mocks,
            Network::Localnet,
            serde_json::json!({
                "sender": ALICE,
                "assetId": 12,
                "creator": BOB,
                "ensureZeroBalance": true
            }),
        )
        .await;

        assert!(!is_error(&result));
        let Some(TransactionRequest::AssetOptOut(request)) = mocks.localnet.last_request() else {
            panic!("expected an asset opt-out request");
        };
        assert!(request.ensure_zero_balance);
        assert!(text(&result).contains(&format!("Asset Creator: {}", BOB)));
    }

    #[tokio::test]
    async fn test_ensure_zero_balance_is_required() {
        let mocks = MockNetworks::new();
        let tool = AssetOptOutTool::new(&tool_context(&mocks, Network::Localnet));
        let args = serde_json::json!({ "sender": ALICE, "assetId": 12 });

        let result = dispatch(&tool, args.as_object().cloned().unwrap()).await;

        assert!(result.is_err());
        assert_eq!(mocks.total_calls(), 0);
    }
}
