//! Asset opt-in tool definition.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::ledger::{AssetRequest, TransactionOutcome, TransactionRequest};
use crate::domains::network::NetworkRegistry;
use crate::domains::tools::definitions::common::{
    note_bytes, submit, transaction_lines, validate_address,
};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the opt-in tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetOptInParams {
    /// The Algorand address to opt into the asset.
    pub sender: String,

    /// The ID of the asset to opt into.
    pub asset_id: u64,

    /// Optional note to include with the transaction.
    #[serde(default)]
    pub note: Option<String>,
}

pub struct AssetOptInTool {
    registry: Arc<NetworkRegistry>,
}

#[derive(Debug)]
pub struct AssetOptedIn {
    pub request: AssetRequest,
    pub outcome: TransactionOutcome,
}

#[async_trait]
impl ToolDefinition for AssetOptInTool {
    const NAME: &'static str = "asset_opt_in";
    const DESCRIPTION: &'static str = "Opt an account into an Algorand Standard Asset";
    const FAILURE_CONTEXT: &'static str = "Error opting into asset";

    type Params = AssetOptInParams;
    type Output = AssetOptedIn;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all, fields(asset_id = params.asset_id))]
    async fn run(&self, params: AssetOptInParams) -> Result<AssetOptedIn, ToolError> {
        let request = AssetRequest {
            sender: validate_address("sender", &params.sender)?,
            asset_id: params.asset_id,
            note: note_bytes(params.note.as_deref()),
        };
        let (_, outcome) =
            submit(&self.registry, TransactionRequest::AssetOptIn(request.clone())).await?;
        Ok(AssetOptedIn { request, outcome })
    }

    fn render(output: &AssetOptedIn) -> String {
        let mut lines = vec![
            "Asset Opt-In Successful:".to_string(),
            String::new(),
            format!("Account: {}", output.request.sender),
            format!("Asset ID: {}", output.request.asset_id),
            String::new(),
            "Transaction Details:".to_string(),
        ];
        lines.extend(transaction_lines(&output.outcome));
        lines.push(String::new());
        lines.push("Note: The account is now able to receive this asset.".to_string());
        lines.join("\n")
    }
}
