//! Asset destroy tool definition.

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

/// Parameters for the destroy tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetDestroyParams {
    /// The Algorand address that is the manager of the asset.
    pub sender: String,

    /// The ID of the asset to destroy.
    pub asset_id: u64,

    /// Optional note to include with the transaction.
    #[serde(default)]
    pub note: Option<String>,
}

pub struct AssetDestroyTool {
    registry: Arc<NetworkRegistry>,
}

#[derive(Debug)]
pub struct AssetDestroyed {
    pub request: AssetRequest,
    pub outcome: TransactionOutcome,
}

#[async_trait]
impl ToolDefinition for AssetDestroyTool {
    const NAME: &'static str = "asset_destroy";
    const DESCRIPTION: &'static str = "Destroy an Algorand Standard Asset (all units must be held by the creator)";
    const FAILURE_CONTEXT: &'static str = "Error destroying asset";

    type Params = AssetDestroyParams;
    type Output = AssetDestroyed;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all, fields(asset_id = params.asset_id))]
    async fn run(&self, params: AssetDestroyParams) -> Result<AssetDestroyed, ToolError> {
        let request = AssetRequest {
            sender: validate_address("sender", &params.sender)?,
            asset_id: params.asset_id,
            note: note_bytes(params.note.as_deref()),
        };
        let (_, outcome) =
            submit(&self.registry, TransactionRequest::AssetDestroy(request.clone())).await?;
        Ok(AssetDestroyed { request, outcome })
    }

    fn render(output: &AssetDestroyed) -> String {
        let mut lines = vec![
            "Asset Destruction Successful:".to_string(),
            String::new(),
            format!("Asset ID: {}", output.request.asset_id),
            format!("Manager: {}", output.request.sender),
            String::new(),
            "Transaction Details:".to_string(),
        ];
        lines.extend(transaction_lines(&output.outcome));
        lines.push(String::new());
        lines.push(
            "Note: The asset has been permanently destroyed and can no longer be transferred."
                .to_string(),
        );
        lines.join("\n")
    }
}
