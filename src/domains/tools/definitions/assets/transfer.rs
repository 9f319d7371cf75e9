//! Asset-transfer tool definition.
//!
//! Covers plain transfers, clawback (sender acting as clawback against
//! `clawbackTarget`) and close-out via `closeAssetTo`.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::ledger::{AssetTransferRequest, TransactionOutcome, TransactionRequest};
use crate::domains::network::NetworkRegistry;
use crate::domains::tools::definitions::common::{
    note_bytes, submit, transaction_lines, validate_address, validate_optional_address,
};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the asset-transfer tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetTransferParams {
    /// The Algorand address sending the asset.
    pub sender: String,

    /// The Algorand address receiving the asset.
    pub receiver: String,

    /// The ID of the asset to transfer.
    pub asset_id: u64,

    /// The amount of the asset to transfer, in base units.
    pub amount: u64,

    /// Optional note to include with the transaction.
    #[serde(default)]
    pub note: Option<String>,

    /// If provided, the sender acts as the clawback address and claws assets back from this address.
    #[serde(default)]
    pub clawback_target: Option<String>,

    /// If provided, the remaining balance goes to this address and the sender is opted out.
    #[serde(default)]
    pub close_asset_to: Option<String>,
}

pub struct AssetTransferTool {
    registry: Arc<NetworkRegistry>,
}

#[derive(Debug)]
pub struct AssetTransferred {
    pub request: AssetTransferRequest,
    pub outcome: TransactionOutcome,
}

#[async_trait]
impl ToolDefinition for AssetTransferTool {
    const NAME: &'static str = "asset_transfer";
    const DESCRIPTION: &'static str = "Transfer an Algorand Standard Asset from one account to another";
    const FAILURE_CONTEXT: &'static str = "Error transferring asset";

    type Params = AssetTransferParams;
    type Output = AssetTransferred;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all, fields(asset_id = params.asset_id, amount = params.amount))]
    async fn run(&self, params: AssetTransferParams) -> Result<AssetTransferred, ToolError> {
        let request = AssetTransferRequest {
            sender: validate_address("sender", &params.sender)?,
            receiver: validate_address("receiver", &params.receiver)?,
            asset_id: params.asset_id,
            amount: params.amount,
            clawback_target: validate_optional_address(
                "clawbackTarget",
                params.clawback_target.as_deref(),
            )?,
            close_asset_to: validate_optional_address(
                "closeAssetTo",
                params.close_asset_to.as_deref(),
            )?,
            note: note_bytes(params.note.as_deref()),
        };
        let (_, outcome) =
            submit(&self.registry, TransactionRequest::AssetTransfer(request.clone())).await?;
        Ok(AssetTransferred { request, outcome })
    }

    fn render(output: &AssetTransferred) -> String {
        let request = &output.request;
        let from = request.clawback_target.as_deref().unwrap_or(&request.sender);
        let mut lines = vec![
            "Asset Transfer Successful:".to_string(),
            String::new(),
            format!("Asset ID: {}", request.asset_id),
            format!("Amount: {}", request.amount),
            format!("From: {}", from),
            format!("To: {}", request.receiver),
        ];
        if let Some(close_to) = &request.close_asset_to {
            lines.push(format!("Close Remainder To: {}", close_to));
        }
        lines.push(String::new());
        lines.push("Transaction Details:".to_string());
        lines.extend(transaction_lines(&output.outcome));
        lines.join("\n")
    }
}
