//! Asset-config tool definition.
//!
//! Changes the manager, reserve, freeze or clawback address of an asset.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::ledger::{AssetConfigRequest, TransactionOutcome, TransactionRequest};
use crate::domains::network::NetworkRegistry;
use crate::domains::tools::definitions::common::{
    note_bytes, submit, transaction_lines, validate_address, validate_optional_address,
};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the asset-config tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetConfigParams {
    /// The Algorand address that is the current manager of the asset.
    pub sender: String,

    /// The ID of the asset to configure.
    pub asset_id: u64,

    /// The new manager address.
    #[serde(default)]
    pub manager: Option<String>,

    /// The new reserve address.
    #[serde(default)]
    pub reserve: Option<String>,

    /// The new freeze address.
    #[serde(default)]
    pub freeze: Option<String>,

    /// The new clawback address.
    #[serde(default)]
    pub clawback: Option<String>,

    /// Optional note to include with the transaction.
    #[serde(default)]
    pub note: Option<String>,
}

pub struct AssetConfigTool {
    registry: Arc<NetworkRegistry>,
}

#[derive(Debug)]
pub struct AssetConfigured {
    pub request: AssetConfigRequest,
    pub outcome: TransactionOutcome,
}

#[async_trait]
impl ToolDefinition for AssetConfigTool {
    const NAME: &'static str = "asset_config";
    const DESCRIPTION: &'static str = "Configure an existing Algorand Standard Asset";
    const FAILURE_CONTEXT: &'static str = "Error configuring asset";

    type Params = AssetConfigParams;
    type Output = AssetConfigured;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all, fields(asset_id = params.asset_id))]
    async fn run(&self, params: AssetConfigParams) -> Result<AssetConfigured, ToolError> {
        let request = AssetConfigRequest {
            sender: validate_address("sender", &params.sender)?,
            asset_id: params.asset_id,
            manager: validate_optional_address("manager", params.manager.as_deref())?,
            reserve: validate_optional_address("reserve", params.reserve.as_deref())?,
            freeze: validate_optional_address("freeze", params.freeze.as_deref())?,
            clawback: validate_optional_address("clawback", params.clawback.as_deref())?,
            note: note_bytes(params.note.as_deref()),
        };
        let (_, outcome) =
            submit(&self.registry, TransactionRequest::AssetConfig(request.clone())).await?;
        Ok(AssetConfigured { request, outcome })
    }

    fn render(output: &AssetConfigured) -> String {
        let request = &output.request;
        let or_no_change =
            |v: &Option<String>| v.clone().unwrap_or_else(|| "No change".to_string());
        let mut lines = vec![
            "Asset Configuration Successful:".to_string(),
            String::new(),
            format!("Asset ID: {}", request.asset_id),
            format!("Manager: {}", request.sender),
            String::new(),
            "New Configuration:".to_string(),
            format!("New Manager: {}", or_no_change(&request.manager)),
            format!("New Reserve: {}", or_no_change(&request.reserve)),
            format!("New Freeze: {}", or_no_change(&request.freeze)),
            format!("New Clawback: {}", or_no_change(&request.clawback)),
            String::new(),
            "Transaction Details:".to_string(),
        ];
        lines.extend(transaction_lines(&output.outcome));
        lines.join("\n")
    }
}
