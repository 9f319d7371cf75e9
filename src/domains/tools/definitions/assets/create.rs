//! Asset-create tool definition.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::domains::ledger::{AssetCreateRequest, TransactionOutcome, TransactionRequest};
use crate::domains::network::NetworkRegistry;
use crate::domains::tools::definitions::common::{
    note_bytes, submit, transaction_lines, validate_address, validate_optional_address,
};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the asset-create tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetCreateParams {
    /// The Algorand address that will create and manage the asset.
    pub sender: String,

    /// The total number of units of this asset.
    pub total: u64,

    /// The number of decimals for the asset (default: 0).
    #[serde(default)]
    pub decimals: Option<u32>,

    /// The name of the asset.
    #[serde(default)]
    pub asset_name: Option<String>,

    /// The unit name of the asset.
    #[serde(default)]
    pub unit_name: Option<String>,

    /// A URL where more information about the asset can be retrieved.
    #[serde(default)]
    pub url: Option<String>,

    /// A hash of some metadata that is relevant to this asset.
    #[serde(default)]
    pub metadata_hash: Option<String>,

    /// Whether holdings of the asset are frozen by default.
    #[serde(default)]
    pub default_frozen: Option<bool>,

    /// The address of the account that can manage the configuration of the asset.
    #[serde(default)]
    pub manager: Option<String>,

    /// The address of the account that holds the reserve of this asset.
    #[serde(default)]
    pub reserve: Option<String>,

    /// The address of the account that can freeze or unfreeze the asset.
    #[serde(default)]
    pub freeze: Option<String>,

    /// The address of the account that can clawback holdings of this asset.
    #[serde(default)]
    pub clawback: Option<String>,

    /// Optional note to include with the transaction.
    #[serde(default)]
    pub note: Option<String>,
}

pub struct AssetCreateTool {
    registry: Arc<NetworkRegistry>,
}

#[derive(Debug)]
pub struct AssetCreated {
    pub request: AssetCreateRequest,
    pub outcome: TransactionOutcome,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[async_trait]
impl ToolDefinition for AssetCreateTool {
    const NAME: &'static str = "asset_create";
    const DESCRIPTION: &'static str = "Create a new Algorand Standard Asset (ASA)";
    const FAILURE_CONTEXT: &'static str = "Error creating asset";

    type Params = AssetCreateParams;
    type Output = AssetCreated;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all, fields(total = params.total))]
    async fn run(&self, params: AssetCreateParams) -> Result<AssetCreated, ToolError> {
        let request = AssetCreateRequest {
            sender: validate_address("sender", &params.sender)?,
            total: params.total,
            decimals: params.decimals,
            manager: validate_optional_address("manager", params.manager.as_deref())?,
            reserve: validate_optional_address("reserve", params.reserve.as_deref())?,
            freeze: validate_optional_address("freeze", params.freeze.as_deref())?,
            clawback: validate_optional_address("clawback", params.clawback.as_deref())?,
            note: note_bytes(params.note.as_deref()),
            asset_name: non_empty(params.asset_name),
            unit_name: non_empty(params.unit_name),
            url: non_empty(params.url),
            metadata_hash: non_empty(params.metadata_hash),
            default_frozen: params.default_frozen,
        };

        let (network, outcome) =
            submit(&self.registry, TransactionRequest::AssetCreate(request.clone())).await?;
        info!("Asset {:?} created on {}", outcome.asset_id, network);
        Ok(AssetCreated { request, outcome })
    }

    fn render(output: &AssetCreated) -> String {
        let request = &output.request;
        let decimals = match request.decimals {
            Some(d) if d > 0 => format!(" with {} decimals", d),
            _ => String::new(),
        };
        let asset_id = output
            .outcome
            .asset_id
            .map_or_else(|| "Unknown".to_string(), |id| id.to_string());
        let or_unspecified =
            |v: &Option<String>| v.clone().unwrap_or_else(|| "Not specified".to_string());

        let mut lines = vec![
            "Asset Creation Successful:".to_string(),
            String::new(),
            format!("Asset ID: {}", asset_id),
            format!("Creator: {}", request.sender),
            format!("Total Supply: {}{}", request.total, decimals),
            String::new(),
            "Asset Configuration:".to_string(),
            format!("Name: {}", or_unspecified(&request.asset_name)),
            format!("Unit Name: {}", or_unspecified(&request.unit_name)),
            format!("URL: {}", or_unspecified(&request.url)),
            format!(
                "Default Frozen: {}",
                request
                    .default_frozen
                    .map_or_else(|| "Not specified".to_string(), |f| f.to_string())
            ),
            String::new(),
            "Transaction Details:".to_string(),
        ];
        lines.extend(transaction_lines(&output.outcome));
        lines.join("\n")
    }
}
