//! Bare application-delete tool definition.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use super::bare_arguments;
use super::receipt::{AppAction, AppReceipt};
use super::references::ReferenceParams;
use crate::domains::ledger::{AppCallRequest, OnComplete, TransactionRequest};
use crate::domains::network::NetworkRegistry;
use crate::domains::tools::definitions::common::{parse_id, submit, validate_address};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the bare delete tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppDeleteParams {
    /// The Algorand address deleting the application.
    pub sender: String,

    /// The ID of the application to delete, as a decimal string.
    pub app_id: String,

    /// Application arguments: valid base64 is decoded, anything else is sent as UTF-8 bytes.
    /// Words that happen to be valid base64, such as "init" or "vote", are decoded too;
    /// send them base64-encoded ("aW5pdA==" for "init") to pass the literal text.
    #[serde(default)]
    pub app_args: Option<Vec<String>>,

    #[serde(flatten)]
    pub references: ReferenceParams,
}

pub struct AppDeleteTool {
    registry: Arc<NetworkRegistry>,
}

#[async_trait]
impl ToolDefinition for AppDeleteTool {
    const NAME: &'static str = "app_delete";
    const DESCRIPTION: &'static str =
        "Delete an Algorand smart contract application using bare (non-ABI) calls";
    const FAILURE_CONTEXT: &'static str = "Error deleting application";

    type Params = AppDeleteParams;
    type Output = AppReceipt;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all, fields(app_id = %params.app_id))]
    async fn run(&self, params: AppDeleteParams) -> Result<AppReceipt, ToolError> {
        let sender = validate_address("sender", &params.sender)?;
        let app_id = parse_id("appId", &params.app_id)?;
        let args = params.app_args.unwrap_or_default();

        let request = AppCallRequest {
            sender: sender.clone(),
            app_id: Some(app_id),
            on_complete: OnComplete::DeleteApplication,
            programs: None,
            schema: None,
            extra_pages: None,
            arguments: bare_arguments(&args),
            references: params.references.normalize()?,
        };
        let (_, outcome) = submit(&self.registry, TransactionRequest::AppCall(request)).await?;

        Ok(AppReceipt {
            action: AppAction::Delete,
            app_id: Some(app_id),
            sender,
            method: None,
            arguments: args,
            on_complete: OnComplete::DeleteApplication,
            outcome,
        })
    }

    fn render(output: &AppReceipt) -> String {
        output.render()
    }
}
