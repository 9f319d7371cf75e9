//! ABI application-delete tool definition.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use super::abi_arguments;
use super::receipt::{AppAction, AppReceipt};
use super::references::ReferenceParams;
use crate::domains::ledger::{AppCallRequest, OnComplete, TransactionRequest};
use crate::domains::network::NetworkRegistry;
use crate::domains::tools::definitions::common::{parse_id, submit, validate_address};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the ABI delete tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppDeleteMethodCallParams {
    /// The Algorand address deleting the application.
    pub sender: String,

    /// The ID of the application to delete, as a decimal string.
    pub app_id: String,

    /// ABI method signature routed by the delete, e.g. "delete()void".
    pub method: String,

    /// Method arguments matching the signature.
    #[serde(default)]
    pub method_args: Option<Vec<String>>,

    #[serde(flatten)]
    pub references: ReferenceParams,
}

pub struct AppDeleteMethodCallTool {
    registry: Arc<NetworkRegistry>,
}

#[async_trait]
impl ToolDefinition for AppDeleteMethodCallTool {
    const NAME: &'static str = "app_delete_method_call";
    const DESCRIPTION: &'static str =
        "Delete an Algorand smart contract application with an ABI method call";
    const FAILURE_CONTEXT: &'static str = "Error deleting application";

    type Params = AppDeleteMethodCallParams;
    type Output = AppReceipt;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all, fields(app_id = %params.app_id, method = %params.method))]
    async fn run(&self, params: AppDeleteMethodCallParams) -> Result<AppReceipt, ToolError> {
        let sender = validate_address("sender", &params.sender)?;
        let app_id = parse_id("appId", &params.app_id)?;
        let args = params.method_args.unwrap_or_default();

        let request = AppCallRequest {
            sender: sender.clone(),
            app_id: Some(app_id),
            on_complete: OnComplete::DeleteApplication,
            programs: None,
            schema: None,
            extra_pages: None,
            arguments: abi_arguments(&params.method, &args)?,
            references: params.references.normalize()?,
        };
        let (_, outcome) = submit(&self.registry, TransactionRequest::AppCall(request)).await?;

        Ok(AppReceipt {
            action: AppAction::Delete,
            app_id: Some(app_id),
            sender,
            method: Some(params.method),
            arguments: args,
            on_complete: OnComplete::DeleteApplication,
            outcome,
        })
    }

    fn render(output: &AppReceipt) -> String {
        output.render()
    }
}
