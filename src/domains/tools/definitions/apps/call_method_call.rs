//! ABI application-call tool definition.
//!
//! The recommended way to call ARC-4 contracts: arguments are encoded and the
//! return value decoded by the ledger client against `method`.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use super::abi_arguments;
use super::receipt::{AppAction, AppReceipt};
use super::references::{OnCompleteParam, ReferenceParams};
use crate::domains::ledger::{AppCallRequest, OnComplete, TransactionRequest};
use crate::domains::network::NetworkRegistry;
use crate::domains::tools::definitions::common::{parse_id, submit, validate_address};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the ABI call tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppCallMethodCallParams {
    /// The Algorand address calling the application.
    pub sender: String,

    /// The ID of the application to call, as a decimal string (e.g. "12345").
    pub app_id: String,

    /// ABI method signature without spaces, e.g. "add(uint64,uint64)uint64" or "greet()string".
    pub method: String,

    /// Method arguments matching the signature. Pass numbers as strings ("123"); base64 is accepted for byte strings.
    #[serde(default)]
    pub method_args: Option<Vec<String>>,

    /// On-completion action (default: NoOp). Use OptIn for a first interaction.
    #[serde(default)]
    pub on_complete: Option<OnCompleteParam>,

    #[serde(flatten)]
    pub references: ReferenceParams,
}

pub struct AppCallMethodCallTool {
    registry: Arc<NetworkRegistry>,
}

#[async_trait]
impl ToolDefinition for AppCallMethodCallTool {
    const NAME: &'static str = "app_call_method_call";
    const DESCRIPTION: &'static str = "Call a method on an Algorand smart contract using ABI (Application Binary Interface) - recommended for most application calls";
    const FAILURE_CONTEXT: &'static str = "Error calling application method";

    type Params = AppCallMethodCallParams;
    type Output = AppReceipt;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all, fields(app_id = %params.app_id, method = %params.method))]
    async fn run(&self, params: AppCallMethodCallParams) -> Result<AppReceipt, ToolError> {
        let sender = validate_address("sender", &params.sender)?;
        let app_id = parse_id("appId", &params.app_id)?;
        let args = params.method_args.unwrap_or_default();
        let on_complete: OnComplete = params.on_complete.unwrap_or_default().into();

        let request = AppCallRequest {
            sender: sender.clone(),
            app_id: Some(app_id),
            on_complete,
            programs: None,
            schema: None,
            extra_pages: None,
            arguments: abi_arguments(&params.method, &args)?,
            references: params.references.normalize()?,
        };
        let (_, outcome) = submit(&self.registry, TransactionRequest::AppCall(request)).await?;

        Ok(AppReceipt {
            action: AppAction::Call,
            app_id: Some(app_id),
            sender,
            method: Some(params.method),
            arguments: args,
            on_complete,
            outcome,
        })
    }

    fn render(output: &AppReceipt) -> String {
        output.render()
    }
}
