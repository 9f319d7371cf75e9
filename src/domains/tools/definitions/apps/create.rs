//! Bare application-create tool definition.
//!
//! For raw TEAL without ARC-4 routing.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::bare_arguments;
use super::receipt::{AppAction, AppReceipt};
use super::references::{OnCompleteParam, ProgramParams, ReferenceParams, SchemaParams};
use crate::domains::ledger::{AppCallRequest, OnComplete, TransactionRequest};
use crate::domains::network::NetworkRegistry;
use crate::domains::tools::definitions::common::{submit, validate_address};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the bare create tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppCreateParams {
    /// The Algorand address that will create the application.
    pub sender: String,

    #[serde(flatten)]
    pub programs: ProgramParams,

    /// Application arguments: valid base64 is decoded, anything else is sent as UTF-8 bytes.
    /// Words that happen to be valid base64, such as "init" or "vote", are decoded too;
    /// send them base64-encoded ("aW5pdA==" for "init") to pass the literal text.
    #[serde(default)]
    pub app_args: Option<Vec<String>>,

    #[serde(flatten)]
    pub schema: SchemaParams,

    /// On-completion action (default: NoOp).
    #[serde(default)]
    pub on_complete: Option<OnCompleteParam>,

    #[serde(flatten)]
    pub references: ReferenceParams,
}

pub struct AppCreateTool {
    registry: Arc<NetworkRegistry>,
}

#[async_trait]
impl ToolDefinition for AppCreateTool {
    const NAME: &'static str = "app_create";
    const DESCRIPTION: &'static str = "Create a new Algorand smart contract application using bare (non-ABI) calls - useful for raw TEAL without ARC-4/ABI requirements";
    const FAILURE_CONTEXT: &'static str = "Error creating application";

    type Params = AppCreateParams;
    type Output = AppReceipt;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all)]
    async fn run(&self, params: AppCreateParams) -> Result<AppReceipt, ToolError> {
        let sender = validate_address("sender", &params.sender)?;
        let programs = params.programs.validate()?;
        let args = params.app_args.unwrap_or_default();
        let on_complete: OnComplete = params.on_complete.unwrap_or_default().into();

        let request = AppCallRequest {
            sender: sender.clone(),
            app_id: None,
            on_complete,
            programs: Some(programs),
            schema: params.schema.schema(),
            extra_pages: params.schema.extra_pages,
            arguments: bare_arguments(&args),
            references: params.references.normalize()?,
        };
        let (network, outcome) = submit(&self.registry, TransactionRequest::AppCall(request)).await?;
        info!("Application {:?} created on {}", outcome.app_id, network);

        Ok(AppReceipt {
            action: AppAction::Create,
            app_id: None,
            sender,
            method: None,
            arguments: args,
            on_complete,
            outcome,
        })
    }

    fn render(output: &AppReceipt) -> String {
        output.render()
    }
}
