//! ABI application-update tool definition.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use super::abi_arguments;
use super::receipt::{AppAction, AppReceipt};
use super::references::{ProgramParams, ReferenceParams};
use crate::domains::ledger::{AppCallRequest, OnComplete, TransactionRequest};
use crate::domains::network::NetworkRegistry;
use crate::domains::tools::definitions::common::{parse_id, submit, validate_address};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the ABI update tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppUpdateMethodCallParams {
    /// The Algorand address updating the application.
    pub sender: String,

    /// The ID of the application to update, as a decimal string.
    pub app_id: String,

    #[serde(flatten)]
    pub programs: ProgramParams,

    /// ABI method signature routed by the update, e.g. "update()void".
    pub method: String,

    /// Method arguments matching the signature; numbers are passed as strings.
    #[serde(default)]
    pub method_args: Option<Vec<String>>,

    #[serde(flatten)]
    pub references: ReferenceParams,
}

pub struct AppUpdateMethodCallTool {
    registry: Arc<NetworkRegistry>,
}

#[async_trait]
impl ToolDefinition for AppUpdateMethodCallTool {
    const NAME: &'static str = "app_update_method_call";
    const DESCRIPTION: &'static str =
        "Update an existing Algorand smart contract application with an ABI method call";
    const FAILURE_CONTEXT: &'static str = "Error updating application";

    type Params = AppUpdateMethodCallParams;
    type Output = AppReceipt;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all, fields(app_id = %params.app_id, method = %params.method))]
    async fn run(&self, params: AppUpdateMethodCallParams) -> Result<AppReceipt, ToolError> {
        let sender = validate_address("sender", &params.sender)?;
        let app_id = parse_id("appId", &params.app_id)?;
        let programs = params.programs.validate()?;
        let args = params.method_args.unwrap_or_default();

        let request = AppCallRequest {
            sender: sender.clone(),
            app_id: Some(app_id),
            on_complete: OnComplete::UpdateApplication,
            programs: Some(programs),
            schema: None,
            extra_pages: None,
            arguments: abi_arguments(&params.method, &args)?,
            references: params.references.normalize()?,
        };
        let (_, outcome) = submit(&self.registry, TransactionRequest::AppCall(request)).await?;

        Ok(AppReceipt {
            action: AppAction::Update,
            app_id: Some(app_id),
            sender,
            method: Some(params.method),
            arguments: args,
            on_complete: OnComplete::UpdateApplication,
            outcome,
        })
    }

    fn render(output: &AppReceipt) -> String {
        output.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::ledger::testing::MockNetworks;
    use crate::domains::network::Network;
    use crate::domains::tools::definitions::test_support::{ALICE, call, is_error, text};

    #[tokio::test]
    async fn test_update_with_method() {
        let mocks = MockNetworks::new();
        let result = call::<AppUpdateMethodCallTool>(
            &mocks,
            Network::Localnet,
            serde_json::json!({
                "sender": ALICE,
                "appId": "12",
                "approvalProgram": "#pragma version 9\nint 1",
                "clearStateProgram": "#pragma version 9\nint 1",
                "method": "update()void"
            }),
        )
        .await;

        assert!(!is_error(&result), "{}", text(&result));
        let Some(TransactionRequest::AppCall(request)) = mocks.localnet.last_request() else {
            panic!("expected an application call");
        };
        assert_eq!(request.on_complete, OnComplete::UpdateApplication);
        assert!(text(&result).contains("Method Called: update()void\nArguments: None"));
    }

    #[tokio::test]
    async fn test_clear_program_pragma_checked() {
        let mocks = MockNetworks::new();
        let result = call::<AppUpdateMethodCallTool>(
            &mocks,
            Network::Localnet,
            serde_json::json!({
                "sender": ALICE,
                "appId": "12",
                "approvalProgram": "#pragma version 9\nint 1",
                "clearStateProgram": "int 1",
                "method": "update()void"
            }),
        )
        .await;

        assert!(is_error(&result));
        assert_eq!(mocks.total_calls(), 0);
    }
}
