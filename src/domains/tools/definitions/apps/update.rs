//! Bare application-update tool definition.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use super::bare_arguments;
use super::receipt::{AppAction, AppReceipt};
use super::references::{ProgramParams, ReferenceParams};
use crate::domains::ledger::{AppCallRequest, OnComplete, TransactionRequest};
use crate::domains::network::NetworkRegistry;
use crate::domains::tools::definitions::common::{parse_id, submit, validate_address};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the bare update tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppUpdateParams {
    /// The Algorand address updating the application (must be authorised by the program).
    pub sender: String,

    /// The ID of the application to update, as a decimal string.
    pub app_id: String,

    #[serde(flatten)]
    pub programs: ProgramParams,

    /// Application arguments: valid base64 is decoded, anything else is sent as UTF-8 bytes.
    /// Words that happen to be valid base64, such as "init" or "vote", are decoded too;
    /// send them base64-encoded ("aW5pdA==" for "init") to pass the literal text.
    #[serde(default)]
    pub app_args: Option<Vec<String>>,

    #[serde(flatten)]
    pub references: ReferenceParams,
}

pub struct AppUpdateTool {
    registry: Arc<NetworkRegistry>,
}

#[async_trait]
impl ToolDefinition for AppUpdateTool {
    const NAME: &'static str = "app_update";
    const DESCRIPTION: &'static str =
        "Update an existing Algorand smart contract application using bare (non-ABI) calls";
    const FAILURE_CONTEXT: &'static str = "Error updating application";

    type Params = AppUpdateParams;
    type Output = AppReceipt;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all, fields(app_id = %params.app_id))]
    async fn run(&self, params: AppUpdateParams) -> Result<AppReceipt, ToolError> {
        let sender = validate_address("sender", &params.sender)?;
        let app_id = parse_id("appId", &params.app_id)?;
        let programs = params.programs.validate()?;
        let args = params.app_args.unwrap_or_default();

        let request = AppCallRequest {
            sender: sender.clone(),
            app_id: Some(app_id),
            on_complete: OnComplete::UpdateApplication,
            programs: Some(programs),
            schema: None,
            extra_pages: None,
            arguments: bare_arguments(&args),
            references: params.references.normalize()?,
        };
        let (_, outcome) = submit(&self.registry, TransactionRequest::AppCall(request)).await?;

        Ok(AppReceipt {
            action: AppAction::Update,
            app_id: Some(app_id),
            sender,
            method: None,
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

    fn args(app_id: &str) -> serde_json::Value {
        serde_json::json!({
            "sender": ALICE,
            "appId": app_id,
            "approvalProgram": "#pragma version 8\nint 1",
            "clearStateProgram": "#pragma version 8\nint 1"
        })
    }

    #[tokio::test]
    async fn test_update_forces_update_application() {
        let mocks = MockNetworks::new();
        let result = call::<AppUpdateTool>(&mocks, Network::Testnet, args("1234")).await;

        assert!(!is_error(&result));
        let Some(TransactionRequest::AppCall(request)) = mocks.testnet.last_request() else {
            panic!("expected an application call");
        };
        assert_eq!(request.app_id, Some(1234));
        assert_eq!(request.on_complete, OnComplete::UpdateApplication);
        assert!(request.programs.is_some());

        let message = text(&result);
        assert!(message.starts_with("Application Updated Successfully:"));
        assert!(message.contains("Application ID: 1234\nUpdater: "));
        assert!(message.contains("On Complete: UpdateApplication"));
    }

    #[tokio::test]
    async fn test_non_numeric_app_id() {
        let mocks = MockNetworks::new();
        let result = call::<AppUpdateTool>(&mocks, Network::Localnet, args("my-app")).await;

        assert!(is_error(&result));
        assert_eq!(
            text(&result),
            "Error updating application: Invalid arguments: appId must be a numeric id, got 'my-app'"
        );
        assert_eq!(mocks.total_calls(), 0);
    }
}
