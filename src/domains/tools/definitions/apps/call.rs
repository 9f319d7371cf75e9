//! Bare application-call tool definition.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use super::bare_arguments;
use super::receipt::{AppAction, AppReceipt};
use super::references::{OnCompleteParam, ReferenceParams};
use crate::domains::ledger::{AppCallRequest, OnComplete, TransactionRequest};
use crate::domains::network::NetworkRegistry;
use crate::domains::tools::definitions::common::{parse_id, submit, validate_address};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the bare call tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppCallParams {
    /// The Algorand address calling the application.
    pub sender: String,

    /// The ID of the application to call, as a decimal string.
    pub app_id: String,

    /// Application arguments: valid base64 is decoded, anything else is sent as UTF-8 bytes.
    /// Words that happen to be valid base64, such as "init" or "vote", are decoded too;
    /// send them base64-encoded ("aW5pdA==" for "init") to pass the literal text.
    #[serde(default)]
    pub app_args: Option<Vec<String>>,

    /// On-completion action (default: NoOp). Use OptIn for a first interaction.
    #[serde(default)]
    pub on_complete: Option<OnCompleteParam>,

    #[serde(flatten)]
    pub references: ReferenceParams,
}

pub struct AppCallTool {
    registry: Arc<NetworkRegistry>,
}

#[async_trait]
impl ToolDefinition for AppCallTool {
    const NAME: &'static str = "app_call";
    const DESCRIPTION: &'static str =
        "Call an Algorand smart contract application with raw (non-ABI) arguments";
    const FAILURE_CONTEXT: &'static str = "Error calling application";

    type Params = AppCallParams;
    type Output = AppReceipt;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all, fields(app_id = %params.app_id))]
    async fn run(&self, params: AppCallParams) -> Result<AppReceipt, ToolError> {
        let sender = validate_address("sender", &params.sender)?;
        let app_id = parse_id("appId", &params.app_id)?;
        let args = params.app_args.unwrap_or_default();
        let on_complete: OnComplete = params.on_complete.unwrap_or_default().into();

        let request = AppCallRequest {
            sender: sender.clone(),
            app_id: Some(app_id),
            on_complete,
            programs: None,
            schema: None,
            extra_pages: None,
            arguments: bare_arguments(&args),
            references: params.references.normalize()?,
        };
        let (_, outcome) = submit(&self.registry, TransactionRequest::AppCall(request)).await?;

        Ok(AppReceipt {
            action: AppAction::Call,
            app_id: Some(app_id),
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

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::handler::server::tool::cached_schema_for_type;

    use crate::domains::ledger::testing::MockNetworks;
    use crate::domains::network::Network;
    use crate::domains::tools::definitions::test_support::{
        ALICE, BOB, call, is_error, text, tool_context,
    };
    use crate::domains::tools::router::dispatch;

    #[tokio::test]
    async fn test_call_with_references_and_lease() {
        let mocks = MockNetworks::new();
        let result = call::<AppCallTool>(
            &mocks,
            Network::Localnet,
            serde_json::json!({
                "sender": ALICE,
                "appId": "42",
                "appArgs": ["increment"],
                "onComplete": "CloseOut",
                "accountReferences": [BOB],
                "assetReferences": ["10", "11"],
                "boxReferences": [{ "name": "counter", "appId": "43" }],
                "lease": "bGVhc2U="
            }),
        )
        .await;

        assert!(!is_error(&result), "{}", text(&result));
        let Some(TransactionRequest::AppCall(request)) = mocks.localnet.last_request() else {
            panic!("expected an application call");
        };
        assert_eq!(request.on_complete, OnComplete::CloseOut);
        assert_eq!(request.references.accounts, vec![BOB.to_string()]);
        assert_eq!(request.references.assets, vec![10, 11]);
        assert_eq!(request.references.boxes[0].app_id, 43);
        assert_eq!(&request.references.lease.unwrap()[..5], b"lease");
        assert!(text(&result).starts_with("Application Call Successful:"));
    }

    #[test]
    fn test_app_args_schema_warns_about_base64_words() {
        let schema = cached_schema_for_type::<AppCallParams>();
        let description = schema["properties"]["appArgs"]["description"]
            .as_str()
            .unwrap();
        assert!(description.contains("\"init\" or \"vote\""));
        assert!(description.contains("aW5pdA=="));
    }

    #[tokio::test]
    async fn test_unknown_on_complete_fails_schema() {
        let mocks = MockNetworks::new();
        let tool = AppCallTool::new(&tool_context(&mocks, Network::Localnet));
        let args = serde_json::json!({
            "sender": ALICE,
            "appId": "42",
            "onComplete": "DeleteApplication"
        });

        assert!(dispatch(&tool, args.as_object().cloned().unwrap()).await.is_err());
        assert_eq!(mocks.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_argument_gets_tip() {
        let mocks = MockNetworks::new();
        mocks
            .localnet
            .fail_with("logic eval error: invalid ApplicationArgs index 0");
        let result = call::<AppCallTool>(
            &mocks,
            Network::Localnet,
            serde_json::json!({ "sender": ALICE, "appId": "42" }),
        )
        .await;

        assert!(is_error(&result));
        assert!(text(&result).contains("\n\nTip: This error typically occurs"));
    }
}
