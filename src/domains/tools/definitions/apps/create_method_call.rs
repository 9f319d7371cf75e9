//! ABI application-create tool definition.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};

use super::abi_arguments;
use super::receipt::{AppAction, AppReceipt};
use super::references::{OnCompleteParam, ProgramParams, ReferenceParams, SchemaParams};
use crate::domains::ledger::{AppCallRequest, OnComplete, TransactionRequest};
use crate::domains::network::NetworkRegistry;
use crate::domains::tools::definitions::common::{submit, validate_address};
use crate::domains::tools::{ToolContext, ToolDefinition, ToolError};

/// Parameters for the ABI create tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppCreateMethodCallParams {
    /// The Algorand address that will create the application.
    pub sender: String,

    #[serde(flatten)]
    pub programs: ProgramParams,

    /// ABI method signature called on creation, e.g. "create(string)void".
    pub method: String,

    /// Method arguments matching the signature; numbers are passed as strings.
    #[serde(default)]
    pub method_args: Option<Vec<String>>,

    #[serde(flatten)]
    pub schema: SchemaParams,

    /// On-completion action (default: NoOp).
    #[serde(default)]
    pub on_complete: Option<OnCompleteParam>,

    #[serde(flatten)]
    pub references: ReferenceParams,
}

pub struct AppCreateMethodCallTool {
    registry: Arc<NetworkRegistry>,
}

#[async_trait]
impl ToolDefinition for AppCreateMethodCallTool {
    const NAME: &'static str = "app_create_method_call";
    const DESCRIPTION: &'static str =
        "Create a new Algorand smart contract application with an ABI method call";
    const FAILURE_CONTEXT: &'static str = "Error creating application";

    type Params = AppCreateMethodCallParams;
    type Output = AppReceipt;

    fn new(context: &ToolContext) -> Self {
        Self {
            registry: context.registry.clone(),
        }
    }

    #[instrument(skip_all, fields(method = %params.method))]
    async fn run(&self, params: AppCreateMethodCallParams) -> Result<AppReceipt, ToolError> {
        let sender = validate_address("sender", &params.sender)?;
        let programs = params.programs.validate()?;
        let args = params.method_args.unwrap_or_default();
        let on_complete: OnComplete = params.on_complete.unwrap_or_default().into();

        let request = AppCallRequest {
            sender: sender.clone(),
            app_id: None,
            on_complete,
            programs: Some(programs),
            schema: params.schema.schema(),
            extra_pages: params.schema.extra_pages,
            arguments: abi_arguments(&params.method, &args)?,
            references: params.references.normalize()?,
        };
        let (network, outcome) = submit(&self.registry, TransactionRequest::AppCall(request)).await?;
        info!("Application {:?} created on {}", outcome.app_id, network);

        Ok(AppReceipt {
            action: AppAction::Create,
            app_id: None,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::ledger::testing::MockNetworks;
    use crate::domains::ledger::{AbiReturn, AppArguments, TransactionOutcome};
    use crate::domains::network::Network;
    use crate::domains::tools::definitions::test_support::{ALICE, call, is_error, text};

    fn args(method: &str) -> serde_json::Value {
        serde_json::json!({
            "sender": ALICE,
            "approvalProgram": "#pragma version 10\nint 1",
            "clearStateProgram": "#pragma version 10\nint 1",
            "method": method,
            "methodArgs": ["hello"]
        })
    }

    #[tokio::test]
    async fn test_create_with_method() {
        let mocks = MockNetworks::new();
        let mut outcome = TransactionOutcome::new("ABICREATE");
        outcome.app_id = Some(2002);
        outcome.abi_return = Some(AbiReturn::Value {
            value: serde_json::json!("hello"),
            return_type: "string".into(),
        });
        mocks.localnet.set_outcome(outcome);

        let result = call::<AppCreateMethodCallTool>(
            &mocks,
            Network::Localnet,
            args("create(string)string"),
        )
        .await;

        assert!(!is_error(&result), "{}", text(&result));
        let Some(TransactionRequest::AppCall(request)) = mocks.localnet.last_request() else {
            panic!("expected an application call");
        };
        assert_eq!(
            request.arguments,
            AppArguments::Abi {
                method: "create(string)string".into(),
                args: vec!["hello".into()],
            }
        );

        let message = text(&result);
        assert!(message.contains("Application ID: 2002"));
        assert!(message.contains("Method Called: create(string)string"));
        assert!(message.contains("Method Return Value:\n\"hello\"\nReturn Type: string"));
    }

    #[tokio::test]
    async fn test_malformed_signature() {
        let mocks = MockNetworks::new();
        let result =
            call::<AppCreateMethodCallTool>(&mocks, Network::Localnet, args("create")).await;

        assert!(is_error(&result));
        assert!(text(&result).starts_with("Error creating application: Invalid arguments: method must be an ABI signature"));
        assert_eq!(mocks.total_calls(), 0);
    }
}
