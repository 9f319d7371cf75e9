//! Tool Router - turns tool definitions into rmcp routes.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::{CallToolResult, JsonObject},
};
use tracing::debug;

use super::definitions;
use super::handlers::{ToolContext, ToolDefinition};
use super::registry::ToolRegistry;
use super::ToolError;

/// Deserialize `arguments` into the tool's parameters and execute it.
///
/// Arguments that do not match the schema are rejected with
/// `invalid_params` before the tool body runs.
pub async fn dispatch<T: ToolDefinition>(
    tool: &T,
    arguments: JsonObject,
) -> Result<CallToolResult, McpError> {
    let params: T::Params = serde_json::from_value(serde_json::Value::Object(arguments))
        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
    debug!("Dispatching tool {}", T::NAME);
    Ok(tool.execute(params).await)
}

/// Create a ToolRoute bound to one instance of `T`.
pub fn create_route<T, S>(context: &ToolContext) -> ToolRoute<S>
where
    T: ToolDefinition,
    S: Send + Sync + 'static,
{
    let tool = Arc::new(T::new(context));
    ToolRoute::new_dyn(T::to_tool(), move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let tool = tool.clone();
        async move { dispatch(tool.as_ref(), args).await }.boxed()
    })
}

/// Build the tool router with every module registered.
pub fn build_tool_router<S>(context: ToolContext) -> Result<ToolRouter<S>, ToolError>
where
    S: Send + Sync + 'static,
{
    let mut tools = ToolRegistry::new(context);
    definitions::register_all(&mut tools)?;
    Ok(tools.into_router())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::ledger::testing::MockNetworks;
    use crate::domains::network::Network;
    use crate::domains::tools::definitions::test_support::tool_context;

    struct TestServer {}

    #[test]
    fn test_build_router() {
        let mocks = MockNetworks::new();
        let router: ToolRouter<TestServer> =
            build_tool_router(tool_context(&mocks, Network::Localnet)).unwrap();
        let tools = router.list_all();
        assert_eq!(tools.len(), 24);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        for expected in [
            "network_get",
            "network_set",
            "network_detect",
            "account_generate",
            "account_get_information",
            "account_from_mnemonic",
            "dispenser_ensure_funded",
            "explorer_get_url",
            "payment_send",
            "asset_create",
            "asset_config",
            "asset_transfer",
            "asset_opt_in",
            "asset_opt_out",
            "asset_freeze",
            "asset_destroy",
            "app_create",
            "app_update",
            "app_delete",
            "app_call",
            "app_create_method_call",
            "app_update_method_call",
            "app_delete_method_call",
            "app_call_method_call",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn test_every_tool_has_object_schema() {
        let mocks = MockNetworks::new();
        let router: ToolRouter<TestServer> =
            build_tool_router(tool_context(&mocks, Network::Localnet)).unwrap();
        for tool in router.list_all() {
            assert_eq!(
                tool.input_schema.get("type").and_then(|t| t.as_str()),
                Some("object"),
                "{} schema is not an object",
                tool.name
            );
            assert!(tool.description.is_some());
        }
    }
}
