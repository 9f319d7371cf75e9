//! Tool definitions module.
//!
//! One sub-module per feature area, one file per tool. Each sub-module exposes
//! a `register` function that adds its tools to the shared [`ToolRegistry`].

pub mod accounts;
pub mod apps;
pub mod assets;
pub mod common;
pub mod dispenser;
pub mod explorer;
pub mod network;
pub mod payments;

use super::{ToolError, ToolRegistry};

/// Register every module's tools, in a fixed order.
pub fn register_all<S>(tools: &mut ToolRegistry<S>) -> Result<(), ToolError>
where
    S: Send + Sync + 'static,
{
    network::register(tools)?;
    accounts::register(tools)?;
    dispenser::register(tools)?;
    explorer::register(tools)?;
    payments::register(tools)?;
    assets::register(tools)?;
    apps::register(tools)?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use rmcp::model::{CallToolResult, RawContent};

    use crate::core::config::Config;
    use crate::domains::ledger::testing::MockNetworks;
    use crate::domains::network::Network;
    use crate::domains::tools::ToolDefinition;
    use crate::domains::tools::handlers::ToolContext;
    use crate::domains::tools::router::dispatch;

    pub(crate) const ALICE: &str = "ALICEALICEALICEALICEALICEALICEALICEALICEALICEALICEALICEALI";
    pub(crate) const BOB: &str = "BOBBOBBOBBOBBOBBOBBOBBOBBOBBOBBOBBOBBOBBOBBOBBOBBOBBOBBOBB";
    pub(crate) const CAROL: &str = "CAROLCAROLCAROLCAROLCAROLCAROLCAROLCAROLCAROLCAROLCAROLCAR";
    pub(crate) const DAVE: &str = "DAVEDAVEDAVEDAVEDAVEDAVEDAVEDAVEDAVEDAVEDAVEDAVEDAVEDAVEDA";

    /// Context over the mock clients with default configuration.
    pub(crate) fn tool_context(mocks: &MockNetworks, network: Network) -> ToolContext {
        ToolContext::new(mocks.registry(network), Arc::new(Config::default()))
    }

    /// Text of the first content item.
    pub(crate) fn text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(t) => &t.text,
            _ => panic!("expected text content"),
        }
    }

    /// Build `T` against `mocks` and dispatch one call with JSON arguments.
    pub(crate) async fn call<T: ToolDefinition>(
        mocks: &MockNetworks,
        network: Network,
        arguments: serde_json::Value,
    ) -> CallToolResult {
        let tool = T::new(&tool_context(mocks, network));
        let arguments = arguments.as_object().cloned().unwrap();
        dispatch(&tool, arguments).await.unwrap()
    }

    pub(crate) fn is_error(result: &CallToolResult) -> bool {
        result.is_error.unwrap_or(false)
    }
}
