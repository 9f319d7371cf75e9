//! Tool handler contract.
//!
//! Every tool is a small struct built once from the shared [`ToolContext`]
//! and implementing [`ToolDefinition`]. The trait separates the typed result
//! of a call (`run`) from its text rendering (`render`), and the provided
//! `execute` turns either outcome into a `CallToolResult` so that no fault
//! ever escapes a handler.

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{CallToolResult, Content, Tool};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::ToolError;
use super::definitions::common::failure_result;
use crate::core::config::Config;
use crate::domains::network::NetworkRegistry;

/// Shared state handed to every tool at registration time.
#[derive(Clone)]
pub struct ToolContext {
    pub registry: Arc<NetworkRegistry>,
    pub config: Arc<Config>,
}

impl ToolContext {
    pub fn new(registry: Arc<NetworkRegistry>, config: Arc<Config>) -> Self {
        Self { registry, config }
    }
}

/// One remote-callable operation.
#[async_trait]
pub trait ToolDefinition: Send + Sync + Sized + 'static {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    /// Prefix of the error text returned when the call fails.
    const FAILURE_CONTEXT: &'static str;

    /// Schema-validated input.
    type Params: DeserializeOwned + JsonSchema + Send + 'static;

    /// Typed result, rendered to text only at the boundary.
    type Output: Send;

    /// Bind the tool to the shared context.
    fn new(context: &ToolContext) -> Self;

    /// Validate, delegate and return the typed result.
    async fn run(&self, params: Self::Params) -> Result<Self::Output, ToolError>;

    /// Human-readable text for a successful call.
    fn render(output: &Self::Output) -> String;

    /// Failure prefix for a particular call.
    fn failure_context(_params: &Self::Params) -> String {
        Self::FAILURE_CONTEXT.to_string()
    }

    /// Run the tool and convert the outcome into an MCP result.
    async fn execute(&self, params: Self::Params) -> CallToolResult {
        let context = Self::failure_context(&params);
        match self.run(params).await {
            Ok(output) => CallToolResult::success(vec![Content::text(Self::render(&output))]),
            Err(e) => {
                warn!(tool = Self::NAME, "{}: {}", context, e);
                failure_result(&context, &e)
            }
        }
    }

    /// Create a Tool model for this tool (metadata).
    fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<Self::Params>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}
