//! Explorer tools.

pub mod get_url;

pub use get_url::ExplorerGetUrlTool;

use crate::domains::tools::{ToolError, ToolRegistry};

pub fn register<S>(tools: &mut ToolRegistry<S>) -> Result<(), ToolError>
where
    S: Send + Sync + 'static,
{
    tools.register::<ExplorerGetUrlTool>()?;
    Ok(())
}
