//! Network tools: inspect, switch and infer the active network.

pub mod detect;
pub mod get;
pub mod set;

pub use detect::NetworkDetectTool;
pub use get::NetworkGetTool;
pub use set::NetworkSetTool;

use crate::domains::tools::{ToolError, ToolRegistry};

pub fn register<S>(tools: &mut ToolRegistry<S>) -> Result<(), ToolError>
where
    S: Send + Sync + 'static,
{
    tools
        .register::<NetworkGetTool>()?
        .register::<NetworkSetTool>()?
        .register::<NetworkDetectTool>()?;
    Ok(())
}
