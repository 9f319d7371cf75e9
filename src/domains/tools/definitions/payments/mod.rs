//! Payment tools.

pub mod send;

pub use send::PaymentSendTool;

use crate::domains::tools::{ToolError, ToolRegistry};

pub fn register<S>(tools: &mut ToolRegistry<S>) -> Result<(), ToolError>
where
    S: Send + Sync + 'static,
{
    tools.register::<PaymentSendTool>()?;
    Ok(())
}
