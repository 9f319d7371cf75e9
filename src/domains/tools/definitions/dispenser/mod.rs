//! Dispenser tools (LocalNet only).

pub mod ensure_funded;

pub use ensure_funded::DispenserEnsureFundedTool;

use crate::domains::tools::{ToolError, ToolRegistry};

pub fn register<S>(tools: &mut ToolRegistry<S>) -> Result<(), ToolError>
where
    S: Send + Sync + 'static,
{
    tools.register::<DispenserEnsureFundedTool>()?;
    Ok(())
}
