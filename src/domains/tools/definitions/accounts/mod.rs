//! Account tools: generate, inspect and restore accounts.

pub mod from_mnemonic;
pub mod generate;
pub mod information;

pub use from_mnemonic::AccountFromMnemonicTool;
pub use generate::AccountGenerateTool;
pub use information::AccountInformationTool;

use crate::domains::tools::{ToolError, ToolRegistry};

pub fn register<S>(tools: &mut ToolRegistry<S>) -> Result<(), ToolError>
where
    S: Send + Sync + 'static,
{
    tools
        .register::<AccountGenerateTool>()?
        .register::<AccountInformationTool>()?
        .register::<AccountFromMnemonicTool>()?;
    Ok(())
}
