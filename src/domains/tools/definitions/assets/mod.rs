//! Algorand Standard Asset tools.
//!
//! Each tool marshals its parameters into one [`TransactionRequest`] variant
//! and reports the confirmation.
//!
//! [`TransactionRequest`]: crate::domains::ledger::TransactionRequest

pub mod config;
pub mod create;
pub mod destroy;
pub mod freeze;
pub mod opt_in;
pub mod opt_out;
pub mod transfer;

pub use config::AssetConfigTool;
pub use create::AssetCreateTool;
pub use destroy::AssetDestroyTool;
pub use freeze::AssetFreezeTool;
pub use opt_in::AssetOptInTool;
pub use opt_out::AssetOptOutTool;
pub use transfer::AssetTransferTool;

use crate::domains::tools::{ToolError, ToolRegistry};

pub fn register<S>(tools: &mut ToolRegistry<S>) -> Result<(), ToolError>
where
    S: Send + Sync + 'static,
{
    tools
        .register::<AssetCreateTool>()?
        .register::<AssetConfigTool>()?
        .register::<AssetTransferTool>()?
        .register::<AssetOptInTool>()?
        .register::<AssetOptOutTool>()?
        .register::<AssetFreezeTool>()?
        .register::<AssetDestroyTool>()?;
    Ok(())
}
