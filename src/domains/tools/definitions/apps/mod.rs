//! Application (smart contract) tools.
//!
//! Bare tools pass raw arguments; `*_method_call` tools route through an
//! ARC-4 method signature. All of them share [`references`] for parameter
//! normalisation and [`receipt`] for the result text.

pub mod call;
pub mod call_method_call;
pub mod create;
pub mod create_method_call;
pub mod delete;
pub mod delete_method_call;
pub mod receipt;
pub mod references;
pub mod update;
pub mod update_method_call;

pub use call::AppCallTool;
pub use call_method_call::AppCallMethodCallTool;
pub use create::AppCreateTool;
pub use create_method_call::AppCreateMethodCallTool;
pub use delete::AppDeleteTool;
pub use delete_method_call::AppDeleteMethodCallTool;
pub use update::AppUpdateTool;
pub use update_method_call::AppUpdateMethodCallTool;

use crate::domains::ledger::AppArguments;
use crate::domains::tools::{ToolError, ToolRegistry};

use references::{decode_app_arg, validate_method_signature};

pub fn register<S>(tools: &mut ToolRegistry<S>) -> Result<(), ToolError>
where
    S: Send + Sync + 'static,
{
    tools
        .register::<AppCreateTool>()?
        .register::<AppUpdateTool>()?
        .register::<AppDeleteTool>()?
        .register::<AppCallTool>()?
        .register::<AppCreateMethodCallTool>()?
        .register::<AppUpdateMethodCallTool>()?
        .register::<AppDeleteMethodCallTool>()?
        .register::<AppCallMethodCallTool>()?;
    Ok(())
}

/// Decode raw application arguments.
pub(crate) fn bare_arguments(args: &[String]) -> AppArguments {
    AppArguments::Bare(args.iter().map(|a| decode_app_arg(a)).collect())
}

/// Check the method signature and pair it with its arguments.
pub(crate) fn abi_arguments(method: &str, args: &[String]) -> Result<AppArguments, ToolError> {
    Ok(AppArguments::Abi {
        method: validate_method_signature(method)?,
        args: args.to_vec(),
    })
}
