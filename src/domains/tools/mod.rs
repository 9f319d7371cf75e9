//! Tools domain module.
//!
//! Tools are the operations MCP clients invoke: network selection, account
//! lookups, payments, assets and applications. Each tool is a
//! [`ToolDefinition`] that validates its typed parameters, delegates to the
//! active network's ledger client and renders a text result.
//!
//! ## Architecture
//!
//! - `definitions/` - Tool implementations, one sub-module per feature area
//! - `handlers.rs` - The `ToolDefinition` trait and shared `ToolContext`
//! - `registry.rs` - Collects routes and rejects duplicate names
//! - `router.rs` - Argument dispatch and the rmcp `ToolRouter` builder
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a file in the matching `definitions/<area>/` module
//! 2. Define params, output, `run()` and `render()`
//! 3. Add it to that module's `register` function
//!
//! The server picks it up through `build_tool_router`.

pub mod definitions;
mod error;
mod handlers;
mod registry;
pub mod router;

pub use error::ToolError;
pub use handlers::*;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
