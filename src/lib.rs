//! Algorand MCP Server Library
//!
//! This crate exposes Algorand operations (network selection, accounts,
//! payments, Algorand Standard Assets and smart contract applications) to MCP
//! clients as tools, plus a read-only `network://` resource surface.
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling, the main server and transports
//! - **domains**: Business logic organized by bounded contexts
//!   - **network**: The active-network registry shared by every handler
//!   - **ledger**: The `LedgerClient` boundary and its algod implementation
//!   - **tools**: MCP tools that can be executed by clients
//!   - **resources**: Data resources that can be read by clients
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use algorand_mcp_server::core::{Config, McpServer, TransportService};
//! use algorand_mcp_server::domains::network::NetworkRegistry;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let registry = Arc::new(NetworkRegistry::from_config(&config.networks)?);
//!     let server = McpServer::new(config.clone(), registry)?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
