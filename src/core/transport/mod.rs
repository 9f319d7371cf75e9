//! Transport layer for the MCP server.
//!
//! - **STDIO**: standard input/output, the MCP default - feature: `stdio`
//! - **TCP**: one MCP session per accepted socket - feature: `tcp`
//!
//! Logs never go to stdout: with STDIO the protocol owns that stream.

mod config;
mod error;
mod service;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "tcp")]
pub use config::TcpConfig;
