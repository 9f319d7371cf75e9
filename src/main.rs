//! MCP Server Entry Point
//!
//! Loads configuration, initializes logging on stderr, builds one ledger
//! client per network and serves MCP on the configured transport.

use std::sync::Arc;

use anyhow::Result;
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

use algorand_mcp_server::core::{Config, McpServer, TransportService};
use algorand_mcp_server::domains::network::NetworkRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    // An invalid configuration must stop startup before any transport opens.
    let config = Config::from_env()?;

    init_logging(&config.logging.level);

    info!(
        "Starting {} v{} (default network: {})",
        config.server.name, config.server.version, config.networks.default_network
    );

    let registry = Arc::new(NetworkRegistry::from_config(&config.networks)?);
    let server = McpServer::new(config.clone(), registry)?;

    let transport = TransportService::new(config.transport);
    if let Err(e) = transport.run(server).await {
        error!("Transport failed: {}", e);
        return Err(e.into());
    }

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Output goes to stderr; stdout belongs to the STDIO transport.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
