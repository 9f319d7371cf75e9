//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to domain-specific services.
//!
//! Tools are defined in `domains/tools/definitions/` and routed through the
//! `ToolRouter` built in `domains/tools/router.rs`; resources are served by
//! the `ResourceService`. Both read the same [`NetworkRegistry`], so a
//! network switch is visible to every tool and resource at once.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::error::Error;
use crate::domains::network::NetworkRegistry;
use crate::domains::resources::{ResourceError, ResourceService};
use crate::domains::tools::{ToolContext, build_tool_router};

const INSTRUCTIONS: &str = "Algorand MCP server. Tools cover network selection, accounts, \
payments, Algorand Standard Assets and smart contract applications. Every tool acts on the \
active network (see network_get / network_set and the network:// resources). Operations on \
mainnet move real ALGO.";

/// The main MCP server handler.
///
/// Cloning is cheap: every clone shares the registry, services and router.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Active network and per-network ledger clients.
    registry: Arc<NetworkRegistry>,

    /// Service for handling resource-related requests.
    resource_service: Arc<ResourceService>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a server over `registry`, registering every tool.
    ///
    /// Fails if two tools share a name.
    pub fn new(config: Config, registry: Arc<NetworkRegistry>) -> Result<Self, Error> {
        let config = Arc::new(config);
        let resource_service = Arc::new(ResourceService::new(registry.clone()));
        let tool_router =
            build_tool_router::<Self>(ToolContext::new(registry.clone(), config.clone()))?;

        info!(
            "Initialized {} v{} with {} tools",
            config.server.name,
            config.server.version,
            tool_router.list_all().len()
        );

        Ok(Self {
            config,
            registry,
            resource_service,
            tool_router,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// The shared network registry.
    pub fn registry(&self) -> &Arc<NetworkRegistry> {
        &self.registry
    }

    /// Number of registered tools.
    pub fn tool_count(&self) -> usize {
        self.tool_router.list_all().len()
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        let resources = self.resource_service.list_resources().await;
        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
            meta: None,
        })
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(ListResourceTemplatesResult {
            resource_templates: Vec::new(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.resource_service
            .read_resource(&request.uri)
            .await
            .map_err(|e| match e {
                ResourceError::NotFound(_) => McpError::resource_not_found(e.to_string(), None),
                ResourceError::Internal(_) => McpError::internal_error(e.to_string(), None),
            })
    }
}
