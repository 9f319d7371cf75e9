//! Tool Registry - collects tool routes before the server starts.
//!
//! Each module registrar (`definitions::<module>::register`) adds its tools
//! here. Names are checked for uniqueness as they are added, so a collision
//! surfaces as a startup error instead of one tool silently shadowing another.

use rmcp::handler::server::tool::{ToolRoute, ToolRouter};
use tracing::debug;

use super::ToolError;
use super::handlers::{ToolContext, ToolDefinition};
use super::router::create_route;

/// Tool registry - accumulates routes bound to a shared [`ToolContext`].
pub struct ToolRegistry<S> {
    context: ToolContext,
    names: Vec<&'static str>,
    routes: Vec<ToolRoute<S>>,
}

impl<S> ToolRegistry<S>
where
    S: Send + Sync + 'static,
{
    /// Create an empty registry.
    pub fn new(context: ToolContext) -> Self {
        Self {
            context,
            names: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// Bind `T` to the shared context and add its route.
    pub fn register<T: ToolDefinition>(&mut self) -> Result<&mut Self, ToolError> {
        if self.names.contains(&T::NAME) {
            return Err(ToolError::DuplicateName(T::NAME));
        }
        self.names.push(T::NAME);
        self.routes.push(create_route::<T, S>(&self.context));
        debug!("Registered tool {}", T::NAME);
        Ok(self)
    }

    /// Names of registered tools, in registration order.
    pub fn tool_names(&self) -> &[&'static str] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Consume the registry into an rmcp router.
    pub fn into_router(self) -> ToolRouter<S> {
        self.routes
            .into_iter()
            .fold(ToolRouter::new(), |router, route| router.with_route(route))
    }
}
