//! Tool Registry - central registration and dispatch for all tools.
//!
//! The registry is built once during startup by [`build_tool_registry`] and
//! is read-only afterwards, so the server shares it behind an `Arc` without
//! any locking.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::definitions::{EchoTool, WeatherTool};
use super::error::{ToolError, ToolResult};
use super::handlers::{ToolDescriptor, ToolHandler};
use crate::domains::weather::WeatherProvider;

/// A registered tool: the descriptor captured at registration and its handler.
struct RegisteredTool {
    descriptor: ToolDescriptor,
    handler: Arc<dyn ToolHandler>,
}

/// Tool registry - maps tool names to handlers, in registration order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Names are case-sensitive and must be unique.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) -> ToolResult<()> {
        let descriptor = handler.descriptor();
        if self.by_name.contains_key(&descriptor.name) {
            warn!("Duplicate tool registration: {}", descriptor.name);
            return Err(ToolError::Duplicate(descriptor.name));
        }

        debug!("Registered tool: {}", descriptor.name);
        self.by_name.insert(descriptor.name.clone(), self.tools.len());
        self.tools.push(RegisteredTool {
            descriptor,
            handler,
        });
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_tool(mut self, handler: Arc<dyn ToolHandler>) -> ToolResult<Self> {
        self.register(handler)?;
        Ok(self)
    }

    /// Descriptors of all tools, in registration order.
    pub fn list(&self) -> Vec<&ToolDescriptor> {
        self.tools.iter().map(|t| &t.descriptor).collect()
    }

    /// Look up a tool by exact name.
    pub fn get(&self, name: &str) -> ToolResult<Arc<dyn ToolHandler>> {
        self.by_name
            .get(name)
            .map(|&index| Arc::clone(&self.tools[index].handler))
            .ok_or_else(|| ToolError::not_found(name))
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools
            .iter()
            .map(|t| t.descriptor.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Build the registry with every tool this server exposes.
///
/// This is the single place where tools are registered.
pub fn build_tool_registry(weather: Arc<dyn WeatherProvider>) -> ToolResult<ToolRegistry> {
    ToolRegistry::new()
        .with_tool(Arc::new(EchoTool))?
        .with_tool(Arc::new(WeatherTool::new(weather)))
}
