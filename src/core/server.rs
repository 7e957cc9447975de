//! MCP Server implementation and JSON-RPC dispatch.
//!
//! [`McpServer`] owns the read-only tool registry and turns one JSON-RPC
//! message into at most one response. It keeps no state between requests,
//! so transports clone it freely and call it concurrently.
//!
//! Error mapping happens here and only here:
//!
//! | Failure                               | Outcome                 |
//! |---------------------------------------|-------------------------|
//! | body is not JSON                      | `-32700`                |
//! | bad envelope                          | `-32600`                |
//! | unknown method                        | `-32601`                |
//! | unknown tool, bad `tools/call` params | `-32602`                |
//! | tool rejected its arguments           | `-32602`, tool message  |
//! | tool failed internally or panicked    | `-32603`, generic text  |
//! | weather provider failure              | success, in-band error  |

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Value, json};
use tracing::{debug, error, info, instrument, warn};

use super::config::Config;
use super::context::CallContext;
use super::error::Result;
use super::protocol::{JsonRpcRequest, JsonRpcResponse};
use crate::domains::tools::{CallToolResult, ToolError, ToolRegistry, build_tool_registry};
use crate::domains::weather::OpenMeteoClient;

/// Protocol versions this server understands, newest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];

const INSTRUCTIONS: &str = "This server exposes two tools: `echo` returns its message unchanged \
    and `getWeather` returns current conditions for a latitude/longitude pair.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Registered tools, immutable after construction.
    tools: Arc<ToolRegistry>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// Builds the Open-Meteo client and registers every tool. Fails on an
    /// invalid configuration or a duplicate tool name.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let weather = Arc::new(OpenMeteoClient::new(config.weather.base_url.clone())?);
        let tools = build_tool_registry(weather)?;

        Ok(Self::with_registry(config, tools))
    }

    /// Create a server around an already built registry.
    pub fn with_registry(config: Config, tools: ToolRegistry) -> Self {
        info!("Serving {} tool(s): {}", tools.len(), tools.tool_names().join(", "));
        Self {
            config: Arc::new(config),
            tools: Arc::new(tools),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// A fresh context carrying the configured per-call deadline.
    pub fn new_call_context(&self) -> CallContext {
        CallContext::with_timeout(self.config.weather.timeout())
    }

    // ========================================================================
    // Tool access
    // ========================================================================

    /// Names of the registered tools, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.tool_names()
    }

    /// List all available tools as `tools/list` entries.
    pub fn list_tools(&self) -> Vec<Value> {
        self.tools
            .list()
            .into_iter()
            .map(|descriptor| json!(descriptor))
            .collect()
    }

    /// Call a tool by name.
    ///
    /// A panicking tool is reported as [`ToolError::Internal`].
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
        ctx: &CallContext,
    ) -> std::result::Result<String, ToolError> {
        let tool = self.tools.get(name)?;
        AssertUnwindSafe(tool.call(arguments, ctx))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Err(ToolError::internal(format!("tool '{}' panicked", name))))
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Handle one raw JSON-RPC message.
    ///
    /// Returns `None` for notifications, which get no response.
    pub async fn handle_message(&self, raw: &[u8], ctx: &CallContext) -> Option<JsonRpcResponse> {
        match JsonRpcRequest::parse(raw) {
            Ok(request) => self.handle_request(request, ctx).await,
            Err(response) => {
                warn!("Rejected malformed message");
                Some(response)
            }
        }
    }

    /// Handle one validated request.
    #[instrument(skip_all, fields(method = %request.method))]
    pub async fn handle_request(
        &self,
        request: JsonRpcRequest,
        ctx: &CallContext,
    ) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }

        info!("Received JSON-RPC request: {}", request.method);
        let id = request.reply_id();

        let response = match request.method.as_str() {
            // Initialize the MCP session
            "initialize" => self.handle_initialize(id, request.params.as_ref()),

            // Liveness check
            "ping" => JsonRpcResponse::success(id, json!({})),

            // List available tools
            "tools/list" => self.handle_tools_list(id),

            // Call a tool
            "tools/call" => self.handle_tools_call(id, request.params, ctx).await,

            // Unknown method
            method => {
                warn!("Unknown method: {}", method);
                JsonRpcResponse::method_not_found(id, method)
            }
        };

        Some(response)
    }

    /// Notifications need no response and this server keeps no state for them.
    fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" => info!("Client sent initialized notification"),
            "notifications/cancelled" => debug!("Client cancelled a request"),
            method => debug!("Ignoring notification: {}", method),
        }
    }

    fn handle_initialize(&self, id: Value, params: Option<&Value>) -> JsonRpcResponse {
        let requested = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str);
        let protocol_version = negotiate_protocol_version(requested);

        let client = params
            .and_then(|p| p.pointer("/clientInfo/name"))
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        info!(
            "Initializing session for client '{}' (protocol {})",
            client, protocol_version
        );

        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": protocol_version,
                "capabilities": {
                    "tools": { "listChanged": false }
                },
                "serverInfo": {
                    "name": self.name(),
                    "version": self.version()
                },
                "instructions": INSTRUCTIONS
            }),
        )
    }

    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "tools": self.list_tools() }))
    }

    async fn handle_tools_call(
        &self,
        id: Value,
        params: Option<Value>,
        ctx: &CallContext,
    ) -> JsonRpcResponse {
        let Some(Value::Object(mut params)) = params else {
            return JsonRpcResponse::invalid_params(id, "Missing params");
        };

        let name = match params.remove("name") {
            Some(Value::String(name)) => name,
            _ => return JsonRpcResponse::invalid_params(id, "Missing tool name"),
        };

        let arguments = match params.remove("arguments") {
            None | Some(Value::Null) => json!({}),
            Some(arguments @ Value::Object(_)) => arguments,
            Some(_) => {
                return JsonRpcResponse::invalid_params(id, "Tool arguments must be an object");
            }
        };

        match self.call_tool(&name, arguments, ctx).await {
            Ok(text) => JsonRpcResponse::success(id, json!(CallToolResult::text(text))),
            Err(e @ (ToolError::NotFound(_) | ToolError::InvalidArguments(_))) => {
                warn!("Tool call '{}' rejected: {}", name, e);
                JsonRpcResponse::invalid_params(id, e.to_string())
            }
            Err(e) => {
                error!("Tool call '{}' failed: {}", name, e);
                JsonRpcResponse::internal_error(id)
            }
        }
    }
}

/// Pick the protocol version for an `initialize` response.
///
/// Echo the client's version when supported, otherwise offer the newest.
pub fn negotiate_protocol_version(requested: Option<&str>) -> &'static str {
    requested
        .and_then(|v| SUPPORTED_PROTOCOL_VERSIONS.iter().find(|s| **s == v))
        .copied()
        .unwrap_or(SUPPORTED_PROTOCOL_VERSIONS[0])
}
