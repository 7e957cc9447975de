//! Echo tool definition.
//!
//! A connectivity check: returns the message it was given.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::core::CallContext;
use crate::domains::tools::{ToolDescriptor, ToolError, ToolHandler, ToolResult};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the echo tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EchoParams {
    /// The message text to echo back. Must not be empty.
    pub message: String,
}

impl EchoParams {
    /// Extract parameters from a `tools/call` arguments object.
    pub fn from_arguments(arguments: &Value) -> ToolResult<Self> {
        let message = match arguments.get("message") {
            None | Some(Value::Null) => {
                return Err(ToolError::invalid_arguments(
                    "Missing required parameter 'message'",
                ));
            }
            Some(Value::String(message)) => message.clone(),
            Some(_) => {
                return Err(ToolError::invalid_arguments(
                    "Parameter 'message' must be a string",
                ));
            }
        };
        Ok(Self { message })
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Echo tool - returns the message unchanged.
pub struct EchoTool;

impl EchoTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "echo";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Echoes the provided message back unchanged. \
        Use this tool to verify that the MCP connector is reachable and responding correctly.";

    /// Execute the tool logic.
    ///
    /// The message is returned byte-for-byte; it is only trimmed for the
    /// emptiness check.
    pub fn execute(params: EchoParams) -> ToolResult<String> {
        if params.message.trim().is_empty() {
            return Err(ToolError::invalid_arguments(
                "Parameter 'message' must not be empty or whitespace",
            ));
        }
        Ok(params.message)
    }

    /// Create the descriptor for this tool (metadata).
    pub fn to_tool() -> ToolDescriptor {
        ToolDescriptor::for_params::<EchoParams>(Self::NAME, Self::DESCRIPTION)
    }
}

#[async_trait]
impl ToolHandler for EchoTool {
    fn descriptor(&self) -> ToolDescriptor {
        Self::to_tool()
    }

    #[instrument(skip_all, name = "echo")]
    async fn call(&self, arguments: Value, _ctx: &CallContext) -> ToolResult<String> {
        let params = EchoParams::from_arguments(&arguments)?;
        debug!("Echoing {} bytes", params.message.len());
        Self::execute(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    async fn echo(arguments: Value) -> ToolResult<String> {
        EchoTool.call(arguments, &CallContext::new()).await
    }

    #[tokio::test]
    async fn test_echo_returns_message_unchanged() {
        let result = assert_ok!(echo(json!({ "message": "Hello, MCP!" })).await);
        assert_eq!(result, "Hello, MCP!");
    }

    #[tokio::test]
    async fn test_echo_does_not_trim() {
        let result = assert_ok!(echo(json!({ "message": "  padded\t\n" })).await);
        assert_eq!(result, "  padded\t\n");
    }

    #[tokio::test]
    async fn test_echo_unicode() {
        let message = "héllo wörld · 你好 🌦️ \u{200B}x";
        let result = assert_ok!(echo(json!({ "message": message })).await);
        assert_eq!(result, message);
    }

    #[tokio::test]
    async fn test_echo_long_message() {
        let message = "abcdefghij".repeat(1_500);
        assert_eq!(message.chars().count(), 15_000);
        let result = assert_ok!(echo(json!({ "message": message.clone() })).await);
        assert_eq!(result, message);
    }

    #[tokio::test]
    async fn test_echo_rejects_blank_messages() {
        for arguments in [
            json!({ "message": null }),
            json!({ "message": "" }),
            json!({ "message": "   " }),
            json!({ "message": "\t\n" }),
            json!({}),
        ] {
            let err = assert_err!(echo(arguments).await);
            assert!(matches!(err, ToolError::InvalidArguments(_)));
        }
    }

    #[tokio::test]
    async fn test_echo_rejects_non_string() {
        let err = assert_err!(echo(json!({ "message": 42 })).await);
        assert!(err.to_string().contains("must be a string"));
    }

    #[test]
    fn test_to_tool() {
        let tool = EchoTool::to_tool();
        assert_eq!(tool.name, "echo");
        assert!(tool.description.contains("reachable"));
        assert_eq!(tool.input_schema["properties"]["message"]["type"], "string");
        assert_eq!(tool.input_schema["required"], json!(["message"]));
    }
}
