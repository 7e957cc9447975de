//! Tool handler trait and the shapes tools exchange with the dispatcher.

use async_trait::async_trait;
use schemars::JsonSchema;
use schemars::generate::SchemaSettings;
use serde::Serialize;
use serde_json::Value;

use super::error::ToolResult;
use crate::core::CallContext;

// ============================================================================
// Descriptor
// ============================================================================

/// What `tools/list` reports about a tool.
///
/// The handler itself is never part of the descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolDescriptor {
    /// Build a descriptor whose input schema is derived from `P`.
    pub fn for_params<P: JsonSchema>(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: input_schema_for::<P>(),
        }
    }
}

/// Generate a JSON schema object for a parameters struct.
///
/// Doc comments on the struct's fields become property descriptions.
pub fn input_schema_for<P: JsonSchema>() -> Value {
    let mut settings = SchemaSettings::draft07();
    settings.meta_schema = None;
    let schema = settings.into_generator().into_root_schema_for::<P>();

    let mut value = serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({ "type": "object" }));
    if let Value::Object(ref mut map) = value {
        map.remove("title");
    }
    value
}

// ============================================================================
// Results
// ============================================================================

/// A single content item of a tool result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

/// The `result` member of a successful `tools/call` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<Content>,
    /// Always `false`; downstream failures travel inside the text payload.
    pub is_error: bool,
}

impl CallToolResult {
    /// Wrap a tool's string payload as a single text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text { text: text.into() }],
            is_error: false,
        }
    }
}

// ============================================================================
// Handler trait
// ============================================================================

/// A named, schema-described callable exposed to MCP clients.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Name, description and input schema of this tool.
    fn descriptor(&self) -> ToolDescriptor;

    /// Execute the tool with the given arguments object.
    ///
    /// Return [`ToolError::InvalidArguments`](super::ToolError::InvalidArguments)
    /// for bad input, before doing any I/O.
    async fn call(&self, arguments: Value, ctx: &CallContext) -> ToolResult<String>;
}
