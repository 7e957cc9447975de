//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are executable functions that can be called by MCP clients to perform
//! specific actions or computations.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `handlers.rs` - The `ToolHandler` trait and tool result types
//! - `registry.rs` - Central tool registry, built once at startup
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Define a params struct, `execute()`, `to_tool()` and implement `ToolHandler`
//! 3. Export in `definitions/mod.rs`
//! 4. Register it in `build_tool_registry()` in `registry.rs`

pub mod definitions;
mod error;
mod handlers;
mod registry;

pub use error::{ToolError, ToolResult};
pub use handlers::*;
pub use registry::{ToolRegistry, build_tool_registry};
