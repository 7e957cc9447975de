//! Transport layer for the MCP server.
//!
//! This module provides different transport implementations:
//! - **HTTP**: JSON-RPC over POST on a single MCP endpoint - feature: `http`
//! - **STDIO**: Line-delimited JSON-RPC over stdin/stdout - feature: `stdio`
//!
//! Each transport handles the connection lifecycle and delegates
//! message processing to [`McpServer`](crate::core::McpServer).
//!
//! # Feature Flags
//!
//! Transport implementations are conditionally compiled based on features:
//! - `http` (default): HTTP transport - adds axum, tower, tower-http
//! - `stdio` (default): STDIO transport - no extra dependencies

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

// Re-export configs for convenience
#[cfg(feature = "http")]
pub use config::HttpConfig;
