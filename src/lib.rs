//! Weather MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing two tools over JSON-RPC 2.0:
//! `echo`, which returns its input, and `getWeather`, which reports current
//! conditions from the Open-Meteo forecast API.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the JSON-RPC envelope and the
//!   dispatching [`McpServer`], plus the HTTP and STDIO transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: tool contract, registry and the two tool definitions
//!   - **weather**: coordinates, the weather reading model and its client
//!
//! # Example
//!
//! ```rust,no_run
//! use weather_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{CallContext, Config, Error, McpServer, Result};
