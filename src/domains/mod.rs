//! Domains module containing business logic organized by bounded contexts.
//!
//! - **tools**: MCP tools that can be executed by clients
//! - **weather**: the Open-Meteo client the weather tool is built on

pub mod tools;
pub mod weather;
