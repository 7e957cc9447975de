//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod echo;
pub mod weather;

pub use echo::{EchoParams, EchoTool};
pub use weather::{WeatherParams, WeatherTool};
