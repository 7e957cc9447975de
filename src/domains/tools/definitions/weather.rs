//! Weather tool definition.
//!
//! Looks up current conditions through a [`WeatherProvider`]. Bad coordinates
//! are rejected as invalid arguments; provider failures are reported to the
//! caller as an `{"error": ...}` payload inside a successful result so the
//! model can react to them conversationally.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use crate::core::CallContext;
use crate::domains::tools::{ToolDescriptor, ToolError, ToolHandler, ToolResult};
use crate::domains::weather::{Coordinates, WeatherError, WeatherProvider};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the weather tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WeatherParams {
    /// Latitude in decimal degrees, from -90 to 90 (e.g. 40.7143 for New York).
    pub latitude: f64,

    /// Longitude in decimal degrees, from -180 to 180 (e.g. -74.006 for New York).
    pub longitude: f64,
}

impl WeatherParams {
    /// Extract parameters from a `tools/call` arguments object.
    pub fn from_arguments(arguments: &Value) -> ToolResult<Self> {
        Ok(Self {
            latitude: number_arg(arguments, "latitude")?,
            longitude: number_arg(arguments, "longitude")?,
        })
    }

    /// Validate ranges and finiteness.
    pub fn coordinates(&self) -> ToolResult<Coordinates> {
        Coordinates::new(self.latitude, self.longitude)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))
    }
}

fn number_arg(arguments: &Value, key: &str) -> ToolResult<f64> {
    arguments.get(key).and_then(Value::as_f64).ok_or_else(|| {
        ToolError::invalid_arguments(format!(
            "Missing or invalid '{}' parameter: expected a number",
            key
        ))
    })
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Weather tool - current conditions for a pair of coordinates.
pub struct WeatherTool {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "getWeather";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Returns the current weather for a location. \
        Provide latitude and longitude as decimal degrees. \
        The response includes temperature, humidity, wind speed, timezone, and units.";

    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Execute the tool logic against already validated coordinates.
    ///
    /// Never fails for provider errors; those become an error payload.
    pub async fn execute(&self, coordinates: Coordinates, ctx: &CallContext) -> ToolResult<String> {
        match self.provider.fetch_current(coordinates, ctx).await {
            Ok(reading) => {
                info!(
                    "Weather for ({}, {}): {} °C in {}",
                    coordinates.latitude(),
                    coordinates.longitude(),
                    reading.current.temperature_c,
                    reading.timezone
                );
                serde_json::to_string(&reading).map_err(|e| ToolError::internal(e.to_string()))
            }
            Err(e) => {
                warn!("Weather lookup failed: {}", e);
                Ok(Self::error_payload(&e))
            }
        }
    }

    /// The in-band payload reported for a failed lookup.
    pub fn error_payload(error: &WeatherError) -> String {
        json!({ "error": format!("Failed to fetch weather data: {}", error) }).to_string()
    }

    /// Create the descriptor for this tool (metadata).
    pub fn to_tool() -> ToolDescriptor {
        ToolDescriptor::for_params::<WeatherParams>(Self::NAME, Self::DESCRIPTION)
    }
}

#[async_trait]
impl ToolHandler for WeatherTool {
    fn descriptor(&self) -> ToolDescriptor {
        Self::to_tool()
    }

    #[instrument(skip_all, name = "getWeather")]
    async fn call(&self, arguments: Value, ctx: &CallContext) -> ToolResult<String> {
        let coordinates = WeatherParams::from_arguments(&arguments)?.coordinates()?;
        self.execute(coordinates, ctx).await
    }
}
