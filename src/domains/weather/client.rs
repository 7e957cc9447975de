//! Open-Meteo HTTP client.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::error::{WeatherError, WeatherResult};
use super::models::{Coordinates, WeatherReading};
use crate::core::CallContext;

/// Measurements requested from the provider for the `current` block.
const CURRENT_FIELDS: &str = "temperature_2m,wind_speed_10m,relative_humidity_2m";

/// Capability to look up current conditions.
///
/// Tools depend on this trait rather than on [`OpenMeteoClient`] so tests can
/// substitute a provider that never touches the network.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch current conditions for `coordinates`.
    ///
    /// Implementations must give up with [`WeatherError::Cancelled`] as soon
    /// as `ctx` is cancelled or its deadline passes.
    async fn fetch_current(
        &self,
        coordinates: Coordinates,
        ctx: &CallContext,
    ) -> WeatherResult<WeatherReading>;
}

/// Query string for `/v1/forecast`.
///
/// Floats are serialized by serde, which never uses a locale-specific decimal
/// separator.
#[derive(Debug, Serialize)]
struct ForecastQuery {
    latitude: f64,
    longitude: f64,
    current: &'static str,
    timezone: &'static str,
}

impl From<Coordinates> for ForecastQuery {
    fn from(coordinates: Coordinates) -> Self {
        Self {
            latitude: coordinates.latitude(),
            longitude: coordinates.longitude(),
            current: CURRENT_FIELDS,
            timezone: "auto",
        }
    }
}

/// Client for the Open-Meteo forecast API.
///
/// One GET per lookup. No caching, no retries and no timeout of its own: the
/// deadline comes from the caller's [`CallContext`].
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenMeteoClient {
    /// Public Open-Meteo endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.open-meteo.com";

    /// Create a client for the given base URL (scheme and host, no path).
    pub fn new(base_url: impl Into<String>) -> WeatherResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// The forecast endpoint this client calls.
    pub fn forecast_endpoint(&self) -> String {
        format!("{}/v1/forecast", self.base_url)
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    #[instrument(
        skip(self, ctx),
        fields(latitude = coordinates.latitude(), longitude = coordinates.longitude())
    )]
    async fn fetch_current(
        &self,
        coordinates: Coordinates,
        ctx: &CallContext,
    ) -> WeatherResult<WeatherReading> {
        let request = self
            .http
            .get(self.forecast_endpoint())
            .query(&ForecastQuery::from(coordinates));

        debug!("Requesting current weather from {}", self.base_url);

        let (status, body) = ctx
            .run(async {
                let response = request.send().await?;
                let status = response.status();
                let body = response.text().await?;
                Ok::<_, reqwest::Error>((status, body))
            })
            .await
            .ok_or(WeatherError::Cancelled)??;

        if !status.is_success() {
            warn!("Weather provider responded with {}", status);
            return Err(WeatherError::Upstream { status, body });
        }

        WeatherReading::from_body(&body)
    }
}
