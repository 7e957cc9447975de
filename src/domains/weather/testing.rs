//! Test doubles for the weather domain.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{
    Coordinates, CurrentUnits, CurrentWeather, WeatherError, WeatherProvider, WeatherReading,
    WeatherResult,
};
use crate::core::CallContext;

/// A forecast body for New York: 5.2 °C, 12.3 km/h wind, 65 % humidity.
pub(crate) const SAMPLE_FORECAST_JSON: &str = r#"{
    "latitude": 40.71,
    "longitude": -74.01,
    "generationtime_ms": 0.03,
    "timezone": "America/New_York",
    "current": {
        "time": "2026-02-25T12:00",
        "interval": 900,
        "temperature_2m": 5.2,
        "wind_speed_10m": 12.3,
        "relative_humidity_2m": 65
    },
    "current_units": {
        "time": "iso8601",
        "temperature_2m": "°C",
        "wind_speed_10m": "km/h",
        "relative_humidity_2m": "%"
    }
}"#;

pub(crate) fn sample_reading() -> WeatherReading {
    WeatherReading {
        latitude: 40.71,
        longitude: -74.01,
        timezone: "America/New_York".to_string(),
        current: CurrentWeather {
            time: "2026-02-25T12:00".to_string(),
            temperature_c: 5.2,
            wind_speed_kmh: 12.3,
            humidity_percent: 65,
        },
        current_units: CurrentUnits {
            temperature_2m: "°C".to_string(),
            wind_speed_10m: "km/h".to_string(),
            relative_humidity_2m: "%".to_string(),
        },
    }
}

/// What a [`StaticWeatherProvider`] answers with.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Outcome {
    Reading,
    ServerError,
    Malformed,
    Cancelled,
    /// Never answers on its own; returns only once the call is cancelled.
    Hang,
}

/// A provider that never touches the network and counts its calls.
pub(crate) struct StaticWeatherProvider {
    outcome: Outcome,
    calls: AtomicUsize,
    last_cancellation: Mutex<Option<CancellationToken>>,
}

impl StaticWeatherProvider {
    pub(crate) fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_cancellation: Mutex::new(None),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Cancellation token of the most recent call's context.
    pub(crate) fn last_cancellation(&self) -> Option<CancellationToken> {
        self.last_cancellation.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherProvider for StaticWeatherProvider {
    async fn fetch_current(
        &self,
        _coordinates: Coordinates,
        ctx: &CallContext,
    ) -> WeatherResult<WeatherReading> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_cancellation.lock().unwrap() = Some(ctx.cancellation().clone());

        match self.outcome {
            Outcome::Reading => Ok(sample_reading()),
            Outcome::ServerError => Err(WeatherError::Upstream {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: r#"{"reason": "service unavailable"}"#.to_string(),
            }),
            Outcome::Malformed => Err(WeatherError::malformed("empty response body")),
            Outcome::Cancelled => Err(WeatherError::Cancelled),
            Outcome::Hang => {
                ctx.run(std::future::pending::<()>()).await;
                Err(WeatherError::Cancelled)
            }
        }
    }
}
