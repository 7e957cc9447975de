//! Weather domain module.
//!
//! Wraps the Open-Meteo forecast API. Open-Meteo is free and requires no API
//! key; see <https://open-meteo.com/en/docs>.
//!
//! ## Architecture
//!
//! - `models.rs` - Coordinates and the provider's response shape
//! - `client.rs` - `WeatherProvider` capability and the reqwest-backed client
//! - `error.rs` - Weather-specific error types

mod client;
mod error;
mod models;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{OpenMeteoClient, WeatherProvider};
pub use error::{WeatherError, WeatherResult};
pub use models::{Coordinates, CurrentUnits, CurrentWeather, WeatherReading};
