//! Weather-specific error types.

use thiserror::Error;

/// Result type for weather operations.
pub type WeatherResult<T> = Result<T, WeatherError>;

/// Errors that can occur while looking up the weather.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Coordinates were out of range or not finite.
    #[error("{0}")]
    InvalidCoordinates(String),

    /// The provider answered with a non-success status.
    #[error("Weather provider responded with {status}")]
    Upstream {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The provider answered 2xx but the body was empty or unreadable.
    #[error("Weather provider returned a malformed response: {0}")]
    MalformedResponse(String),

    /// The caller cancelled the lookup or its deadline passed.
    #[error("Weather request was cancelled")]
    Cancelled,

    /// The request never produced a response.
    #[error("Weather request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl WeatherError {
    /// Create an "invalid coordinates" error.
    pub fn invalid_coordinates(msg: impl Into<String>) -> Self {
        Self::InvalidCoordinates(msg.into())
    }

    /// Create a "malformed response" error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }
}
