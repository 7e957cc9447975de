//! Weather data models.
//!
//! [`WeatherReading`] mirrors the JSON returned by `/v1/forecast` so the
//! weather tool can hand it to clients unchanged.

use serde::{Deserialize, Serialize};

use super::error::{WeatherError, WeatherResult};

const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

// ============================================================================
// Coordinates
// ============================================================================

/// A validated point on the globe, in decimal degrees.
///
/// Both components are finite and within range; the only way to build one is
/// [`Coordinates::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Validate and build coordinates.
    pub fn new(latitude: f64, longitude: f64) -> WeatherResult<Self> {
        check_component("Latitude", latitude, LATITUDE_RANGE)?;
        check_component("Longitude", longitude, LONGITUDE_RANGE)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

fn check_component(field: &str, value: f64, (min, max): (f64, f64)) -> WeatherResult<()> {
    if !value.is_finite() {
        return Err(WeatherError::invalid_coordinates(format!(
            "{} must be a finite number in the range {} to {}. Received: {}.",
            field, min, max, value
        )));
    }
    if !(min..=max).contains(&value) {
        return Err(WeatherError::invalid_coordinates(format!(
            "{} must be in the range {} to {}. Received: {}.",
            field, min, max, value
        )));
    }
    Ok(())
}

// ============================================================================
// Provider response
// ============================================================================

/// Current conditions for a location, as returned by Open-Meteo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub latitude: f64,
    pub longitude: f64,
    /// IANA timezone resolved by the provider (`timezone=auto`).
    pub timezone: String,
    pub current: CurrentWeather,
    pub current_units: CurrentUnits,
}

/// The `current` block with live measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Local ISO-8601 time of the measurement.
    pub time: String,
    #[serde(rename = "temperature_2m")]
    pub temperature_c: f64,
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed_kmh: f64,
    #[serde(rename = "relative_humidity_2m")]
    pub humidity_percent: u8,
}

/// Units for each field of the `current` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUnits {
    pub temperature_2m: String,
    pub wind_speed_10m: String,
    pub relative_humidity_2m: String,
}

impl WeatherReading {
    /// Decode a provider body, rejecting anything that is not a complete
    /// reading.
    pub fn from_body(body: &str) -> WeatherResult<Self> {
        if body.trim().is_empty() {
            return Err(WeatherError::malformed("empty response body"));
        }

        let reading: Self =
            serde_json::from_str(body).map_err(|e| WeatherError::malformed(e.to_string()))?;

        if reading.current.humidity_percent > 100 {
            return Err(WeatherError::malformed(format!(
                "relative humidity out of range: {}",
                reading.current.humidity_percent
            )));
        }

        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::weather::testing::{SAMPLE_FORECAST_JSON, sample_reading};

    #[test]
    fn test_coordinates_accept_boundaries() {
        for (lat, lon) in [(-90.0, -180.0), (90.0, 180.0), (0.0, 0.0), (40.71, -74.01)] {
            let coords = Coordinates::new(lat, lon).unwrap();
            assert_eq!(coords.latitude(), lat);
            assert_eq!(coords.longitude(), lon);
        }
    }

    #[test]
    fn test_latitude_out_of_range_message() {
        let err = Coordinates::new(91.0, 0.0).unwrap_err().to_string();
        assert!(err.contains("Latitude"));
        assert!(err.contains("-90 to 90"));
        assert!(err.contains("91"));
    }

    #[test]
    fn test_longitude_out_of_range_message() {
        let err = Coordinates::new(0.0, -180.5).unwrap_err().to_string();
        assert!(err.contains("Longitude"));
        assert!(err.contains("-180 to 180"));
        assert!(err.contains("-180.5"));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).is_err());
        assert!(Coordinates::new(f64::NEG_INFINITY, 0.0).is_err());
    }

    #[test]
    fn test_from_body_reads_provider_shape() {
        let reading = WeatherReading::from_body(SAMPLE_FORECAST_JSON).unwrap();
        assert_eq!(reading, sample_reading());
        assert_eq!(reading.timezone, "America/New_York");
        assert_eq!(reading.current.temperature_c, 5.2);
        assert_eq!(reading.current.wind_speed_kmh, 12.3);
        assert_eq!(reading.current.humidity_percent, 65);
        assert_eq!(reading.current_units.temperature_2m, "°C");
    }

    #[test]
    fn test_serialization_keeps_provider_field_names() {
        let value = serde_json::to_value(sample_reading()).unwrap();
        assert_eq!(value["current"]["temperature_2m"], 5.2);
        assert_eq!(value["current"]["wind_speed_10m"], 12.3);
        assert_eq!(value["current"]["relative_humidity_2m"], 65);
        assert_eq!(value["current_units"]["wind_speed_10m"], "km/h");
        assert!(value["current"].get("temperature_c").is_none());
    }

    #[test]
    fn test_round_trip() {
        let reading = sample_reading();
        let json = serde_json::to_string(&reading).unwrap();
        let back: WeatherReading = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reading);
    }

    #[test]
    fn test_from_body_rejects_bad_bodies() {
        for body in ["", "   ", "null", "{}", "not json", r#"{"latitude": 1}"#] {
            assert!(
                matches!(
                    WeatherReading::from_body(body),
                    Err(WeatherError::MalformedResponse(_))
                ),
                "body {:?} should be rejected",
                body
            );
        }
    }

    #[test]
    fn test_from_body_rejects_humidity_over_100() {
        let body = SAMPLE_FORECAST_JSON.replace(
            "\"relative_humidity_2m\": 65",
            "\"relative_humidity_2m\": 150",
        );
        assert!(matches!(
            WeatherReading::from_body(&body),
            Err(WeatherError::MalformedResponse(_))
        ));
    }
}
