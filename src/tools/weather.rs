//! Current-weather tool backed by the Open-Meteo APIs
//!
//! Resolves a place name to coordinates via the geocoding API, then fetches
//! current conditions. No API key required.

use std::time::Duration;

use serde::Deserialize;

use crate::Result;

use super::ToolResult;

/// Bounded ceiling for each outbound request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Geocoding API response
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Option<Vec<GeocodeResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    name: String,
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

/// Forecast API response (current conditions only)
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentConditions>,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: Option<f64>,
    apparent_temperature: Option<f64>,
    precipitation: Option<f64>,
    weather_code: Option<i64>,
    wind_speed_10m: Option<f64>,
}

/// Fetches current weather conditions for a named location.
pub struct WeatherTool {
    client: reqwest::Client,
    default_location: String,
}

impl WeatherTool {
    /// Create the tool with a fallback location for empty input.
    #[must_use]
    pub fn new(default_location: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            default_location,
        }
    }

    /// Current conditions for `location` (empty → configured default).
    ///
    /// Unresolvable locations and network failures are reported results,
    /// never faults.
    pub async fn current(&self, location: &str) -> ToolResult {
        let place = if location.trim().is_empty() {
            self.default_location.clone()
        } else {
            location.trim().to_string()
        };

        match self.fetch(&place).await {
            Ok(Some(text)) => ToolResult::success(text),
            Ok(None) => ToolResult::failure(format!(
                "Could not find location '{place}'. Please specify a city (e.g., 'weather in Toronto')."
            )),
            Err(e) => ToolResult::failure(format!("Weather error: {e}")),
        }
    }

    /// Geocode then fetch; `Ok(None)` means the place did not resolve.
    async fn fetch(&self, place: &str) -> Result<Option<String>> {
        tracing::debug!(place = %place, "geocoding location");

        let response = self
            .client
            .get(GEOCODING_URL)
            .query(&[
                ("name", place),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let geocode: GeocodeResponse = response.json().await?;
        let Some(hit) = geocode.results.and_then(|r| r.into_iter().next()) else {
            return Ok(None);
        };

        tracing::debug!(
            name = %hit.name,
            latitude = hit.latitude,
            longitude = hit.longitude,
            "fetching current conditions"
        );

        let response = self
            .client
            .get(FORECAST_URL)
            .query(&[
                ("latitude", hit.latitude.to_string().as_str()),
                ("longitude", hit.longitude.to_string().as_str()),
                (
                    "current",
                    "temperature_2m,apparent_temperature,precipitation,weather_code,wind_speed_10m",
                ),
                ("temperature_unit", "celsius"),
                ("windspeed_unit", "kmh"),
                ("precipitation_unit", "mm"),
                ("timezone", "auto"),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let forecast: ForecastResponse = response.json().await?;
        let current = forecast.current.unwrap_or(CurrentConditions {
            temperature_2m: None,
            apparent_temperature: None,
            precipitation: None,
            weather_code: None,
            wind_speed_10m: None,
        });

        let place_label = match &hit.country {
            Some(country) if !country.is_empty() => format!("{}, {}", hit.name, country),
            _ => hit.name.clone(),
        };

        let description = current.weather_code.map_or("unknown", describe_wmo);

        Ok(Some(format!(
            "{place_label}: {}°C, feels like {}°C, {description}, wind {} km/h, precip {} mm (current).",
            fmt_reading(current.temperature_2m),
            fmt_reading(current.apparent_temperature),
            fmt_reading(current.wind_speed_10m),
            fmt_reading(current.precipitation),
        )))
    }
}

/// Render an optional sensor reading ("n/a" when the API omits it)
fn fmt_reading(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

/// Short description for a WMO weather-condition code
#[must_use]
pub fn describe_wmo(code: i64) -> &'static str {
    match code {
        0 => "clear sky",
        1 => "mainly clear",
        2 => "partly cloudy",
        3 => "overcast",
        45 => "fog",
        48 => "rime fog",
        51 => "light drizzle",
        53 => "moderate drizzle",
        55 => "dense drizzle",
        61 => "light rain",
        63 => "moderate rain",
        65 => "heavy rain",
        71 => "light snow",
        73 => "moderate snow",
        75 => "heavy snow",
        80 => "rain showers",
        81 => "heavy rain showers",
        82 => "violent rain showers",
        95 => "thunderstorm",
        96 => "thunderstorm w/ light hail",
        99 => "thunderstorm w/ heavy hail",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wmo_codes_describe() {
        assert_eq!(describe_wmo(0), "clear sky");
        assert_eq!(describe_wmo(63), "moderate rain");
        assert_eq!(describe_wmo(95), "thunderstorm");
        assert_eq!(describe_wmo(42), "unknown");
    }

    #[test]
    fn readings_render() {
        assert_eq!(fmt_reading(Some(21.4)), "21.4");
        assert_eq!(fmt_reading(None), "n/a");
    }

    #[test]
    fn geocode_response_parses() {
        let json = r#"{"results":[{"name":"Toronto","country":"Canada","latitude":43.7,"longitude":-79.4}]}"#;
        let parsed: GeocodeResponse = serde_json::from_str(json).unwrap();
        let hit = &parsed.results.unwrap()[0];
        assert_eq!(hit.name, "Toronto");
        assert_eq!(hit.country.as_deref(), Some("Canada"));
    }

    #[test]
    fn empty_geocode_response_parses() {
        let parsed: GeocodeResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_none());
    }
}
