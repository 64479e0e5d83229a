//! Open-Meteo current conditions client

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, instrument, warn};

use super::WeatherProvider;
use crate::config::WeatherConfig;
use crate::http;
use crate::models::weather::weather_code_to_description;
use crate::models::{LatLng, WeatherConditions};

pub struct OpenMeteoClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config.timeout_seconds, config.max_retries)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn current_url(&self, point: LatLng) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&current=temperature_2m,relative_humidity_2m,precipitation,wind_speed_10m,weather_code",
            self.base_url, point.lat, point.lng
        )
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = point.lat, lng = point.lng))]
    async fn current(&self, point: LatLng) -> Result<WeatherConditions> {
        let start_time = Instant::now();
        let url = self.current_url(point);
        debug!("OpenMeteo API request URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| "OpenMeteo request failed")?
            .error_for_status()?;

        let body: ForecastResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse OpenMeteo weather response")?;

        let elapsed = start_time.elapsed();
        if elapsed.as_secs() > 5 {
            warn!("Slow weather API response: {:.3}s", elapsed.as_secs_f64());
        }

        body.current
            .map(WeatherConditions::from)
            .ok_or_else(|| anyhow!("No current weather data available from OpenMeteo"))
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentData>,
}

#[derive(Debug, Deserialize)]
struct CurrentData {
    #[serde(rename = "temperature_2m")]
    temperature: f64,
    #[serde(rename = "relative_humidity_2m")]
    humidity: f64,
    precipitation: f64,
    /// km/h, the API default unit
    #[serde(rename = "wind_speed_10m")]
    wind_speed: f64,
    weather_code: u8,
}

impl From<CurrentData> for WeatherConditions {
    fn from(current: CurrentData) -> Self {
        Self {
            temperature: current.temperature,
            humidity: current.humidity,
            precipitation: current.precipitation,
            wind_speed_kmh: current.wind_speed,
            description: weather_code_to_description(current.weather_code).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_current_response() {
        let json = r#"{
            "latitude": 46.78,
            "longitude": -92.1,
            "current": {
                "time": "2024-01-15T08:00",
                "interval": 900,
                "temperature_2m": -1.4,
                "relative_humidity_2m": 91,
                "precipitation": 0.6,
                "wind_speed_10m": 22.3,
                "weather_code": 67
            }
        }"#;
        let response: ForecastResponse = serde_json::from_str(json).unwrap();
        let conditions = WeatherConditions::from(response.current.unwrap());
        assert_eq!(conditions.temperature, -1.4);
        assert_eq!(conditions.humidity, 91.0);
        assert_eq!(conditions.description, "Heavy freezing rain");
    }

    #[test]
    fn test_current_url() {
        let client = OpenMeteoClient::new(&WeatherConfig::default()).unwrap();
        let url = client.current_url(LatLng::new(44.5, -93.25));
        assert!(url.starts_with("https://api.open-meteo.com/v1/forecast?latitude=44.5&longitude=-93.25"));
        assert!(url.contains("relative_humidity_2m"));
    }
}
