//! Weather models: full sampled conditions and the compact snapshot sent to clients

use serde::{Deserialize, Serialize};

/// Conditions observed at one sampled point
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherConditions {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Precipitation in mm
    pub precipitation: f64,
    /// Wind speed in km/h
    pub wind_speed_kmh: f64,
    /// Human-readable description of weather conditions
    pub description: String,
}

/// Subset of conditions carried on a route's weather point
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Temperature in Celsius
    pub temp: f64,
    pub description: String,
    /// Precipitation in mm
    #[serde(default)]
    pub precipitation: f64,
    /// Wind speed in km/h
    #[serde(default)]
    pub wind_speed: f64,
}

impl From<&WeatherConditions> for WeatherSnapshot {
    fn from(conditions: &WeatherConditions) -> Self {
        Self {
            temp: conditions.temperature,
            description: conditions.description.clone(),
            precipitation: conditions.precipitation,
            wind_speed: conditions.wind_speed_kmh,
        }
    }
}

impl WeatherSnapshot {
    /// One-line summary used on route cards
    #[must_use]
    pub fn format_summary(&self) -> String {
        format!(
            "{}°C, {}, {}mm precipitation, {}km/h winds",
            self.temp, self.description, self.precipitation, self.wind_speed
        )
    }
}

/// Convert an Open-Meteo weather code to a human-readable description
#[must_use]
pub fn weather_code_to_description(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}
