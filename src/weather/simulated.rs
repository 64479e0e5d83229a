//! Plausible winter conditions for when the weather service is unreachable

use rand::RngExt;

use crate::models::{LatLng, WeatherConditions};

/// Generates latitude-dependent winter weather: colder further north, with
/// random precipitation on roughly a third of the samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedWeather;

impl SimulatedWeather {
    #[must_use]
    pub fn conditions_at(&self, point: LatLng) -> WeatherConditions {
        let mut rng = rand::rng();

        let base_temp = -5.0 + (45.0 - point.lat.abs()) * 0.5;
        let temperature = base_temp + rng.random_range(-3.0..3.0);

        let precipitation = if rng.random_range(0.0..1.0) < 0.3 {
            rng.random_range(0.0..2.0)
        } else {
            0.0
        };
        let humidity = rng.random_range(60.0..95.0);
        let wind_speed_kmh = rng.random_range(5.0..25.0);

        WeatherConditions {
            temperature: round_to(temperature, 1),
            humidity: round_to(humidity, 1),
            precipitation: round_to(precipitation, 2),
            wind_speed_kmh: round_to(wind_speed_kmh, 1),
            description: describe(temperature, humidity, precipitation).to_string(),
        }
    }
}

fn describe(temperature: f64, humidity: f64, precipitation: f64) -> &'static str {
    if temperature < -2.0 && precipitation > 0.0 {
        if temperature > -5.0 {
            "freezing rain"
        } else {
            "snow"
        }
    } else if temperature < 2.0 && humidity > 80.0 {
        "overcast, potential ice"
    } else if temperature < 0.0 {
        "clear, cold"
    } else {
        "partly cloudy"
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}
