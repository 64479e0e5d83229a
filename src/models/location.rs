//! Coordinate model shared by the directions, weather and view layers

use serde::{Deserialize, Serialize};

/// Bare coordinate pair as exchanged with the mapping platform
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct LatLng {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Linear interpolation between two points, `ratio` in [0, 1]
    #[must_use]
    pub fn lerp(self, other: LatLng, ratio: f64) -> Self {
        Self {
            lat: self.lat + (other.lat - self.lat) * ratio,
            lng: self.lng + (other.lng - self.lng) * ratio,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lng)
    }

    /// Round coordinates for cache key generation
    #[must_use]
    pub fn rounded(&self, precision: u32) -> (f64, f64) {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
        let lat = (self.lat * multiplier).round() / multiplier;
        let lng = (self.lng * multiplier).round() / multiplier;
        (lat, lng)
    }

    /// Generate cache key for weather at this point
    #[must_use]
    pub fn cache_key(&self) -> String {
        let (lat, lng) = self.rounded(2);
        format!("weather:{lat:.2}:{lng:.2}")
    }
}
