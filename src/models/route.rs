//! Route model: one scored driving alternative and its sampled weather points

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{LatLng, WeatherSnapshot};

/// Discrete severity label for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Minimal,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Stroke color for rendered paths and card accents
    #[must_use]
    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "#2ecc71",
            RiskLevel::Low => "#f39c12",
            RiskLevel::Medium => "#e67e22",
            RiskLevel::High => "#e74c3c",
        }
    }

    #[must_use]
    pub fn badge_background(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "#d4edda",
            RiskLevel::Low => "#fff3cd",
            RiskLevel::Medium => "#f8d7da",
            RiskLevel::High => "#f5c6cb",
        }
    }

    /// Path stroke weight before the per-index variation
    #[must_use]
    pub fn base_stroke_weight(&self) -> u32 {
        match self {
            RiskLevel::Minimal => 5,
            RiskLevel::Low => 6,
            RiskLevel::Medium => 7,
            RiskLevel::High => 8,
        }
    }

    #[must_use]
    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "✅",
            RiskLevel::Low => "⚡",
            RiskLevel::Medium => "🔶",
            RiskLevel::High => "🚨",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "minimal",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A weather sample along a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherPoint {
    pub location: LatLng,
    /// Ice risk fraction in [0, 1]
    pub ice_risk: f64,
    pub weather: WeatherSnapshot,
    /// Position of this sample along the route, starting at 0
    #[serde(default)]
    pub segment_index: usize,
}

/// A driving route scored for ice risk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub summary: String,
    pub distance: String,
    pub duration: String,
    /// Average ice risk fraction in [0, 1]
    pub avg_ice_risk: f64,
    /// Peak ice risk fraction in [0, 1]
    pub max_ice_risk: f64,
    pub risk_level: RiskLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_type: Option<String>,
    #[serde(default)]
    pub weather_points: Vec<WeatherPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_score: Option<u32>,
    #[serde(default)]
    pub high_risk_segments: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advantages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_note: Option<String>,
}

impl Route {
    /// Route with the required fields set and every optional field empty
    #[must_use]
    pub fn new(
        summary: impl Into<String>,
        distance: impl Into<String>,
        duration: impl Into<String>,
        avg_ice_risk: f64,
        max_ice_risk: f64,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            summary: summary.into(),
            distance: distance.into(),
            duration: duration.into(),
            avg_ice_risk,
            max_ice_risk,
            risk_level,
            route_type: None,
            weather_points: Vec::new(),
            description: None,
            safety_score: None,
            high_risk_segments: 0,
            warnings: Vec::new(),
            advantages: Vec::new(),
            experience_note: None,
        }
    }

    /// Average risk as a whole percentage, as shown on cards and tables
    #[must_use]
    pub fn avg_risk_percent(&self) -> u32 {
        to_percent(self.avg_ice_risk)
    }

    /// Peak risk as a whole percentage
    #[must_use]
    pub fn max_risk_percent(&self) -> u32 {
        to_percent(self.max_ice_risk)
    }

    /// The middle weather sample, if any
    #[must_use]
    pub fn middle_weather_point(&self) -> Option<&WeatherPoint> {
        self.weather_points.get(self.weather_points.len() / 2)
    }
}

fn to_percent(fraction: f64) -> u32 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u32
}
