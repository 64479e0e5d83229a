//! Wire contract of the routes endpoint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Route;

/// Self-declared driver skill, used to filter which routes are offered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverExperience {
    Beginner,
    #[default]
    Intermediate,
    Expert,
}

impl fmt::Display for DriverExperience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverExperience::Beginner => write!(f, "beginner"),
            DriverExperience::Intermediate => write!(f, "intermediate"),
            DriverExperience::Expert => write!(f, "expert"),
        }
    }
}

impl std::str::FromStr for DriverExperience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(DriverExperience::Beginner),
            "intermediate" => Ok(DriverExperience::Intermediate),
            "expert" => Ok(DriverExperience::Expert),
            other => Err(format!(
                "Unknown driver experience '{other}'. Must be one of: beginner, intermediate, expert"
            )),
        }
    }
}

/// Body of `POST /api/routes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub driver_experience: DriverExperience,
    #[serde(default)]
    pub avoid_icy: bool,
}

impl RouteRequest {
    #[must_use]
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            driver_experience: DriverExperience::default(),
            avoid_icy: false,
        }
    }
}

/// Storm a demo scenario was recorded during
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinterEvent {
    pub date: String,
    pub description: String,
}

/// Successful body of `POST /api/routes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub routes: Vec<Route>,
    pub driver_experience: DriverExperience,
    #[serde(default)]
    pub is_demo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winter_event: Option<WinterEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_note: Option<String>,
    pub analysis_timestamp: DateTime<Utc>,
}

/// What a client reads back from `POST /api/routes`. Only `routes` is required,
/// so older backends that omit the metadata still decode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResults {
    pub routes: Vec<Route>,
    #[serde(default)]
    pub driver_experience: Option<DriverExperience>,
    #[serde(default)]
    pub is_demo: bool,
    #[serde(default)]
    pub winter_event: Option<WinterEvent>,
    #[serde(default)]
    pub analysis_note: Option<String>,
}

/// Entry of `GET /api/demo-routes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoRouteInfo {
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub event: String,
    pub description: String,
}
