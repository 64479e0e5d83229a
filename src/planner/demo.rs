//! Canned winter-storm scenarios answered without any lookups

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::{DemoRouteInfo, Route, WinterEvent};

const SCENARIOS_JSON: &str = include_str!("winter_scenarios.json");

#[derive(Debug, Clone, Deserialize)]
pub struct DemoScenario {
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub event: String,
    pub routes: Vec<Route>,
}

impl DemoScenario {
    #[must_use]
    pub fn winter_event(&self) -> WinterEvent {
        WinterEvent {
            date: self.date.clone(),
            description: self.event.clone(),
        }
    }

    #[must_use]
    pub fn info(&self) -> DemoRouteInfo {
        DemoRouteInfo {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            date: self.date.clone(),
            event: self.event.clone(),
            description: format!("Experience {} conditions", self.event),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DemoCatalog {
    scenarios: Vec<DemoScenario>,
}

impl DemoCatalog {
    /// The bundled scenarios
    pub fn bundled() -> Result<Self> {
        let scenarios: Vec<DemoScenario> =
            serde_json::from_str(SCENARIOS_JSON).context("Failed to parse bundled demo scenarios")?;
        Ok(Self { scenarios })
    }

    /// Scenario for a search, matching on normalized place names
    #[must_use]
    pub fn find(&self, origin: &str, destination: &str) -> Option<&DemoScenario> {
        let origin = normalize_location(origin);
        let destination = normalize_location(destination);
        self.scenarios
            .iter()
            .find(|s| s.origin == origin && s.destination == destination)
    }

    #[must_use]
    pub fn list(&self) -> Vec<DemoRouteInfo> {
        self.scenarios.iter().map(DemoScenario::info).collect()
    }

    #[must_use]
    pub fn scenarios(&self) -> &[DemoScenario] {
        &self.scenarios
    }
}

/// Canonical "City, ST" name for the demo cities, or the trimmed input
#[must_use]
pub fn normalize_location(location: &str) -> String {
    let trimmed = location.trim();
    let lower = trimmed.to_lowercase();

    let canonical = if lower.contains("minneapolis") {
        "Minneapolis, MN"
    } else if lower.contains("duluth") {
        "Duluth, MN"
    } else if lower.contains("buffalo") {
        "Buffalo, NY"
    } else if lower.contains("rochester") && lower.contains("ny") {
        "Rochester, NY"
    } else if lower.contains("detroit") {
        "Detroit, MI"
    } else if lower.contains("grand rapids") {
        "Grand Rapids, MI"
    } else {
        return trimmed.to_string();
    };
    canonical.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskLevel;
    use rstest::rstest;

    #[rstest]
    #[case("minneapolis", "Minneapolis, MN")]
    #[case("  Duluth, Minnesota ", "Duluth, MN")]
    #[case("BUFFALO", "Buffalo, NY")]
    #[case("Rochester NY", "Rochester, NY")]
    #[case("Rochester, MN", "Rochester, MN")]
    #[case("downtown detroit", "Detroit, MI")]
    #[case("Grand Rapids", "Grand Rapids, MI")]
    #[case(" Fargo, ND ", "Fargo, ND")]
    fn test_normalize_location(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_location(input), expected);
    }

    #[test]
    fn test_bundled_scenarios() {
        let catalog = DemoCatalog::bundled().unwrap();
        assert_eq!(catalog.scenarios().len(), 3);
        for scenario in catalog.scenarios() {
            assert_eq!(scenario.routes.len(), 3);
        }
    }

    #[test]
    fn test_find_demo_pair() {
        let catalog = DemoCatalog::bundled().unwrap();
        let scenario = catalog.find("minneapolis", "duluth").unwrap();
        assert_eq!(scenario.event, "Severe Midwest Ice Storm");
        assert_eq!(scenario.routes[2].risk_level, RiskLevel::High);
        assert_eq!(scenario.routes[0].weather_points.len(), 4);

        assert!(catalog.find("duluth", "minneapolis").is_none());
        assert!(catalog.find("Rochester, MN", "Buffalo").is_none());
    }

    #[test]
    fn test_list() {
        let list = DemoCatalog::bundled().unwrap().list();
        assert_eq!(list[1].event, "Lake Effect Blizzard");
        assert_eq!(list[1].description, "Experience Lake Effect Blizzard conditions");
        assert_eq!(list[2].destination, "Grand Rapids, MI");
    }
}
