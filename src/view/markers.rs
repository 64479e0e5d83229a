//! Marker placement for routes and search endpoints

use crate::config::ViewConfig;
use crate::geo;
use crate::models::{LatLng, Route};

/// What a marker belongs to. Visibility rules only look at this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerTag {
    /// Origin or destination, always shown
    Location,
    /// The identifying marker of route `n`
    RouteIdentifier(usize),
    /// A high-risk weather point of route `n`
    Hazard(usize),
}

impl MarkerTag {
    /// Route index for route-specific markers
    #[must_use]
    pub fn route_index(&self) -> Option<usize> {
        match self {
            MarkerTag::Location => None,
            MarkerTag::RouteIdentifier(index) | MarkerTag::Hazard(index) => Some(*index),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub position: LatLng,
    pub title: String,
    /// Text of the info window opened on click
    pub info: String,
    pub tag: MarkerTag,
    pub z_index: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Origin,
    Destination,
}

/// Which weather points get a hazard marker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardRule {
    /// Points with ice risk strictly above this qualify
    pub threshold: f64,
    /// Maximum snapping distance to the rendered path, in meters
    pub tolerance_m: f64,
    pub max_per_route: usize,
}

impl Default for HazardRule {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            tolerance_m: 5000.0,
            max_per_route: 3,
        }
    }
}

impl From<&ViewConfig> for HazardRule {
    fn from(config: &ViewConfig) -> Self {
        Self {
            threshold: config.hazard_threshold,
            tolerance_m: config.hazard_tolerance_m,
            max_per_route: config.max_hazards,
        }
    }
}

#[must_use]
pub fn location_marker(endpoint: Endpoint, address: &str, position: LatLng) -> MarkerSpec {
    let label = match endpoint {
        Endpoint::Origin => "Start",
        Endpoint::Destination => "End",
    };
    MarkerSpec {
        position,
        title: format!("{label}: {address}"),
        info: format!("{label}\n{address}"),
        tag: MarkerTag::Location,
        z_index: 1000,
    }
}

/// Marker naming route `index`.
///
/// Sits on the middle weather point when the route has more than two,
/// otherwise on the middle point of the rendered path.
#[must_use]
pub fn identifier_marker(index: usize, route: &Route, path: &[LatLng]) -> Option<MarkerSpec> {
    let position = if route.weather_points.len() > 2 {
        route.middle_weather_point().map(|point| point.location)
    } else {
        path.get(path.len() / 2).copied()
    }?;

    let number = index + 1;
    let info = format!(
        "Route {number}: {}\nDistance: {}\nDuration: {}\nIce Risk: {}%\nRoute Type: {}\n{} RISK",
        route.summary,
        route.distance,
        route.duration,
        route.avg_risk_percent(),
        route.route_type.as_deref().unwrap_or("Mixed"),
        route.risk_level.as_str().to_uppercase(),
    );

    Some(MarkerSpec {
        position,
        title: format!("Route {number}: {} - Midpoint", route.summary),
        info,
        tag: MarkerTag::RouteIdentifier(index),
        z_index: 100 + index as i32,
    })
}

/// Hazard markers for route `index`, snapped onto its rendered path.
///
/// Qualifying points are capped before snapping, so a point too far from the
/// path is dropped without promoting a later one.
#[must_use]
pub fn hazard_markers(
    index: usize,
    route: &Route,
    path: &[LatLng],
    rule: &HazardRule,
) -> Vec<MarkerSpec> {
    route
        .weather_points
        .iter()
        .filter(|point| point.ice_risk > rule.threshold)
        .take(rule.max_per_route)
        .filter_map(|point| {
            let Some(position) = geo::closest_point_within(path, point.location, rule.tolerance_m)
            else {
                tracing::debug!(
                    route = index + 1,
                    segment = point.segment_index + 1,
                    "Hazard point is off the rendered path, skipping"
                );
                return None;
            };

            let weather = &point.weather;
            Some(MarkerSpec {
                position,
                title: format!("Weather Alert: {}", weather.description),
                info: format!(
                    "Conditions: {}\nTemperature: {}°C\nIce Risk: {}%\nPrecipitation: {}mm\nWind: {} km/h\nRoute {} - Segment {}",
                    weather.description,
                    weather.temp,
                    (point.ice_risk * 100.0).round(),
                    weather.precipitation,
                    weather.wind_speed,
                    index + 1,
                    point.segment_index + 1,
                ),
                tag: MarkerTag::Hazard(index),
                z_index: 200 + index as i32,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskLevel, WeatherPoint, WeatherSnapshot};

    fn point(lat: f64, lng: f64, ice_risk: f64, segment_index: usize) -> WeatherPoint {
        WeatherPoint {
            location: LatLng::new(lat, lng),
            ice_risk,
            weather: WeatherSnapshot {
                temp: -4.0,
                description: "freezing rain".to_string(),
                precipitation: 0.8,
                wind_speed: 18.0,
            },
            segment_index,
        }
    }

    fn path() -> Vec<LatLng> {
        (0..=10)
            .map(|i| LatLng::new(45.0 + f64::from(i) * 0.1, -93.0))
            .collect()
    }

    #[test]
    fn test_hazard_snaps_to_nearest_path_point() {
        let mut route = Route::new("US-61", "150 mi", "3 h", 0.7, 0.9, RiskLevel::Medium);
        // ~1.6 km east of the path point at 45.5
        route.weather_points = vec![point(45.5, -92.98, 0.9, 0)];

        let markers = hazard_markers(2, &route, &path(), &HazardRule::default());
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].position, path()[5]);
        assert_eq!(markers[0].tag, MarkerTag::Hazard(2));
        assert!(markers[0].info.ends_with("Route 3 - Segment 1"));
    }

    #[test]
    fn test_hazard_outside_tolerance_is_dropped() {
        let mut route = Route::new("US-61", "150 mi", "3 h", 0.7, 0.9, RiskLevel::Medium);
        // ~16 km east of the path
        route.weather_points = vec![point(45.5, -92.8, 0.9, 0)];
        assert!(hazard_markers(0, &route, &path(), &HazardRule::default()).is_empty());
    }

    #[test]
    fn test_hazards_filtered_and_capped() {
        let mut route = Route::new("US-61", "150 mi", "3 h", 0.7, 0.9, RiskLevel::High);
        route.weather_points = vec![
            point(45.0, -93.0, 0.6, 0),
            point(45.1, -93.0, 0.61, 1),
            point(45.2, -93.0, 0.7, 2),
            point(45.3, -93.0, 0.8, 3),
            point(45.4, -93.0, 0.95, 4),
        ];
        let markers = hazard_markers(0, &route, &path(), &HazardRule::default());
        assert_eq!(markers.len(), 3);
        assert_eq!(markers[0].position, path()[1]);
        assert_eq!(markers[2].position, path()[3]);
    }

    #[test]
    fn test_identifier_uses_middle_weather_point() {
        let mut route = Route::new("I-35", "155 mi", "2 h", 0.3, 0.4, RiskLevel::Low);
        route.weather_points = vec![
            point(44.9, -93.2, 0.2, 0),
            point(45.3, -92.8, 0.3, 1),
            point(45.8, -92.5, 0.4, 2),
        ];
        let marker = identifier_marker(0, &route, &path()).unwrap();
        assert_eq!(marker.position, LatLng::new(45.3, -92.8));
        assert_eq!(marker.tag, MarkerTag::RouteIdentifier(0));
        assert!(marker.info.contains("Ice Risk: 30%"));
        assert!(marker.info.contains("Route Type: Mixed"));
        assert!(marker.info.ends_with("LOW RISK"));
    }

    #[test]
    fn test_identifier_falls_back_to_path_midpoint() {
        let route = Route::new("I-35", "155 mi", "2 h", 0.3, 0.4, RiskLevel::Low);
        let marker = identifier_marker(1, &route, &path()).unwrap();
        assert_eq!(marker.position, path()[5]);
        assert!(identifier_marker(1, &route, &[]).is_none());
    }

    #[test]
    fn test_tag_route_index() {
        assert_eq!(MarkerTag::Location.route_index(), None);
        assert_eq!(MarkerTag::Hazard(4).route_index(), Some(4));
    }
}
