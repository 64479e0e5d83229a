//! Geocoding and driving directions
//!
//! The planner and the map session both talk to the mapping platform through
//! [`DirectionsProvider`]; [`GoogleMapsClient`] is the HTTP implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::cache::PersistentCache;
use crate::config::IcyRouteConfig;
use crate::geo::Bounds;
use crate::models::{LatLng, Route};

pub mod google;

pub use google::GoogleMapsClient;

/// Mapping platform lookups
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Coordinates of a free-form address
    async fn geocode(&self, address: &str) -> Result<LatLng>;

    /// Driving routes between two addresses, best first
    async fn route(
        &self,
        origin: &str,
        destination: &str,
        options: &RouteOptions,
    ) -> Result<Vec<DirectionsRoute>>;
}

/// Provider used when no maps API key is configured. Every lookup fails,
/// so only demo scenarios can be answered.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

#[async_trait]
impl DirectionsProvider for Unconfigured {
    async fn geocode(&self, _address: &str) -> Result<LatLng> {
        bail!("Maps API key is not configured")
    }

    async fn route(
        &self,
        _origin: &str,
        _destination: &str,
        _options: &RouteOptions,
    ) -> Result<Vec<DirectionsRoute>> {
        bail!("Maps API key is not configured")
    }
}

/// Directions provider for the configured maps key, cached when a cache is given
pub fn from_config(
    config: &IcyRouteConfig,
    cache: Option<PersistentCache>,
) -> Result<Arc<dyn DirectionsProvider>> {
    if config.maps.api_key.is_none() {
        tracing::warn!("No maps API key configured, only demo scenarios are available");
        return Ok(Arc::new(Unconfigured));
    }

    let mut client = GoogleMapsClient::new(&config.maps)?;
    if let Some(cache) = cache {
        let ttl = Duration::from_secs(u64::from(config.cache.ttl_hours) * 60 * 60);
        client = client.with_cache(cache, ttl);
    }
    Ok(Arc::new(client))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteOptions {
    pub alternatives: bool,
    pub avoid_tolls: bool,
    pub avoid_highways: bool,
}

impl RouteOptions {
    /// Options used to redraw an already analyzed route on the map.
    ///
    /// Highway routes may use tolls and highways, local routes avoid both,
    /// and anything else alternates between avoiding tolls (even index) and
    /// the platform defaults (odd index).
    #[must_use]
    pub fn for_route(route: &Route, index: usize) -> Self {
        let route_type = route.route_type.as_deref().unwrap_or_default();
        if route_type.eq_ignore_ascii_case("highway") || route.summary.contains("Highway") {
            Self::default()
        } else if route_type.eq_ignore_ascii_case("local") || route.summary.contains("Local") {
            Self {
                avoid_tolls: true,
                avoid_highways: true,
                ..Self::default()
            }
        } else if index % 2 == 0 {
            Self {
                avoid_tolls: true,
                ..Self::default()
            }
        } else {
            Self::default()
        }
    }

    /// Value for the `avoid` query parameter, if anything is avoided
    #[must_use]
    pub fn avoid_param(&self) -> Option<String> {
        let mut avoid = Vec::new();
        if self.avoid_tolls {
            avoid.push("tolls");
        }
        if self.avoid_highways {
            avoid.push("highways");
        }
        (!avoid.is_empty()).then(|| avoid.join("|"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub start_location: LatLng,
    pub end_location: LatLng,
    /// Decoded step geometry, empty when the platform returned none
    #[serde(default)]
    pub path: Vec<LatLng>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub distance: String,
    pub duration: String,
    pub start_location: LatLng,
    pub end_location: LatLng,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsRoute {
    pub summary: String,
    pub legs: Vec<Leg>,
}

impl DirectionsRoute {
    /// Start and end point of every step, in travel order
    #[must_use]
    pub fn step_points(&self) -> Vec<LatLng> {
        self.steps()
            .flat_map(|step| [step.start_location, step.end_location])
            .collect()
    }

    /// Full drawable geometry: the step paths where present, otherwise the
    /// step endpoints
    #[must_use]
    pub fn path(&self) -> Vec<LatLng> {
        let mut path = Vec::new();
        for step in self.steps() {
            if step.path.is_empty() {
                path.push(step.start_location);
                path.push(step.end_location);
            } else {
                path.extend_from_slice(&step.path);
            }
        }
        path
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.path())
    }

    #[must_use]
    pub fn distance_text(&self) -> &str {
        self.legs.first().map_or("", |leg| leg.distance.as_str())
    }

    #[must_use]
    pub fn duration_text(&self) -> &str {
        self.legs.first().map_or("", |leg| leg.duration.as_str())
    }

    fn steps(&self) -> impl Iterator<Item = &Step> {
        self.legs.iter().flat_map(|leg| leg.steps.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskLevel;

    fn sample_route() -> DirectionsRoute {
        let a = LatLng::new(44.97, -93.26);
        let b = LatLng::new(45.5, -92.9);
        let c = LatLng::new(46.78, -92.1);
        DirectionsRoute {
            summary: "I-35 N".to_string(),
            legs: vec![Leg {
                distance: "155 mi".to_string(),
                duration: "2 hours 31 mins".to_string(),
                start_location: a,
                end_location: c,
                steps: vec![
                    Step {
                        start_location: a,
                        end_location: b,
                        path: vec![],
                    },
                    Step {
                        start_location: b,
                        end_location: c,
                        path: vec![b, LatLng::new(46.0, -92.5), c],
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_step_points_in_order() {
        let route = sample_route();
        let points = route.step_points();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0], LatLng::new(44.97, -93.26));
        assert_eq!(points[3], LatLng::new(46.78, -92.1));
    }

    #[test]
    fn test_path_prefers_step_geometry() {
        let route = sample_route();
        assert_eq!(route.path().len(), 5);
        assert_eq!(route.distance_text(), "155 mi");
        let bounds = route.bounds().unwrap();
        assert!(bounds.contains(LatLng::new(46.0, -92.5)));
    }

    #[test]
    fn test_options_for_route() {
        let mut route = Route::new("Highway Route (I-35)", "155 mi", "2 h", 0.2, 0.3, RiskLevel::Low);
        assert_eq!(RouteOptions::for_route(&route, 0), RouteOptions::default());

        route.summary = "County Rd 61".to_string();
        route.route_type = Some("local".to_string());
        let local = RouteOptions::for_route(&route, 1);
        assert!(local.avoid_tolls && local.avoid_highways);

        route.route_type = None;
        assert!(RouteOptions::for_route(&route, 2).avoid_tolls);
        assert_eq!(RouteOptions::for_route(&route, 3), RouteOptions::default());
    }

    #[tokio::test]
    async fn test_unconfigured_provider_fails() {
        let provider = from_config(&IcyRouteConfig::default(), None).unwrap();
        assert!(provider.geocode("Duluth, MN").await.is_err());
        assert!(
            provider
                .route("Duluth", "Fargo", &RouteOptions::default())
                .await
                .is_err()
        );
    }

    #[test]
    fn test_avoid_param() {
        assert_eq!(RouteOptions::default().avoid_param(), None);
        let both = RouteOptions {
            alternatives: true,
            avoid_tolls: true,
            avoid_highways: true,
        };
        assert_eq!(both.avoid_param().as_deref(), Some("tolls|highways"));
    }
}
