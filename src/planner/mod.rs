//! Route planning: directions, weather sampling, scoring and filtering

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::directions::{DirectionsProvider, DirectionsRoute, RouteOptions};
use crate::error::IcyRouteError;
use crate::geo;
use crate::models::{Route, RouteRequest, RouteResponse};
use crate::risk;
use crate::weather::WeatherSampler;

pub mod demo;
pub mod experience;

pub use demo::{DemoCatalog, DemoScenario, normalize_location};

const ANALYSIS_NOTE: &str = "Live analysis from current weather along each route";

/// Live searches offer at most this many routes
const MAX_ALTERNATIVES: usize = 3;

/// Extra single-route queries used when the platform returns too few alternatives
const TOP_UP_QUERIES: [RouteOptions; 2] = [
    RouteOptions {
        alternatives: false,
        avoid_tolls: false,
        avoid_highways: true,
    },
    RouteOptions {
        alternatives: false,
        avoid_tolls: true,
        avoid_highways: false,
    },
];

/// Answers `/api/routes` searches
pub struct RoutePlanner {
    directions: Arc<dyn DirectionsProvider>,
    sampler: WeatherSampler,
    demos: DemoCatalog,
    sample_interval_m: f64,
}

impl RoutePlanner {
    pub fn new(
        directions: Arc<dyn DirectionsProvider>,
        sampler: WeatherSampler,
        demos: DemoCatalog,
        sample_interval_km: f64,
    ) -> Self {
        Self {
            directions,
            sampler,
            demos,
            sample_interval_m: sample_interval_km * 1000.0,
        }
    }

    #[must_use]
    pub fn demos(&self) -> &DemoCatalog {
        &self.demos
    }

    #[instrument(skip(self, request), fields(origin = %request.origin, destination = %request.destination))]
    pub async fn plan(&self, request: RouteRequest) -> crate::Result<RouteResponse> {
        let origin = request.origin.trim();
        let destination = request.destination.trim();
        if origin.is_empty() || destination.is_empty() {
            return Err(IcyRouteError::validation("Origin and destination required"));
        }

        if let Some(scenario) = self.demos.find(origin, destination) {
            info!("Serving demo scenario '{}'", scenario.event);
            return Ok(RouteResponse {
                routes: experience::filter_routes(
                    scenario.routes.clone(),
                    request.driver_experience,
                ),
                driver_experience: request.driver_experience,
                is_demo: true,
                winter_event: Some(scenario.winter_event()),
                analysis_note: None,
                analysis_timestamp: Utc::now(),
            });
        }

        let routes = self
            .analyze(origin, destination, request.avoid_icy)
            .await
            .map_err(|e| IcyRouteError::api(format!("{e:#}")))?;

        Ok(RouteResponse {
            routes: experience::filter_routes(routes, request.driver_experience),
            driver_experience: request.driver_experience,
            is_demo: false,
            winter_event: None,
            analysis_note: Some(ANALYSIS_NOTE.to_string()),
            analysis_timestamp: Utc::now(),
        })
    }

    async fn analyze(
        &self,
        origin: &str,
        destination: &str,
        avoid_icy: bool,
    ) -> anyhow::Result<Vec<Route>> {
        let options = RouteOptions {
            alternatives: true,
            avoid_tolls: avoid_icy,
            avoid_highways: false,
        };
        let mut alternatives = self.directions.route(origin, destination, &options).await?;
        if alternatives.len() < MAX_ALTERNATIVES {
            self.top_up(origin, destination, &mut alternatives).await;
        }
        alternatives.truncate(MAX_ALTERNATIVES);
        info!("Analyzing {} route alternatives", alternatives.len());

        let mut routes = Vec::with_capacity(alternatives.len());
        for alternative in &alternatives {
            routes.push(self.score(alternative).await);
        }

        if avoid_icy {
            routes.sort_by(|a, b| {
                a.avg_ice_risk
                    .total_cmp(&b.avg_ice_risk)
                    .then(a.max_ice_risk.total_cmp(&b.max_ice_risk))
            });
        }
        Ok(routes)
    }

    /// Add the first route of each highway- and toll-avoiding query until
    /// there are enough alternatives. Routes already present are skipped and
    /// failed queries only cost that alternative.
    async fn top_up(&self, origin: &str, destination: &str, alternatives: &mut Vec<DirectionsRoute>) {
        for options in &TOP_UP_QUERIES {
            if alternatives.len() >= MAX_ALTERNATIVES {
                break;
            }
            match self.directions.route(origin, destination, options).await {
                Ok(found) => match found.into_iter().next() {
                    Some(route) if alternatives.iter().all(|a| a.summary != route.summary) => {
                        alternatives.push(route);
                    }
                    _ => {}
                },
                Err(e) => warn!("Extra alternative lookup failed ({:?}): {e:#}", options.avoid_param()),
            }
        }
    }

    async fn score(&self, alternative: &DirectionsRoute) -> Route {
        let samples = geo::sample_points(&alternative.step_points(), self.sample_interval_m);
        let weather_points = self.sampler.sample(&samples).await;

        let (avg, max) = if weather_points.is_empty() {
            warn!(summary = %alternative.summary, "No weather samples along route");
            (0.0, 0.0)
        } else {
            let sum: f64 = weather_points.iter().map(|p| p.ice_risk).sum();
            let max = weather_points
                .iter()
                .map(|p| p.ice_risk)
                .fold(0.0_f64, f64::max);
            (sum / weather_points.len() as f64, max)
        };

        let mut route = Route::new(
            alternative.summary.clone(),
            alternative.distance_text(),
            alternative.duration_text(),
            avg,
            max,
            risk::classify_fractions(avg, max),
        );
        route.high_risk_segments = weather_points.iter().filter(|p| p.ice_risk > 0.6).count();
        route.weather_points = weather_points;
        route
    }
}
