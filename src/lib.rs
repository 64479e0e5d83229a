//! `IcyRoute` - winter route planning with ice-risk scoring
//!
//! This library provides the routes backend (directions, weather sampling,
//! risk classification and the bundled winter-storm demos) and the client
//! side map view that reconciles drawn routes and markers with the results.

pub mod api;
pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod directions;
pub mod error;
pub mod geo;
pub mod http;
pub mod logging;
pub mod models;
pub mod planner;
pub mod risk;
pub mod view;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use cache::PersistentCache;
pub use client::RoutesClient;
pub use config::IcyRouteConfig;
pub use directions::{DirectionsProvider, GoogleMapsClient};
pub use error::IcyRouteError;
pub use models::{
    LatLng, RiskLevel, Route, RouteRequest, RouteResponse, SearchResults, WeatherPoint,
};
pub use planner::RoutePlanner;
pub use risk::{IceDetector, classify};
pub use view::{MapSession, MapSurface, SceneMap};
pub use weather::{OpenMeteoClient, WeatherProvider, WeatherSampler};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, IcyRouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
