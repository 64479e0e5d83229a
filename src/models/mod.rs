//! Data models for the IcyRoute application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates
//! - Weather: Sampled weather conditions
//! - Route: Scored driving routes and their weather points
//! - Request: The `/api/routes` wire contract

pub mod location;
pub mod request;
pub mod route;
pub mod weather;

// Re-export all public types for convenient access
pub use location::LatLng;
pub use request::{
    DemoRouteInfo, DriverExperience, RouteRequest, RouteResponse, SearchResults, WinterEvent,
};
pub use route::{RiskLevel, Route, WeatherPoint};
pub use weather::{WeatherConditions, WeatherSnapshot};
