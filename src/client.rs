//! Client for the routes endpoint, used by the headless `plan` command

use std::time::Duration;

use serde::Deserialize;
use tracing::instrument;

use crate::error::IcyRouteError;
use crate::models::{RouteRequest, SearchResults};

pub struct RoutesClient {
    client: reqwest::Client,
    base_url: String,
}

/// Either outcome of `POST /api/routes`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchReply {
    Failed { error: String },
    Routes(Box<SearchResults>),
}

impl RoutesClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IcyRouteError::config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Run one search. There is no retry: a failure is reported to the user as is.
    #[instrument(skip(self))]
    pub async fn search(&self, request: &RouteRequest) -> crate::Result<SearchResults> {
        let url = format!("{}/api/routes", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| IcyRouteError::api(format!("Route search request failed: {e}")))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| IcyRouteError::api(format!("Failed to read route search response: {e}")))?;
        decode_reply(&body)
    }
}

fn decode_reply(body: &[u8]) -> crate::Result<SearchResults> {
    match serde_json::from_slice::<SearchReply>(body) {
        Ok(SearchReply::Failed { error }) => Err(IcyRouteError::backend(error)),
        Ok(SearchReply::Routes(response)) => Ok(*response),
        Err(e) => Err(IcyRouteError::api(format!(
            "Failed to parse route search response: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DriverExperience, RiskLevel};

    #[test]
    fn test_decode_error_body() {
        let err = decode_reply(br#"{"error": "Origin and destination required"}"#).unwrap_err();
        assert!(matches!(err, IcyRouteError::Backend { .. }));
        assert_eq!(err.user_message(), "Origin and destination required");
    }

    #[test]
    fn test_decode_routes_body() {
        let body = br#"{
            "routes": [{
                "summary": "I-90 Thruway",
                "distance": "75 mi",
                "duration": "1 hour 25 min",
                "avg_ice_risk": 0.32,
                "max_ice_risk": 0.48,
                "risk_level": "low"
            }],
            "driver_experience": "beginner",
            "is_demo": true,
            "analysis_timestamp": "2024-02-08T07:30:00Z"
        }"#;
        let results = decode_reply(body).unwrap();
        assert_eq!(results.routes.len(), 1);
        assert!(results.is_demo);
        assert_eq!(results.driver_experience, Some(DriverExperience::Beginner));
    }

    #[test]
    fn test_decode_bare_routes_body() {
        let body = br#"{"routes": [{
            "summary": "I-35 N",
            "distance": "156 mi",
            "duration": "2 hours 30 min",
            "avg_ice_risk": 0.3,
            "max_ice_risk": 0.4,
            "risk_level": "low"
        }]}"#;
        let results = decode_reply(body).unwrap();
        assert_eq!(results.routes.len(), 1);
        assert_eq!(results.routes[0].risk_level, RiskLevel::Low);
        assert!(!results.is_demo);
        assert!(results.driver_experience.is_none());
        assert!(results.winter_event.is_none());
    }

    #[test]
    fn test_decode_plain_timestamp_body() {
        let body = br#"{
            "routes": [],
            "driver_experience": "intermediate",
            "timestamp": "2024-01-15T08:00:00"
        }"#;
        let results = decode_reply(body).unwrap();
        assert!(results.routes.is_empty());
        assert_eq!(results.driver_experience, Some(DriverExperience::Intermediate));
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode_reply(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, IcyRouteError::Api { .. }));
    }
}
