//! Google Maps Geocoding and Directions JSON APIs

use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{DirectionsProvider, DirectionsRoute, Leg, RouteOptions, Step};
use crate::cache::{self, PersistentCache};
use crate::config::MapsConfig;
use crate::http;
use crate::models::LatLng;

pub struct GoogleMapsClient {
    client: ClientWithMiddleware,
    api_key: String,
    directions_base_url: String,
    geocoding_base_url: String,
    cache: Option<PersistentCache>,
    cache_ttl: Duration,
}

impl GoogleMapsClient {
    pub fn new(config: &MapsConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .context("Missing maps.api_key (set ICYROUTE_MAPS__API_KEY)")?;

        Ok(Self {
            client: http::build_client(config.timeout_seconds, config.max_retries)?,
            api_key,
            directions_base_url: config.directions_base_url.clone(),
            geocoding_base_url: config.geocoding_base_url.clone(),
            cache: None,
            cache_ttl: Duration::from_secs(6 * 60 * 60),
        })
    }

    #[must_use]
    pub fn with_cache(mut self, cache: PersistentCache, ttl: Duration) -> Self {
        self.cache = Some(cache);
        self.cache_ttl = ttl;
        self
    }

    fn geocode_url(&self, address: &str) -> String {
        format!(
            "{}?address={}&key={}",
            self.geocoding_base_url,
            urlencoding::encode(address),
            self.api_key
        )
    }

    fn directions_url(&self, origin: &str, destination: &str, options: &RouteOptions) -> String {
        let mut url = format!(
            "{}?origin={}&destination={}&mode=driving&departure_time=now",
            self.directions_base_url,
            urlencoding::encode(origin),
            urlencoding::encode(destination),
        );
        if options.alternatives {
            url.push_str("&alternatives=true");
        }
        if let Some(avoid) = options.avoid_param() {
            url.push_str("&avoid=");
            url.push_str(&urlencoding::encode(&avoid));
        }
        url.push_str("&key=");
        url.push_str(&self.api_key);
        url
    }

    /// Cached routes for a key. Cache failures count as a miss.
    async fn cached_routes(&self, key: &str) -> Option<Vec<DirectionsRoute>> {
        let cache = self.cache.as_ref()?;
        match cache.get::<Vec<DirectionsRoute>>(key).await {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!("Directions cache read failed: {e}");
                None
            }
        }
    }

    async fn store_routes(&self, key: &str, routes: &[DirectionsRoute]) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache
                .put(key, routes.to_vec(), cache::jittered(self.cache_ttl))
                .await
            {
                tracing::warn!("Directions cache write failed: {e}");
            }
        }
    }

    async fn fetch_directions(
        &self,
        origin: &str,
        destination: &str,
        options: &RouteOptions,
    ) -> Result<Vec<DirectionsRoute>> {
        debug!("Calling the directions API");
        let response: DirectionsResponse = self
            .client
            .get(self.directions_url(origin, destination, options))
            .send()
            .await
            .with_context(|| "Directions request failed")?
            .error_for_status()?
            .json()
            .await
            .with_context(|| "Failed to parse directions response")?;

        check_status(&response.status, response.error_message.as_deref())?;
        response.routes.into_iter().map(DirectionsRoute::try_from).collect()
    }
}

fn check_status(status: &str, message: Option<&str>) -> Result<()> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        other => bail!("Maps API returned {other}: {}", message.unwrap_or("no details")),
    }
}

fn directions_cache_key(origin: &str, destination: &str, options: &RouteOptions) -> String {
    format!(
        "directions:{}:{}:{}:{}:{}",
        origin.trim().to_lowercase(),
        destination.trim().to_lowercase(),
        options.alternatives,
        options.avoid_tolls,
        options.avoid_highways
    )
}

#[async_trait]
impl DirectionsProvider for GoogleMapsClient {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<LatLng> {
        let response: GeocodeResponse = self
            .client
            .get(self.geocode_url(address))
            .send()
            .await
            .with_context(|| "Geocoding request failed")?
            .error_for_status()?
            .json()
            .await
            .with_context(|| "Failed to parse geocoding response")?;

        check_status(&response.status, response.error_message.as_deref())?;
        response
            .results
            .first()
            .map(|result| result.geometry.location.into())
            .ok_or_else(|| anyhow!("No geocoding results for '{address}'"))
    }

    #[instrument(skip(self))]
    async fn route(
        &self,
        origin: &str,
        destination: &str,
        options: &RouteOptions,
    ) -> Result<Vec<DirectionsRoute>> {
        let key = directions_cache_key(origin, destination, options);
        if let Some(cached) = self.cached_routes(&key).await {
            return Ok(cached);
        }

        let routes = self.fetch_directions(origin, destination, options).await?;
        self.store_routes(&key, &routes).await;
        Ok(routes)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct ApiLatLng {
    lat: f64,
    lng: f64,
}

impl From<ApiLatLng> for LatLng {
    fn from(value: ApiLatLng) -> Self {
        LatLng::new(value.lat, value.lng)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: ApiLatLng,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<ApiRoute>,
}

#[derive(Debug, Deserialize)]
struct ApiRoute {
    #[serde(default)]
    summary: String,
    legs: Vec<ApiLeg>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiLeg {
    distance: TextValue,
    duration: TextValue,
    start_location: ApiLatLng,
    end_location: ApiLatLng,
    steps: Vec<ApiStep>,
}

#[derive(Debug, Deserialize)]
struct ApiStep {
    start_location: ApiLatLng,
    end_location: ApiLatLng,
    polyline: Option<EncodedPolyline>,
}

#[derive(Debug, Deserialize)]
struct EncodedPolyline {
    points: String,
}

fn decode_path(encoded: &str) -> Result<Vec<LatLng>> {
    let line = polyline::decode_polyline(encoded, 5).map_err(|msg| anyhow!(msg))?;
    Ok(line.0.iter().map(|coord| LatLng::new(coord.y, coord.x)).collect())
}

impl TryFrom<ApiRoute> for DirectionsRoute {
    type Error = anyhow::Error;

    fn try_from(route: ApiRoute) -> Result<Self> {
        let legs = route
            .legs
            .into_iter()
            .map(|leg| {
                let steps = leg
                    .steps
                    .into_iter()
                    .map(|step| {
                        let path = match &step.polyline {
                            Some(encoded) => decode_path(&encoded.points)?,
                            None => Vec::new(),
                        };
                        Ok(Step {
                            start_location: step.start_location.into(),
                            end_location: step.end_location.into(),
                            path,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Leg {
                    distance: leg.distance.text,
                    duration: leg.duration.text,
                    start_location: leg.start_location.into(),
                    end_location: leg.end_location.into(),
                    steps,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DirectionsRoute {
            summary: route.summary,
            legs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GoogleMapsClient {
        let config = MapsConfig {
            api_key: Some("test-key-123".to_string()),
            ..MapsConfig::default()
        };
        GoogleMapsClient::new(&config).unwrap()
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        assert!(GoogleMapsClient::new(&MapsConfig::default()).is_err());
    }

    #[test]
    fn test_directions_url() {
        let client = test_client();
        let options = RouteOptions {
            alternatives: true,
            avoid_tolls: true,
            avoid_highways: false,
        };
        let url = client.directions_url("Minneapolis, MN", "Duluth, MN", &options);
        assert!(url.contains("origin=Minneapolis%2C%20MN"));
        assert!(url.contains("alternatives=true"));
        assert!(url.contains("avoid=tolls"));
        assert!(url.ends_with("key=test-key-123"));
    }

    #[test]
    fn test_decode_path() {
        // Reference polyline from the Google encoding documentation
        let path = decode_path("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        assert_eq!(path.len(), 3);
        assert!((path[0].lat - 38.5).abs() < 1e-6);
        assert!((path[0].lng + 120.2).abs() < 1e-6);
        assert!((path[2].lat - 43.252).abs() < 1e-6);
    }

    #[test]
    fn test_parse_directions_response() {
        let json = r#"{
            "status": "OK",
            "routes": [{
                "summary": "I-35 N",
                "legs": [{
                    "distance": {"text": "155 mi", "value": 249000},
                    "duration": {"text": "2 hours 31 mins", "value": 9060},
                    "start_location": {"lat": 44.97, "lng": -93.26},
                    "end_location": {"lat": 46.78, "lng": -92.1},
                    "steps": [{
                        "start_location": {"lat": 44.97, "lng": -93.26},
                        "end_location": {"lat": 46.78, "lng": -92.1}
                    }]
                }]
            }]
        }"#;
        let response: DirectionsResponse = serde_json::from_str(json).unwrap();
        check_status(&response.status, None).unwrap();
        let routes: Vec<DirectionsRoute> = response
            .routes
            .into_iter()
            .map(DirectionsRoute::try_from)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(routes[0].summary, "I-35 N");
        assert_eq!(routes[0].duration_text(), "2 hours 31 mins");
        assert_eq!(routes[0].step_points().len(), 2);
    }

    #[test]
    fn test_error_status() {
        assert!(check_status("REQUEST_DENIED", Some("bad key")).is_err());
        assert!(check_status("ZERO_RESULTS", None).is_ok());
    }

    #[test]
    fn test_cache_key_normalizes_case() {
        let options = RouteOptions::default();
        assert_eq!(
            directions_cache_key(" Duluth ", "DULUTH", &options),
            directions_cache_key("duluth", "duluth", &options)
        );
    }

    #[tokio::test]
    async fn test_undecodable_cache_entry_is_a_miss() {
        let dir = std::env::temp_dir().join(format!("icyroute-directions-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let cache = PersistentCache::open(&dir).unwrap();
        let client = test_client().with_cache(cache.clone(), Duration::from_secs(3600));

        let options = RouteOptions::default();
        let key = directions_cache_key("A", "B", &options);
        cache.put(&key, 7u8, Duration::from_secs(3600)).await.unwrap();
        assert!(client.cached_routes(&key).await.is_none());

        let routes = vec![DirectionsRoute {
            summary: "I-35 N".to_string(),
            legs: vec![],
        }];
        client.store_routes(&key, &routes).await;
        assert_eq!(client.cached_routes(&key).await, Some(routes));
    }
}
