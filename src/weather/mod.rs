//! Weather lookup and sampling along a route

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;

use crate::cache::{self, PersistentCache};
use crate::models::{LatLng, WeatherConditions, WeatherPoint, WeatherSnapshot};
use crate::risk::IceDetector;

pub mod open_meteo;
pub mod simulated;

pub use open_meteo::OpenMeteoClient;
pub use simulated::SimulatedWeather;

const WEATHER_TTL: Duration = Duration::from_secs(60 * 60);

/// Source of current conditions at a point
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, point: LatLng) -> Result<WeatherConditions>;
}

/// Fetches conditions at each sampled point and scores them.
///
/// A failed lookup never drops a sample: the point gets simulated winter
/// conditions instead so the route keeps full coverage.
pub struct WeatherSampler {
    provider: Arc<dyn WeatherProvider>,
    fallback: SimulatedWeather,
    detector: IceDetector,
    cache: Option<PersistentCache>,
}

impl WeatherSampler {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            provider,
            fallback: SimulatedWeather,
            detector: IceDetector,
            cache: None,
        }
    }

    #[must_use]
    pub fn with_cache(mut self, cache: PersistentCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Weather points for the given samples, in order, with `segment_index`
    /// set to each sample's position.
    #[tracing::instrument(skip(self, samples), fields(samples = samples.len()))]
    pub async fn sample(&self, samples: &[LatLng]) -> Vec<WeatherPoint> {
        let lookups = samples.iter().map(|point| self.conditions_at(*point));
        let conditions = join_all(lookups).await;

        samples
            .iter()
            .zip(conditions)
            .enumerate()
            .map(|(segment_index, (location, weather))| WeatherPoint {
                location: *location,
                ice_risk: self.detector.ice_risk(&weather),
                weather: WeatherSnapshot::from(&weather),
                segment_index,
            })
            .collect()
    }

    async fn conditions_at(&self, point: LatLng) -> WeatherConditions {
        let key = point.cache_key();

        if let Some(cache) = &self.cache {
            match cache.get::<WeatherConditions>(&key).await {
                Ok(Some(cached)) => return cached,
                Ok(None) => {}
                Err(e) => tracing::warn!("Weather cache read failed: {e}"),
            }
        }

        match self.provider.current(point).await {
            Ok(conditions) => {
                if let Some(cache) = &self.cache {
                    if let Err(e) = cache
                        .put(&key, conditions.clone(), cache::jittered(WEATHER_TTL))
                        .await
                    {
                        tracing::warn!("Weather cache write failed: {e}");
                    }
                }
                conditions
            }
            Err(e) => {
                tracing::warn!(
                    "Weather lookup failed at {}: {e}; using simulated conditions",
                    point.format_coordinates()
                );
                self.fallback.conditions_at(point)
            }
        }
    }
}
