//! Configuration management for IcyRoute
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::IcyRouteError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for IcyRoute
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IcyRouteConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Mapping platform (directions, geocoding) settings
    pub maps: MapsConfig,
    /// Weather API settings
    pub weather: WeatherConfig,
    /// Cache configuration
    pub cache: CacheConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Map view (reconciler) settings
    pub view: ViewConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served as the fallback for non-API paths
    pub static_dir: String,
    pub request_timeout_seconds: u32,
}

/// Mapping platform settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapsConfig {
    /// Maps API key, required for live (non-demo) searches
    pub api_key: Option<String>,
    pub directions_base_url: String,
    pub geocoding_base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    pub max_retries: u32,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Base URL for the Open-Meteo forecast API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// Maximum number of retries for failed requests
    pub max_retries: u32,
    /// Distance between weather samples along a route
    pub sample_interval_km: f64,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache TTL in hours
    pub ttl_hours: u32,
    /// Cache directory location
    pub location: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

/// Map view settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Upper bound on the wait for path lookups before fitting the viewport
    pub fit_deadline_ms: u64,
    /// Ice risk above which a weather point gets a hazard marker
    pub hazard_threshold: f64,
    /// Maximum snapping distance from a weather point to the rendered path
    pub hazard_tolerance_m: f64,
    /// Hazard markers per route
    pub max_hazards: usize,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_request_timeout() -> u32 {
    60
}

fn default_directions_base_url() -> String {
    "https://maps.googleapis.com/maps/api/directions/json".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://maps.googleapis.com/maps/api/geocode/json".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_sample_interval_km() -> f64 {
    50.0
}

fn default_cache_ttl() -> u32 {
    6
}

fn default_cache_location() -> String {
    dirs::cache_dir()
        .map(|dir| dir.join("icyroute").to_string_lossy().into_owned())
        .unwrap_or_else(|| ".cache/icyroute".to_string())
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_fit_deadline_ms() -> u64 {
    3000
}

fn default_hazard_threshold() -> f64 {
    0.6
}

fn default_hazard_tolerance_m() -> f64 {
    5000.0
}

fn default_max_hazards() -> usize {
    3
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            directions_base_url: default_directions_base_url(),
            geocoding_base_url: default_geocoding_base_url(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            sample_interval_km: default_sample_interval_km(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_cache_ttl(),
            location: default_cache_location(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            fit_deadline_ms: default_fit_deadline_ms(),
            hazard_threshold: default_hazard_threshold(),
            hazard_tolerance_m: default_hazard_tolerance_m(),
            max_hazards: default_max_hazards(),
        }
    }
}

impl ViewConfig {
    #[must_use]
    pub fn fit_deadline(&self) -> Duration {
        Duration::from_millis(self.fit_deadline_ms)
    }
}

impl IcyRouteConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // ICYROUTE_MAPS__API_KEY -> maps.api_key
        builder = builder.add_source(
            Environment::with_prefix("ICYROUTE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: IcyRouteConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("icyroute").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.maps.directions_base_url.is_empty() {
            self.maps.directions_base_url = default_directions_base_url();
        }
        if self.maps.geocoding_base_url.is_empty() {
            self.maps.geocoding_base_url = default_geocoding_base_url();
        }
        if self.maps.timeout_seconds == 0 {
            self.maps.timeout_seconds = default_timeout();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_timeout();
        }
        if self.weather.sample_interval_km <= 0.0 {
            self.weather.sample_interval_km = default_sample_interval_km();
        }
        if self.cache.ttl_hours == 0 {
            self.cache.ttl_hours = default_cache_ttl();
        }
        if self.cache.location.is_empty() {
            self.cache.location = default_cache_location();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.view.fit_deadline_ms == 0 {
            self.view.fit_deadline_ms = default_fit_deadline_ms();
        }
        if self.view.max_hazards == 0 {
            self.view.max_hazards = default_max_hazards();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        // Without a key only the demo scenarios are served
        if let Some(api_key) = &self.maps.api_key {
            if api_key.is_empty() {
                return Err(IcyRouteError::config(
                    "Maps API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }

            if api_key.len() < 8 {
                return Err(IcyRouteError::config(
                    "Maps API key appears to be invalid (too short). Please check your API key.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.maps.timeout_seconds > 300 || self.weather.timeout_seconds > 300 {
            return Err(IcyRouteError::config("API timeout cannot exceed 300 seconds").into());
        }

        if self.maps.max_retries > 10 || self.weather.max_retries > 10 {
            return Err(IcyRouteError::config("API max retries cannot exceed 10").into());
        }

        if self.cache.ttl_hours > 168 {
            return Err(
                IcyRouteError::config("Cache TTL cannot exceed 168 hours (1 week)").into(),
            );
        }

        if !(0.0..=1.0).contains(&self.view.hazard_threshold) {
            return Err(
                IcyRouteError::config("Hazard threshold must be between 0.0 and 1.0").into(),
            );
        }

        if self.view.hazard_tolerance_m <= 0.0 {
            return Err(IcyRouteError::config("Hazard tolerance must be positive").into());
        }

        if self.view.fit_deadline_ms > 60_000 {
            return Err(IcyRouteError::config("Fit deadline cannot exceed 60000 ms").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(IcyRouteError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(IcyRouteError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for url in [
            &self.maps.directions_base_url,
            &self.maps.geocoding_base_url,
            &self.weather.base_url,
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(IcyRouteError::config(format!(
                    "API base URL must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IcyRouteConfig::default();
        assert_eq!(config.weather.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.weather.sample_interval_km, 50.0);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.cache.ttl_hours, 6);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.view.hazard_tolerance_m, 5000.0);
        assert_eq!(config.view.max_hazards, 3);
        assert!(config.maps.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_short_api_key() {
        let mut config = IcyRouteConfig::default();
        config.maps.api_key = Some("abc".to_string());
        let result = config.validate_api_keys();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too short"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = IcyRouteConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_hazard_threshold() {
        let mut config = IcyRouteConfig::default();
        config.view.hazard_threshold = 1.5;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Hazard threshold"));
    }

    #[test]
    fn test_apply_defaults_fills_zeroes() {
        let mut config = IcyRouteConfig::default();
        config.server.port = 0;
        config.weather.sample_interval_km = 0.0;
        config.logging.format = String::new();
        config.apply_defaults();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.weather.sample_interval_km, 50.0);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_missing_path_uses_defaults() {
        let config =
            IcyRouteConfig::load_from_path(Some(PathBuf::from("does/not/exist.toml"))).unwrap();
        assert_eq!(config.view.fit_deadline(), Duration::from_millis(3000));
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = IcyRouteConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("icyroute"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
