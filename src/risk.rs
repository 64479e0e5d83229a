//! Ice-risk scoring
//!
//! Two pieces live here: [`IceDetector`], which turns sampled weather into a
//! per-point risk fraction, and [`classify`], which turns a route's average
//! risk into the [`RiskLevel`] shown to the driver.

use crate::models::{RiskLevel, Route, WeatherConditions};

/// Lower bound (inclusive, percent) of the `high` band
pub const HIGH_THRESHOLD: f64 = 75.0;
/// Lower bound (inclusive, percent) of the `medium` band
pub const MEDIUM_THRESHOLD: f64 = 50.0;
/// Lower bound (inclusive, percent) of the `low` band
pub const LOW_THRESHOLD: f64 = 25.0;

/// Severity label for a route from its average and peak risk, both given in
/// percent and clamped to [0, 100].
///
/// Only `avg_percent` decides the band. `max_percent` is accepted so callers
/// pass both figures the cards display, but a short icy stretch does not
/// promote the whole route.
#[must_use]
pub fn classify(avg_percent: f64, _max_percent: f64) -> RiskLevel {
    let avg = avg_percent.clamp(0.0, 100.0);
    if avg >= HIGH_THRESHOLD {
        RiskLevel::High
    } else if avg >= MEDIUM_THRESHOLD {
        RiskLevel::Medium
    } else if avg >= LOW_THRESHOLD {
        RiskLevel::Low
    } else {
        RiskLevel::Minimal
    }
}

/// Label from risk fractions in [0, 1]
#[must_use]
pub fn classify_fractions(avg_risk: f64, max_risk: f64) -> RiskLevel {
    classify(avg_risk * 100.0, max_risk * 100.0)
}

/// Overwrite `route.risk_level` from its own average risk. Returns the new label.
pub fn reclassify(route: &mut Route) -> RiskLevel {
    let level = classify_fractions(route.avg_ice_risk, route.max_ice_risk);
    if level != route.risk_level {
        tracing::debug!(
            summary = %route.summary,
            backend = %route.risk_level,
            computed = %level,
            "Overriding backend risk level"
        );
    }
    route.risk_level = level;
    level
}

/// Weather-based ice risk heuristic
#[derive(Debug, Clone, Copy, Default)]
pub struct IceDetector;

impl IceDetector {
    /// Risk fraction in [0, 1] for the given conditions.
    ///
    /// Risk peaks around freezing, and rises with humidity, any
    /// precipitation, and wind that accelerates surface cooling.
    #[must_use]
    pub fn ice_risk(&self, weather: &WeatherConditions) -> f64 {
        let mut risk: f64 = 0.0;

        let t = weather.temperature;
        if (-2.0..=2.0).contains(&t) {
            risk += 0.4;
        } else if (-5.0..-2.0).contains(&t) || (t > 2.0 && t <= 5.0) {
            risk += 0.2;
        }

        if weather.humidity > 80.0 {
            risk += 0.2;
        } else if weather.humidity > 60.0 {
            risk += 0.1;
        }

        if weather.precipitation > 0.0 {
            risk += 0.3;
        }

        if weather.wind_speed_kmh > 15.0 {
            risk += 0.1;
        }

        risk.min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, RiskLevel::Minimal)]
    #[case(24.99, RiskLevel::Minimal)]
    #[case(25.0, RiskLevel::Low)]
    #[case(49.99, RiskLevel::Low)]
    #[case(50.0, RiskLevel::Medium)]
    #[case(74.99, RiskLevel::Medium)]
    #[case(75.0, RiskLevel::High)]
    #[case(100.0, RiskLevel::High)]
    fn test_classify_bands(#[case] avg: f64, #[case] expected: RiskLevel) {
        assert_eq!(classify(avg, avg), expected);
    }

    #[test]
    fn test_classify_ignores_peak() {
        assert_eq!(classify(80.0, 10.0), RiskLevel::High);
        assert_eq!(classify(10.0, 99.0), RiskLevel::Minimal);
    }

    #[test]
    fn test_classify_clamps_input() {
        assert_eq!(classify(140.0, 0.0), RiskLevel::High);
        assert_eq!(classify(-5.0, 0.0), RiskLevel::Minimal);
    }

    fn route(avg: f64, max: f64, backend: RiskLevel) -> Route {
        Route::new("Test", "10 mi", "15 mins", avg, max, backend)
    }

    #[test]
    fn test_reclassify_overrides_backend_label() {
        let mut r = route(0.30, 0.9, RiskLevel::High);
        assert_eq!(reclassify(&mut r), RiskLevel::Low);
        assert_eq!(r.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_reclassify_is_idempotent() {
        let mut r = route(0.82, 0.95, RiskLevel::High);
        assert_eq!(reclassify(&mut r), RiskLevel::High);
        assert_eq!(reclassify(&mut r), RiskLevel::High);
        assert_eq!(r.avg_ice_risk, 0.82);
        assert_eq!(r.max_ice_risk, 0.95);
    }

    fn conditions(temperature: f64, humidity: f64, precipitation: f64, wind: f64) -> WeatherConditions {
        WeatherConditions {
            temperature,
            humidity,
            precipitation,
            wind_speed_kmh: wind,
            description: "test".to_string(),
        }
    }

    #[rstest]
    #[case(conditions(20.0, 40.0, 0.0, 5.0), 0.0)]
    #[case(conditions(0.0, 40.0, 0.0, 5.0), 0.4)]
    #[case(conditions(-2.0, 40.0, 0.0, 5.0), 0.4)]
    #[case(conditions(-3.0, 40.0, 0.0, 5.0), 0.2)]
    #[case(conditions(5.0, 40.0, 0.0, 5.0), 0.2)]
    #[case(conditions(5.1, 70.0, 0.0, 5.0), 0.1)]
    #[case(conditions(1.0, 90.0, 0.5, 20.0), 1.0)]
    #[case(conditions(-4.0, 85.0, 1.0, 5.0), 0.7)]
    fn test_ice_risk_terms(#[case] weather: WeatherConditions, #[case] expected: f64) {
        let risk = IceDetector.ice_risk(&weather);
        assert!((risk - expected).abs() < 1e-9, "expected {expected}, got {risk}");
    }
}
