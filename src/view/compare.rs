//! Route cards and the "Compare Routes" table

use std::fmt;

use crate::error::IcyRouteError;
use crate::models::{RiskLevel, Route};

use super::session::RouteDisplay;

#[derive(Debug, Clone, PartialEq)]
pub struct RouteCard {
    pub index: usize,
    pub summary: String,
    pub risk_level: RiskLevel,
    /// Accent color of the card border
    pub color: &'static str,
    pub badge_background: &'static str,
    pub distance: String,
    pub duration: String,
    pub avg_risk_percent: u32,
    pub max_risk_percent: u32,
    pub high_risk_segments: usize,
    pub weather_point_count: usize,
    pub route_type: Option<String>,
    pub description: Option<String>,
    /// Conditions at the middle weather sample
    pub sample_weather: Option<String>,
    pub warnings: Vec<String>,
    pub advantages: Vec<String>,
    pub experience_note: Option<String>,
    /// Whether the route is currently drawn on the map
    pub on_map: bool,
}

impl RouteCard {
    #[must_use]
    pub fn new(index: usize, route: &Route, on_map: bool) -> Self {
        Self {
            index,
            summary: route.summary.clone(),
            risk_level: route.risk_level,
            color: route.risk_level.color(),
            badge_background: route.risk_level.badge_background(),
            distance: route.distance.clone(),
            duration: route.duration.clone(),
            avg_risk_percent: route.avg_risk_percent(),
            max_risk_percent: route.max_risk_percent(),
            high_risk_segments: route.high_risk_segments,
            weather_point_count: route.weather_points.len(),
            route_type: route.route_type.clone(),
            description: route.description.clone(),
            sample_weather: route
                .middle_weather_point()
                .map(|point| point.weather.format_summary()),
            warnings: route.warnings.clone(),
            advantages: route.advantages.clone(),
            experience_note: route.experience_note.clone(),
            on_map,
        }
    }

    #[must_use]
    pub fn badge(&self) -> String {
        format!(
            "{} {} RISK",
            self.risk_level.emoji(),
            self.risk_level.as_str().to_uppercase()
        )
    }
}

impl fmt::Display for RouteCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hidden = if self.on_map { "" } else { " (hidden)" };
        writeln!(f, "Route {}: {}{hidden}", self.index + 1, self.summary)?;
        writeln!(f, "  {}", self.badge())?;
        if let Some(route_type) = &self.route_type {
            writeln!(f, "  Type: {route_type}")?;
        }
        if let Some(description) = &self.description {
            writeln!(f, "  {description}")?;
        }
        writeln!(f, "  Distance: {}  Duration: {}", self.distance, self.duration)?;
        writeln!(
            f,
            "  Average risk: {}%  Peak risk: {}%",
            self.avg_risk_percent, self.max_risk_percent
        )?;
        writeln!(
            f,
            "  High risk segments: {}  Weather points: {}",
            self.high_risk_segments, self.weather_point_count
        )?;
        if let Some(weather) = &self.sample_weather {
            writeln!(f, "  Sample weather: {weather}")?;
        }
        for warning in &self.warnings {
            writeln!(f, "  ⚠️  {warning}")?;
        }
        for advantage in &self.advantages {
            writeln!(f, "  ✓ {advantage}")?;
        }
        if let Some(note) = &self.experience_note {
            writeln!(f, "  Note: {note}")?;
        }
        Ok(())
    }
}

/// One card per route, flagged with whether its path is drawn
#[must_use]
pub fn route_cards(routes: &[Route], displays: &[RouteDisplay]) -> Vec<RouteCard> {
    routes
        .iter()
        .enumerate()
        .map(|(index, route)| {
            let on_map = displays.iter().any(|d| d.index == index && d.visible);
            RouteCard::new(index, route, on_map)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub index: usize,
    pub summary: String,
    pub distance: String,
    pub duration: String,
    pub risk_percent: u32,
    pub risk_level: RiskLevel,
    pub route_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub rows: Vec<ComparisonRow>,
}

impl Comparison {
    /// Index of the route with the lowest average risk
    #[must_use]
    pub fn safest(&self) -> Option<usize> {
        self.rows
            .iter()
            .min_by_key(|row| row.risk_percent)
            .map(|row| row.index)
    }
}

/// Side-by-side summary of the current routes
pub fn compare(routes: &[Route]) -> crate::Result<Comparison> {
    if routes.len() < 2 {
        return Err(IcyRouteError::validation(
            "At least two routes are needed to compare",
        ));
    }

    let rows = routes
        .iter()
        .enumerate()
        .map(|(index, route)| ComparisonRow {
            index,
            summary: route.summary.clone(),
            distance: route.distance.clone(),
            duration: route.duration.clone(),
            risk_percent: route.avg_risk_percent(),
            risk_level: route.risk_level,
            route_type: route.route_type.clone().unwrap_or_else(|| "mixed".to_string()),
        })
        .collect();
    Ok(Comparison { rows })
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📊 Route Comparison")?;
        writeln!(
            f,
            "{:<8} {:<12} {:<16} {:>5}  {:<8}",
            "Route", "Distance", "Time", "Risk", "Level"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<8} {:<12} {:<16} {:>4}%  {:<8}",
                format!("Route {}", row.index + 1),
                row.distance,
                row.duration,
                row.risk_percent,
                row.risk_level
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes() -> Vec<Route> {
        vec![
            Route::new("I-35", "155 mi", "2 hours 45 min", 0.28, 0.45, RiskLevel::Low),
            Route::new("County Rd", "168 mi", "3 hours 15 min", 0.58, 0.72, RiskLevel::Medium),
        ]
    }

    #[test]
    fn test_compare_needs_two_routes() {
        let err = compare(&routes()[..1]).unwrap_err();
        assert!(matches!(err, IcyRouteError::Validation { .. }));
        assert!(compare(&[]).is_err());
    }

    #[test]
    fn test_comparison_rows() {
        let comparison = compare(&routes()).unwrap();
        assert_eq!(comparison.rows.len(), 2);
        assert_eq!(comparison.rows[1].risk_percent, 58);
        assert_eq!(comparison.rows[1].route_type, "mixed");
        assert_eq!(comparison.safest(), Some(0));

        let table = comparison.to_string();
        assert!(table.contains("Route 2"));
        assert!(table.contains("58%"));
        assert!(table.contains("medium"));
    }

    #[test]
    fn test_cards_follow_display_visibility() {
        let cards = route_cards(&routes(), &[]);
        assert_eq!(cards.len(), 2);
        assert!(!cards[0].on_map);
        assert_eq!(cards[0].badge(), "⚡ LOW RISK");
        assert_eq!(cards[1].color, RiskLevel::Medium.color());
        assert!(cards[0].to_string().contains("(hidden)"));
        assert!(cards[1].to_string().contains("Average risk: 58%  Peak risk: 72%"));
    }
}
