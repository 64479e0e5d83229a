//! Driver-experience filtering

use crate::models::{DriverExperience, RiskLevel, Route};

/// Highest backend risk level offered to a driver
#[must_use]
pub fn max_allowed(experience: DriverExperience) -> RiskLevel {
    match experience {
        DriverExperience::Beginner => RiskLevel::Low,
        DriverExperience::Intermediate => RiskLevel::Medium,
        DriverExperience::Expert => RiskLevel::High,
    }
}

fn note_for(experience: DriverExperience, level: RiskLevel) -> Option<&'static str> {
    match (experience, level) {
        (_, RiskLevel::Minimal) => None,
        (_, RiskLevel::Low) => Some("Pay extra attention to road conditions"),
        (DriverExperience::Expert, RiskLevel::Medium) => Some("Challenging conditions ahead"),
        (_, RiskLevel::Medium) => Some("Requires careful attention in icy sections"),
        (_, RiskLevel::High) => Some("Extreme conditions - expert skills required"),
    }
}

/// How many routes a driver is still offered when none fit their level
fn fallback_count(experience: DriverExperience) -> usize {
    match experience {
        DriverExperience::Beginner => 1,
        DriverExperience::Intermediate => 2,
        DriverExperience::Expert => 0,
    }
}

/// Drop routes above the driver's level and annotate the rest.
///
/// Order is preserved. Routes above `minimal` get an `experience_note`.
/// When nothing fits, beginners still get the first route and intermediate
/// drivers the first two, so a search never comes back empty.
#[must_use]
pub fn filter_routes(routes: Vec<Route>, experience: DriverExperience) -> Vec<Route> {
    let limit = max_allowed(experience);
    let kept = if routes.iter().any(|route| route.risk_level <= limit) {
        routes
            .into_iter()
            .filter(|route| route.risk_level <= limit)
            .collect()
    } else {
        routes
            .into_iter()
            .take(fallback_count(experience))
            .collect::<Vec<_>>()
    };

    kept.into_iter()
        .map(|mut route| {
            route.experience_note = note_for(experience, route.risk_level).map(str::to_string);
            route
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn routes() -> Vec<Route> {
        [
            RiskLevel::Minimal,
            RiskLevel::Low,
            RiskLevel::Medium,
            RiskLevel::High,
        ]
        .into_iter()
        .map(|level| Route::new(level.as_str(), "10 mi", "15 min", 0.1, 0.2, level))
        .collect()
    }

    #[rstest]
    #[case(DriverExperience::Beginner, &["minimal", "low"])]
    #[case(DriverExperience::Intermediate, &["minimal", "low", "medium"])]
    #[case(DriverExperience::Expert, &["minimal", "low", "medium", "high"])]
    fn test_filter_by_experience(#[case] experience: DriverExperience, #[case] expected: &[&str]) {
        let kept: Vec<String> = filter_routes(routes(), experience)
            .into_iter()
            .map(|r| r.summary)
            .collect();
        assert_eq!(kept, expected);
    }

    #[test]
    fn test_notes_above_minimal() {
        let kept = filter_routes(routes(), DriverExperience::Expert);
        assert!(kept[0].experience_note.is_none());
        assert_eq!(
            kept[1].experience_note.as_deref(),
            Some("Pay extra attention to road conditions")
        );
        assert_eq!(kept[2].experience_note.as_deref(), Some("Challenging conditions ahead"));
        assert_eq!(
            kept[3].experience_note.as_deref(),
            Some("Extreme conditions - expert skills required")
        );
    }

    #[rstest]
    #[case(DriverExperience::Beginner, &["I-94"])]
    #[case(DriverExperience::Intermediate, &["I-94", "US-10"])]
    fn test_fallback_when_nothing_fits(
        #[case] experience: DriverExperience,
        #[case] expected: &[&str],
    ) {
        let all_high = vec![
            Route::new("I-94", "157 mi", "3 h", 0.8, 0.9, RiskLevel::High),
            Route::new("US-10", "170 mi", "3 h 20 min", 0.85, 0.95, RiskLevel::High),
            Route::new("MN-23", "181 mi", "3 h 40 min", 0.9, 1.0, RiskLevel::High),
        ];
        let kept = filter_routes(all_high, experience);
        let names: Vec<&str> = kept.iter().map(|r| r.summary.as_str()).collect();
        assert_eq!(names, expected);
        assert!(kept.iter().all(|r| r.experience_note.is_some()));
    }
}
