//! Geographic helpers: great-circle distance, route sampling and bounds

use serde::{Deserialize, Serialize};

use crate::models::LatLng;

/// Great-circle distance between two points in meters
#[must_use]
pub fn distance_m(from: LatLng, to: LatLng) -> f64 {
    haversine::distance(
        haversine::Location {
            latitude: from.lat,
            longitude: from.lng,
        },
        haversine::Location {
            latitude: to.lat,
            longitude: to.lng,
        },
        haversine::Units::Kilometers,
    ) * 1000.0
}

/// Keep the first point, then every point at which at least `interval_m`
/// of path length has accumulated since the last kept point. The last point
/// is always kept.
#[must_use]
pub fn sample_points(points: &[LatLng], interval_m: f64) -> Vec<LatLng> {
    let Some(first) = points.first() else {
        return Vec::new();
    };

    let mut sampled = vec![*first];
    let mut total = 0.0;
    let mut last_sampled = 0.0;

    for pair in points.windows(2) {
        total += distance_m(pair[0], pair[1]);
        if total - last_sampled >= interval_m {
            sampled.push(pair[1]);
            last_sampled = total;
        }
    }

    if let Some(last) = points.last() {
        if !sampled.contains(last) {
            sampled.push(*last);
        }
    }

    sampled
}

/// Path point nearest to `target`, if it lies within `tolerance_m`.
#[must_use]
pub fn closest_point_within(path: &[LatLng], target: LatLng, tolerance_m: f64) -> Option<LatLng> {
    path.iter()
        .map(|p| (*p, distance_m(*p, target)))
        .filter(|(_, d)| *d <= tolerance_m)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(p, _)| p)
}

/// Axis-aligned lat/lng rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub southwest: LatLng,
    pub northeast: LatLng,
}

impl Bounds {
    #[must_use]
    pub fn from_point(point: LatLng) -> Self {
        Self {
            southwest: point,
            northeast: point,
        }
    }

    /// Bounds covering every point, `None` when empty
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a LatLng>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::from_point(*first);
        for p in iter {
            bounds.extend(*p);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: LatLng) {
        self.southwest.lat = self.southwest.lat.min(point.lat);
        self.southwest.lng = self.southwest.lng.min(point.lng);
        self.northeast.lat = self.northeast.lat.max(point.lat);
        self.northeast.lng = self.northeast.lng.max(point.lng);
    }

    #[must_use]
    pub fn union(mut self, other: Bounds) -> Self {
        self.extend(other.southwest);
        self.extend(other.northeast);
        self
    }

    #[must_use]
    pub fn contains(&self, point: LatLng) -> bool {
        (self.southwest.lat..=self.northeast.lat).contains(&point.lat)
            && (self.southwest.lng..=self.northeast.lng).contains(&point.lng)
    }

    #[must_use]
    pub fn center(&self) -> LatLng {
        self.southwest.lerp(self.northeast, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINNEAPOLIS: LatLng = LatLng::new(44.9778, -93.2650);
    const DULUTH: LatLng = LatLng::new(46.7867, -92.1005);

    #[test]
    fn test_distance_same_point() {
        assert!(distance_m(MINNEAPOLIS, MINNEAPOLIS) < 0.001);
    }

    #[test]
    fn test_distance_known_pair() {
        // Minneapolis to Duluth is roughly 220 km as the crow flies
        let d = distance_m(MINNEAPOLIS, DULUTH);
        assert!(d > 200_000.0 && d < 235_000.0, "got {d}");
    }

    #[test]
    fn test_sampling_keeps_endpoints() {
        let points: Vec<LatLng> = (0..=10)
            .map(|i| MINNEAPOLIS.lerp(DULUTH, f64::from(i) / 10.0))
            .collect();
        let sampled = sample_points(&points, 50_000.0);
        assert_eq!(sampled.first(), Some(&MINNEAPOLIS));
        assert_eq!(sampled.last(), Some(&DULUTH));
        // ~22 km steps, a sample roughly every third point
        assert!(sampled.len() >= 4 && sampled.len() <= 6, "got {}", sampled.len());
    }

    #[test]
    fn test_sampling_empty_and_single() {
        assert!(sample_points(&[], 50_000.0).is_empty());
        assert_eq!(sample_points(&[DULUTH], 50_000.0), vec![DULUTH]);
    }

    #[test]
    fn test_closest_point_within_tolerance() {
        let path = vec![LatLng::new(45.0, -93.0), LatLng::new(45.02, -93.0)];
        // ~1.1 km north of the second point
        let near = LatLng::new(45.03, -93.0);
        assert_eq!(
            closest_point_within(&path, near, 5000.0),
            Some(LatLng::new(45.02, -93.0))
        );

        // ~11 km away from every path point
        let far = LatLng::new(45.12, -93.0);
        assert_eq!(closest_point_within(&path, far, 5000.0), None);
    }

    #[test]
    fn test_bounds_union_and_contains() {
        let a = Bounds::from_point(MINNEAPOLIS);
        let b = Bounds::from_point(DULUTH);
        let both = a.union(b);
        assert!(both.contains(MINNEAPOLIS));
        assert!(both.contains(DULUTH));
        assert!(both.contains(both.center()));
        assert!(Bounds::from_points(&Vec::<LatLng>::new()).is_none());
    }
}
