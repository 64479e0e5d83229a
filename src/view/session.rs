//! Route/marker reconciliation for one search
//!
//! A [`MapSession`] owns everything drawn for the current search: the route
//! list, one [`RouteDisplay`] per rendered route and the placed markers.
//! Displays refer to their route by index into [`MapSession::routes`], so
//! the cards, the comparison table and the map always read the same
//! (reclassified) route values.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, instrument, warn};

use crate::config::ViewConfig;
use crate::directions::{DirectionsProvider, DirectionsRoute, RouteOptions};
use crate::geo::Bounds;
use crate::models::{LatLng, Route};
use crate::risk;

use super::map::{MapSurface, MarkerId, PathId, ZoomWindow};
use super::markers::{self, Endpoint, HazardRule, MarkerTag};
use super::style::{focus_style, route_style};

/// Binding of a rendered path to route `index`
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDisplay {
    pub index: usize,
    pub path_id: PathId,
    pub path: Vec<LatLng>,
    pub bounds: Option<Bounds>,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedMarker {
    pub id: MarkerId,
    pub tag: MarkerTag,
}

/// Counts path lookups so the viewport is fitted exactly once, as soon as
/// every lookup of the search has resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitTracker {
    expected: usize,
    resolved: usize,
    fitted: bool,
}

impl FitTracker {
    #[must_use]
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            resolved: 0,
            fitted: false,
        }
    }

    /// Record one finished lookup, successful or not. Returns true when this
    /// was the last outstanding lookup and no fit has happened yet.
    pub fn resolve(&mut self) -> bool {
        self.resolved = (self.resolved + 1).min(self.expected);
        self.take_fit_if(self.resolved == self.expected)
    }

    /// Returns true if the deadline fit should run now
    pub fn deadline_elapsed(&mut self) -> bool {
        self.take_fit_if(true)
    }

    fn take_fit_if(&mut self, condition: bool) -> bool {
        if condition && !self.fitted {
            self.fitted = true;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.expected - self.resolved
    }
}

/// Tunables of a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    pub fit_deadline: Duration,
    pub hazards: HazardRule,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            fit_deadline: Duration::from_secs(3),
            hazards: HazardRule::default(),
        }
    }
}

impl From<&ViewConfig> for SessionOptions {
    fn from(config: &ViewConfig) -> Self {
        Self {
            fit_deadline: config.fit_deadline(),
            hazards: HazardRule::from(config),
        }
    }
}

pub struct MapSession<M: MapSurface> {
    surface: M,
    directions: Arc<dyn DirectionsProvider>,
    options: SessionOptions,
    routes: Vec<Route>,
    displays: Vec<RouteDisplay>,
    markers: Vec<PlacedMarker>,
}

async fn lookup_path(
    directions: Arc<dyn DirectionsProvider>,
    origin: String,
    destination: String,
    options: RouteOptions,
) -> Result<Vec<DirectionsRoute>> {
    directions.route(&origin, &destination, &options).await
}

impl<M: MapSurface> MapSession<M> {
    pub fn new(surface: M, directions: Arc<dyn DirectionsProvider>, options: SessionOptions) -> Self {
        Self {
            surface,
            directions,
            options,
            routes: Vec::new(),
            displays: Vec::new(),
            markers: Vec::new(),
        }
    }

    /// Routes of the current search, after reclassification
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[must_use]
    pub fn displays(&self) -> &[RouteDisplay] {
        &self.displays
    }

    #[must_use]
    pub fn display(&self, index: usize) -> Option<&RouteDisplay> {
        self.displays.iter().find(|d| d.index == index)
    }

    #[must_use]
    pub fn markers(&self) -> &[PlacedMarker] {
        &self.markers
    }

    #[must_use]
    pub fn surface(&self) -> &M {
        &self.surface
    }

    /// Remove every path and marker of the current search from the map
    pub fn dispose(&mut self) {
        for display in self.displays.drain(..) {
            self.surface.remove_path(display.path_id);
        }
        for marker in self.markers.drain(..) {
            self.surface.remove_marker(marker.id);
        }
        self.routes.clear();
    }

    /// Draw the results of a new search.
    ///
    /// The previous search is disposed first. Paths are looked up one route
    /// at a time; a failed lookup only loses that route's visuals. The
    /// viewport is fitted once all lookups resolved or once the fit deadline
    /// passed, whichever comes first.
    #[instrument(skip(self, routes), fields(routes = routes.len()))]
    pub async fn begin(&mut self, routes: Vec<Route>, origin: &str, destination: &str) {
        self.dispose();

        self.routes = routes;
        for route in &mut self.routes {
            risk::reclassify(route);
        }

        self.add_location_marker(Endpoint::Origin, origin).await;
        self.add_location_marker(Endpoint::Destination, destination).await;

        let deadline = Instant::now() + self.options.fit_deadline;
        let mut tracker = FitTracker::new(self.routes.len());

        for index in 0..self.routes.len() {
            let options = RouteOptions::for_route(&self.routes[index], index);
            let lookup = lookup_path(
                Arc::clone(&self.directions),
                origin.to_string(),
                destination.to_string(),
                options,
            );
            tokio::pin!(lookup);

            let result = if tracker.is_fitted() {
                lookup.await
            } else {
                tokio::select! {
                    result = &mut lookup => result,
                    () = sleep_until(deadline) => {
                        if tracker.deadline_elapsed() {
                            debug!(pending = tracker.pending(), "Fit deadline elapsed");
                            self.fit_visible();
                        }
                        lookup.await
                    }
                }
            };

            match result {
                Ok(found) => match found.into_iter().next() {
                    Some(directions) => self.attach(index, directions.path()),
                    None => warn!("No path returned for route {}", index + 1),
                },
                Err(e) => warn!("Path lookup for route {} failed: {e:#}", index + 1),
            }

            if tracker.resolve() {
                self.fit_visible();
            }
        }

        // no lookups at all
        if tracker.deadline_elapsed() {
            self.fit_visible();
        }

        info!(
            "Rendered {} of {} routes",
            self.displays.len(),
            self.routes.len()
        );
    }

    async fn add_location_marker(&mut self, endpoint: Endpoint, address: &str) {
        match self.directions.geocode(address).await {
            Ok(position) => {
                let id = self
                    .surface
                    .add_marker(markers::location_marker(endpoint, address, position));
                self.markers.push(PlacedMarker {
                    id,
                    tag: MarkerTag::Location,
                });
            }
            Err(e) => warn!("Geocoding '{address}' failed: {e:#}"),
        }
    }

    fn attach(&mut self, index: usize, path: Vec<LatLng>) {
        if path.is_empty() {
            warn!("Route {} has no path geometry", index + 1);
            return;
        }
        let route = &self.routes[index];
        let path_id = self
            .surface
            .add_path(path.clone(), route_style(route.risk_level, index));

        let mut specs: Vec<_> = markers::identifier_marker(index, route, &path)
            .into_iter()
            .collect();
        specs.extend(markers::hazard_markers(
            index,
            route,
            &path,
            &self.options.hazards,
        ));
        for spec in specs {
            let tag = spec.tag;
            let id = self.surface.add_marker(spec);
            self.markers.push(PlacedMarker { id, tag });
        }

        self.displays.push(RouteDisplay {
            index,
            path_id,
            bounds: Bounds::from_points(&path),
            path,
            visible: true,
        });
    }

    fn display_position(&self, index: usize) -> Option<usize> {
        self.displays.iter().position(|d| d.index == index)
    }

    /// Draw every route with its regular style and show every marker
    pub fn show_all(&mut self) {
        for display in &mut self.displays {
            let level = self.routes[display.index].risk_level;
            self.surface.set_path_attached(display.path_id, true);
            self.surface
                .set_path_style(display.path_id, route_style(level, display.index));
            display.visible = true;
        }
        for marker in &self.markers {
            self.surface.set_marker_visible(marker.id, true);
        }
        self.fit_visible();
    }

    /// Remove every route from the map, keeping only the location markers
    pub fn hide_all(&mut self) {
        for display in &mut self.displays {
            self.surface.set_path_attached(display.path_id, false);
            display.visible = false;
        }
        for marker in &self.markers {
            self.surface
                .set_marker_visible(marker.id, marker.tag == MarkerTag::Location);
        }
    }

    /// Flip one route's visibility. Returns the new state, or `None` when
    /// there is no display for `index`.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let Some(position) = self.display_position(index) else {
            warn!("Route {} not found or not rendered", index + 1);
            return None;
        };

        let level = self.routes[index].risk_level;
        let display = &mut self.displays[position];
        display.visible = !display.visible;
        let visible = display.visible;

        self.surface.set_path_attached(display.path_id, visible);
        if visible {
            self.surface
                .set_path_style(display.path_id, route_style(level, index));
        }
        for marker in &self.markers {
            if marker.tag.route_index() == Some(index) {
                self.surface.set_marker_visible(marker.id, visible);
            }
        }
        Some(visible)
    }

    /// Show route `index` alone, emphasized, with only its own markers
    pub fn focus(&mut self, index: usize) {
        let Some(position) = self.display_position(index) else {
            warn!("Route {} not found or not rendered", index + 1);
            return;
        };

        for display in &mut self.displays {
            let focused = display.index == index;
            self.surface.set_path_attached(display.path_id, focused);
            display.visible = focused;
        }

        let display = &self.displays[position];
        self.surface.set_path_style(
            display.path_id,
            focus_style(self.routes[index].risk_level),
        );

        for marker in &self.markers {
            let visible = match marker.tag.route_index() {
                None => true,
                Some(route) => route == index,
            };
            self.surface.set_marker_visible(marker.id, visible);
        }

        match display.bounds {
            Some(bounds) => self.surface.fit_bounds(bounds, ZoomWindow::SINGLE_ROUTE),
            None => warn!("Route {} has no path data to fit", index + 1),
        }
    }

    /// Fit the viewport to every visible path. Leaves it unchanged when
    /// nothing is visible.
    pub fn fit_visible(&mut self) {
        let bounds = self
            .displays
            .iter()
            .filter(|d| d.visible)
            .filter_map(|d| d.bounds)
            .reduce(Bounds::union);

        match bounds {
            Some(bounds) => self.surface.fit_bounds(bounds, ZoomWindow::ALL_ROUTES),
            None => warn!("No visible routes to fit map to"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_fires_once_on_last_lookup() {
        let mut tracker = FitTracker::new(3);
        assert!(!tracker.resolve());
        assert!(!tracker.resolve());
        assert_eq!(tracker.pending(), 1);
        assert!(tracker.resolve());
        assert!(tracker.is_fitted());
        assert!(!tracker.resolve());
        assert!(!tracker.deadline_elapsed());
    }

    #[test]
    fn test_tracker_deadline_preempts_completion() {
        let mut tracker = FitTracker::new(2);
        assert!(!tracker.resolve());
        assert!(tracker.deadline_elapsed());
        assert!(!tracker.resolve());
    }

    #[test]
    fn test_tracker_with_no_lookups() {
        let mut tracker = FitTracker::new(0);
        assert!(tracker.deadline_elapsed());
        assert!(!tracker.deadline_elapsed());
    }

    #[test]
    fn test_session_options_from_config() {
        let options = SessionOptions::from(&ViewConfig::default());
        assert_eq!(options, SessionOptions::default());
    }
}
