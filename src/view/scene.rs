//! In-memory map surface backing the headless CLI and the tests

use std::collections::BTreeMap;

use crate::geo::Bounds;
use crate::models::LatLng;

use super::map::{MapSurface, MarkerId, PathId, PathStyle, ZoomWindow};
use super::markers::{MarkerSpec, MarkerTag};

/// Map widget width in pixels used to derive a zoom level from bounds
const VIEWPORT_PX: f64 = 1024.0;
const TILE_PX: f64 = 256.0;
const MAX_ZOOM: u8 = 21;

#[derive(Debug, Clone, PartialEq)]
pub struct ScenePath {
    pub points: Vec<LatLng>,
    pub style: PathStyle,
    pub attached: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneMarker {
    pub spec: MarkerSpec,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub bounds: Bounds,
    pub zoom: u8,
}

#[derive(Debug, Default)]
pub struct SceneMap {
    paths: BTreeMap<PathId, ScenePath>,
    markers: BTreeMap<MarkerId, SceneMarker>,
    next_id: u64,
    viewport: Option<Viewport>,
    fit_count: usize,
}

impl SceneMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    #[must_use]
    pub fn path(&self, id: PathId) -> Option<&ScenePath> {
        self.paths.get(&id)
    }

    #[must_use]
    pub fn marker(&self, id: MarkerId) -> Option<&SceneMarker> {
        self.markers.get(&id)
    }

    pub fn paths(&self) -> impl Iterator<Item = (&PathId, &ScenePath)> {
        self.paths.iter()
    }

    pub fn markers(&self) -> impl Iterator<Item = (&MarkerId, &SceneMarker)> {
        self.markers.iter()
    }

    /// Paths currently drawn
    #[must_use]
    pub fn attached_path_count(&self) -> usize {
        self.paths.values().filter(|p| p.attached).count()
    }

    /// Tags of the markers currently shown
    #[must_use]
    pub fn visible_marker_tags(&self) -> Vec<MarkerTag> {
        self.markers
            .values()
            .filter(|m| m.visible)
            .map(|m| m.spec.tag)
            .collect()
    }

    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Number of viewport fits performed so far
    #[must_use]
    pub fn fit_count(&self) -> usize {
        self.fit_count
    }
}

/// Web-mercator zoom at which `bounds` fills the viewport width or height
fn zoom_for(bounds: &Bounds) -> u8 {
    let lat_span = bounds.northeast.lat - bounds.southwest.lat;
    let lng_span = bounds.northeast.lng - bounds.southwest.lng;
    let span = lat_span.max(lng_span);
    if span <= 0.0 {
        return MAX_ZOOM;
    }
    let zoom = (VIEWPORT_PX * 360.0 / (TILE_PX * span)).log2().floor();
    zoom.clamp(0.0, f64::from(MAX_ZOOM)) as u8
}

impl MapSurface for SceneMap {
    fn add_path(&mut self, points: Vec<LatLng>, style: PathStyle) -> PathId {
        let id = PathId(self.next_id());
        self.paths.insert(
            id,
            ScenePath {
                points,
                style,
                attached: true,
            },
        );
        id
    }

    fn set_path_style(&mut self, id: PathId, style: PathStyle) {
        if let Some(path) = self.paths.get_mut(&id) {
            path.style = style;
        }
    }

    fn set_path_attached(&mut self, id: PathId, attached: bool) {
        if let Some(path) = self.paths.get_mut(&id) {
            path.attached = attached;
        }
    }

    fn remove_path(&mut self, id: PathId) {
        self.paths.remove(&id);
    }

    fn add_marker(&mut self, marker: MarkerSpec) -> MarkerId {
        let id = MarkerId(self.next_id());
        self.markers.insert(
            id,
            SceneMarker {
                spec: marker,
                visible: true,
            },
        );
        id
    }

    fn set_marker_visible(&mut self, id: MarkerId, visible: bool) {
        if let Some(marker) = self.markers.get_mut(&id) {
            marker.visible = visible;
        }
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.markers.remove(&id);
    }

    fn fit_bounds(&mut self, bounds: Bounds, zoom: ZoomWindow) {
        self.viewport = Some(Viewport {
            bounds,
            zoom: zoom.clamp(zoom_for(&bounds)),
        });
        self.fit_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskLevel;
    use crate::view::style::route_style;

    #[test]
    fn test_paths_attach_and_detach() {
        let mut scene = SceneMap::new();
        let id = scene.add_path(
            vec![LatLng::new(45.0, -93.0), LatLng::new(46.0, -92.0)],
            route_style(RiskLevel::Low, 0),
        );
        assert_eq!(scene.attached_path_count(), 1);

        scene.set_path_attached(id, false);
        assert_eq!(scene.attached_path_count(), 0);
        assert_eq!(scene.path(id).unwrap().points.len(), 2);

        scene.remove_path(id);
        assert!(scene.path(id).is_none());
    }

    #[test]
    fn test_fit_clamps_zoom() {
        let mut scene = SceneMap::new();
        let tiny = Bounds::from_point(LatLng::new(45.0, -93.0));
        scene.fit_bounds(tiny, ZoomWindow::ALL_ROUTES);
        assert_eq!(scene.viewport().unwrap().zoom, 13);

        let continent = Bounds {
            southwest: LatLng::new(25.0, -125.0),
            northeast: LatLng::new(49.0, -67.0),
        };
        scene.fit_bounds(continent, ZoomWindow::SINGLE_ROUTE);
        assert_eq!(scene.viewport().unwrap().zoom, 8);
        assert_eq!(scene.fit_count(), 2);
    }

    #[test]
    fn test_zoom_for_state_sized_bounds() {
        // ~2 degrees fits at zoom 9 on a 1024 px wide map
        let bounds = Bounds {
            southwest: LatLng::new(44.9, -93.3),
            northeast: LatLng::new(46.8, -92.1),
        };
        assert_eq!(zoom_for(&bounds), 9);
    }
}
