//! Rendering surface the map session draws on

use crate::geo::Bounds;
use crate::models::LatLng;

use super::markers::MarkerSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(pub u64);

/// Stroke options for a rendered route path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStyle {
    pub color: &'static str,
    pub weight: u32,
    pub opacity: f64,
    pub z_index: i32,
}

/// Zoom range the viewport is clamped to after a fit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomWindow {
    pub min: u8,
    pub max: u8,
}

impl ZoomWindow {
    /// Used when fitting every visible route
    pub const ALL_ROUTES: ZoomWindow = ZoomWindow { min: 6, max: 13 };
    /// Used when fitting a single focused route
    pub const SINGLE_ROUTE: ZoomWindow = ZoomWindow { min: 8, max: 14 };

    #[must_use]
    pub fn clamp(&self, zoom: u8) -> u8 {
        zoom.clamp(self.min, self.max)
    }
}

/// Path and marker primitives of a slippy map.
///
/// Paths start attached (drawn). A detached path keeps its geometry and
/// style and can be attached again.
pub trait MapSurface {
    fn add_path(&mut self, points: Vec<LatLng>, style: PathStyle) -> PathId;
    fn set_path_style(&mut self, id: PathId, style: PathStyle);
    fn set_path_attached(&mut self, id: PathId, attached: bool);
    fn remove_path(&mut self, id: PathId);

    fn add_marker(&mut self, marker: MarkerSpec) -> MarkerId;
    fn set_marker_visible(&mut self, id: MarkerId, visible: bool);
    fn remove_marker(&mut self, id: MarkerId);

    fn fit_bounds(&mut self, bounds: Bounds, zoom: ZoomWindow);
}
