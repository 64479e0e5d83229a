//! Client-side view of a search: map paths, markers, cards and comparison

pub mod compare;
pub mod controls;
pub mod map;
pub mod markers;
pub mod scene;
pub mod session;
pub mod style;

pub use compare::{Comparison, RouteCard, compare, route_cards};
pub use controls::{Command, shortcut};
pub use map::{MapSurface, MarkerId, PathId, PathStyle, ZoomWindow};
pub use markers::{HazardRule, MarkerSpec, MarkerTag};
pub use scene::SceneMap;
pub use session::{FitTracker, MapSession, RouteDisplay, SessionOptions};
