use crate::models::RiskLevel;

use super::map::PathStyle;

/// Opacity cycle keyed by route index mod 5
const OPACITY_PATTERN: [f64; 5] = [0.9, 0.8, 0.9, 0.7, 0.85];

pub const FOCUS_WEIGHT: u32 = 12;
pub const FOCUS_OPACITY: f64 = 1.0;
pub const FOCUS_Z_INDEX: i32 = 2000;

/// Regular style of route `index`. Earlier routes draw on top.
#[must_use]
pub fn route_style(level: RiskLevel, index: usize) -> PathStyle {
    PathStyle {
        color: level.color(),
        weight: level.base_stroke_weight() + (index % 3) as u32,
        opacity: OPACITY_PATTERN[index % OPACITY_PATTERN.len()],
        z_index: 1000 - index as i32,
    }
}

/// Emphasized style of the focused route
#[must_use]
pub fn focus_style(level: RiskLevel) -> PathStyle {
    PathStyle {
        color: level.color(),
        weight: FOCUS_WEIGHT,
        opacity: FOCUS_OPACITY,
        z_index: FOCUS_Z_INDEX,
    }
}
