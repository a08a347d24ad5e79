//! Safe-area inset resolution.
//!
//! Insets are derived from the host's `env(safe-area-inset-*)` values and then
//! raised to device-class floors for the current orientation:
//!
//! | orientation | top  | right | bottom | left |
//! |-------------|------|-------|--------|------|
//! | portrait    | ≥ 47 | 0     | ≥ 34   | 0    |
//! | landscape   | 0    | ≥ 47  | ≥ 21   | ≥ 47 |
//!
//! The floors are applied even when the host reports real, non-zero values.
//! Whether that is intended for production or leaked from test fixtures is
//! unresolved; zero a floor in config to pass the host value through.

use crate::config::SafeAreaFloors;
use crate::model::{Orientation, SafeAreaInsets};
use crate::publish::{self, CustomProperties};

/// Resolve insets for `orientation` from host-reported base values.
///
/// The result is always non-negative.
pub fn resolve_safe_area(
    orientation: Orientation,
    env: &SafeAreaInsets,
    floors: &SafeAreaFloors,
) -> SafeAreaInsets {
    // Re-clamp: callers may hand us raw values.
    let env = SafeAreaInsets::new(env.top, env.right, env.bottom, env.left);

    match orientation {
        Orientation::Portrait => SafeAreaInsets::new(
            env.top.max(floors.portrait_top),
            0.0,
            env.bottom.max(floors.portrait_bottom),
            0.0,
        ),
        Orientation::Landscape => SafeAreaInsets::new(
            0.0,
            env.right.max(floors.landscape_right),
            env.bottom.max(floors.landscape_bottom),
            env.left.max(floors.landscape_left),
        ),
    }
}

/// `--safe-area-*` custom properties for resolved insets.
pub fn safe_area_properties(insets: &SafeAreaInsets) -> CustomProperties {
    let mut properties = CustomProperties::new();
    properties.set_px(publish::SAFE_AREA_TOP, insets.top);
    properties.set_px(publish::SAFE_AREA_RIGHT, insets.right);
    properties.set_px(publish::SAFE_AREA_BOTTOM, insets.bottom);
    properties.set_px(publish::SAFE_AREA_LEFT, insets.left);
    properties
}
