//! Viewport geometry and keyboard tracking.

pub mod keyboard;
pub mod monitor;

pub use keyboard::{detect_keyboard, KeyboardReading};
pub use monitor::{reduce_geometry, viewport_properties, FallbackBaseline, ViewportMonitor};
