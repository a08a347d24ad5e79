//! Layout adjustment for keyboard-safe positioning.

pub mod adjuster;
pub mod container;

pub use adjuster::{lift_for, ContainerStyle, LayoutAdjuster, LayoutOutput};
pub use container::container_properties;
