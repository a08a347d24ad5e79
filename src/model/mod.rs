//! Domain model types (pure).
//!
//! All types in this module are plain values; state that carries invariants is
//! only constructible through deriving constructors.

pub mod container;
pub mod error;
pub mod focus;
pub mod geometry;
pub mod metrics;
pub mod viewport_state;

// Re-export for convenience
pub use container::LayoutContainerState;
pub use error::{AppError, TraceError};
pub use focus::{CaretSnapshot, ElementId, TextareaFocusState};
pub use geometry::{
    GeometrySample, Orientation, SafeAreaInsets, ViewportConfig, ViewportPatch,
    VisualViewportHandle,
};
pub use metrics::{BudgetReport, BudgetViolation, PerformanceMetrics};
pub use viewport_state::ViewportState;
