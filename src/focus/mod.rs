//! Text-element focus coordination.

pub mod coordinator;

pub use coordinator::{FocusCoordinator, FocusPhase, FocusReaction};
