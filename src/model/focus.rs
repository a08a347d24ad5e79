//! Focus/selection state of the bound text element.

use serde::{Deserialize, Serialize};

/// Opaque back-reference to a host text element.
///
/// The coordinator only ever compares ids; it never owns or mutates the element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(String);

impl ElementId {
    /// Wrap a host element id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Selection and scroll position read from the host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CaretSnapshot {
    /// Selection start offset.
    pub selection_start: u32,
    /// Selection end offset.
    pub selection_end: u32,
    /// Element scroll offset in px.
    pub scroll_top: u32,
}

/// Observed focus state of the bound element.
///
/// # Invariant
/// `adjusted_viewport_height == original_viewport_height - keyboard height`
/// while `keyboard_visible`, otherwise equal to `original_viewport_height`.
/// The coordinator is the only writer and keeps this in step.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TextareaFocusState {
    /// Whether the bound element holds focus.
    pub is_focused: bool,
    /// Retained across blur so late selection/scroll events can be attributed.
    pub element: Option<ElementId>,
    /// Last recorded selection start.
    pub selection_start: u32,
    /// Last recorded selection end.
    pub selection_end: u32,
    /// Last recorded scroll offset.
    pub scroll_top: u32,
    /// Whether the keyboard was up while focused.
    pub keyboard_visible: bool,
    /// Keyboard-free viewport height.
    pub original_viewport_height: f64,
    /// Height left above the keyboard.
    pub adjusted_viewport_height: f64,
}
