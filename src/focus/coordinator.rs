//! Focus/selection observer for the bound dictation element.
//!
//! Pure observer: reads focus, selection, and scroll from host events and
//! reports which layout reaction the keyboard state calls for. It never writes
//! to the element, so content and caret position pass through untouched.

use crate::model::{CaretSnapshot, ElementId, TextareaFocusState, ViewportState};
use tracing::{debug, trace};

/// Coordinator state.
///
/// ```text
/// Idle ──focus──▶ Focused ──keyboard shown──▶ FocusedKeyboardVisible
///  ▲                 ▲  ◀──keyboard hidden──────────┘
///  └──────blur───────┴──────────blur────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusPhase {
    /// Unbound or unfocused.
    #[default]
    Idle,
    /// Bound element holds focus, keyboard hidden.
    Focused,
    /// Bound element holds focus with the keyboard up.
    FocusedKeyboardVisible,
}

/// Layout work requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusReaction {
    /// Nothing to do.
    None,
    /// Lift the container for a keyboard of this height.
    Adjust(f64),
    /// Restore the full-height layout.
    Reset,
}

/// Tracks a single bound text element.
#[derive(Debug, Clone, Default)]
pub struct FocusCoordinator {
    bound: Option<ElementId>,
    phase: FocusPhase,
    state: TextareaFocusState,
    keyboard_height: f64,
}

impl FocusCoordinator {
    /// Unbound and idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> FocusPhase {
        self.phase
    }

    /// Observed focus state.
    pub fn state(&self) -> &TextareaFocusState {
        &self.state
    }

    /// The bound element, if any.
    pub fn bound_element(&self) -> Option<&ElementId> {
        self.bound.as_ref()
    }

    /// Bind to `element`. Rebinding to a different element starts from `Idle`.
    pub fn bind(&mut self, element: ElementId) -> FocusReaction {
        if self.bound.as_ref() == Some(&element) {
            return FocusReaction::None;
        }
        let reaction = self.release();
        debug!(element = %element, "bound text element");
        self.bound = Some(element);
        reaction
    }

    /// Drop the binding. Any pending adjustment is reset.
    pub fn unbind(&mut self) -> FocusReaction {
        let reaction = self.release();
        self.bound = None;
        reaction
    }

    fn release(&mut self) -> FocusReaction {
        let reaction = if self.phase == FocusPhase::FocusedKeyboardVisible {
            FocusReaction::Reset
        } else {
            FocusReaction::None
        };
        self.phase = FocusPhase::Idle;
        self.state = TextareaFocusState::default();
        self.keyboard_height = 0.0;
        reaction
    }

    fn is_bound_to(&self, element: &ElementId) -> bool {
        self.bound.as_ref() == Some(element)
    }

    /// `focus` on `element`: capture caret and viewport height, then sync with
    /// the keyboard (which may already be up when focus moves between fields).
    pub fn on_focus(
        &mut self,
        element: &ElementId,
        caret: CaretSnapshot,
        viewport: &ViewportState,
    ) -> FocusReaction {
        if !self.is_bound_to(element) {
            trace!(element = %element, "focus on unbound element ignored");
            return FocusReaction::None;
        }

        let height = viewport.full_height();
        self.state = TextareaFocusState {
            is_focused: true,
            element: Some(element.clone()),
            selection_start: caret.selection_start,
            selection_end: caret.selection_end,
            scroll_top: caret.scroll_top,
            keyboard_visible: false,
            original_viewport_height: height,
            adjusted_viewport_height: height,
        };
        self.phase = FocusPhase::Focused;
        debug!(element = %element, "text element focused");

        self.on_viewport_change(viewport)
    }

    /// `blur` on `element`. The element back-reference is kept.
    pub fn on_blur(&mut self, element: &ElementId) -> FocusReaction {
        if !self.is_bound_to(element) || !self.state.is_focused {
            return FocusReaction::None;
        }

        let reaction = if self.phase == FocusPhase::FocusedKeyboardVisible {
            FocusReaction::Reset
        } else {
            FocusReaction::None
        };
        self.phase = FocusPhase::Idle;
        self.state.is_focused = false;
        self.state.keyboard_visible = false;
        self.state.adjusted_viewport_height = self.state.original_viewport_height;
        self.keyboard_height = 0.0;
        debug!(element = %element, "text element blurred");
        reaction
    }

    /// `selectionchange`: only recorded while `element` is the document's
    /// active focus target.
    pub fn on_selection_change(
        &mut self,
        element: &ElementId,
        active: Option<&ElementId>,
        caret: CaretSnapshot,
    ) -> bool {
        if !self.accepts(element, active) {
            trace!(element = %element, "selection change for inactive element ignored");
            return false;
        }
        let changed = self.state.selection_start != caret.selection_start
            || self.state.selection_end != caret.selection_end;
        self.state.selection_start = caret.selection_start;
        self.state.selection_end = caret.selection_end;
        changed
    }

    /// `scroll` on the element: same guard as selection changes.
    pub fn on_scroll(&mut self, element: &ElementId, active: Option<&ElementId>, scroll_top: u32) -> bool {
        if !self.accepts(element, active) {
            trace!(element = %element, "scroll for inactive element ignored");
            return false;
        }
        let changed = self.state.scroll_top != scroll_top;
        self.state.scroll_top = scroll_top;
        changed
    }

    fn accepts(&self, element: &ElementId, active: Option<&ElementId>) -> bool {
        self.state.is_focused && self.is_bound_to(element) && active == Some(element)
    }

    /// React to a new viewport snapshot. Only acts while focused.
    pub fn on_viewport_change(&mut self, viewport: &ViewportState) -> FocusReaction {
        if !self.state.is_focused {
            return FocusReaction::None;
        }

        let keyboard_height = viewport.keyboard_height();
        // Rotation or window resize moves the keyboard-free height in any phase.
        let height = viewport.full_height();
        self.state.original_viewport_height = height;
        if self.phase == FocusPhase::Focused {
            self.state.adjusted_viewport_height = height;
        }
        match (self.phase, viewport.is_keyboard_visible()) {
            (FocusPhase::Focused, true) => {
                self.phase = FocusPhase::FocusedKeyboardVisible;
                self.apply_keyboard(keyboard_height);
                debug!(keyboard_height, "focused element entered keyboard-visible phase");
                FocusReaction::Adjust(keyboard_height)
            }
            (FocusPhase::FocusedKeyboardVisible, true) => {
                let unchanged = self.keyboard_height == keyboard_height;
                self.apply_keyboard(keyboard_height);
                if unchanged {
                    FocusReaction::None
                } else {
                    FocusReaction::Adjust(keyboard_height)
                }
            }
            (FocusPhase::FocusedKeyboardVisible, false) => {
                self.phase = FocusPhase::Focused;
                self.state.keyboard_visible = false;
                self.state.adjusted_viewport_height = self.state.original_viewport_height;
                self.keyboard_height = 0.0;
                debug!("keyboard cleared while focused");
                FocusReaction::Reset
            }
            _ => FocusReaction::None,
        }
    }

    fn apply_keyboard(&mut self, keyboard_height: f64) {
        self.keyboard_height = keyboard_height;
        self.state.keyboard_visible = true;
        self.state.adjusted_viewport_height = self.state.original_viewport_height - keyboard_height;
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
