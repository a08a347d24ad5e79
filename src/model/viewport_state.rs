//! Frozen viewport snapshot.

use super::geometry::{Orientation, SafeAreaInsets, ViewportConfig, VisualViewportHandle};
use crate::config::KeyboardPolicy;
use serde::Serialize;

/// Aggregate viewport state handed to consumers.
///
/// # Invariants
/// - `is_keyboard_visible() ⇔ keyboard_height() > 0`
/// - `is_reduced_viewport() ⇔ is_keyboard_visible() ∨ viewport().height < 600`
///   (threshold from [`KeyboardPolicy::reduced_height_threshold`])
/// - `orientation() == viewport().orientation`
///
/// Fields are private and there are no setters: the only way to obtain a
/// different state is to derive a new one. The monitor hands out
/// `Arc<ViewportState>` snapshots, so a snapshot held by a consumer never
/// changes underneath it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewportState {
    viewport: ViewportConfig,
    visual_viewport: Option<VisualViewportHandle>,
    is_keyboard_visible: bool,
    keyboard_height: f64,
    safe_area_insets: SafeAreaInsets,
    orientation: Orientation,
    is_reduced_viewport: bool,
}

impl ViewportState {
    /// Derive a state, computing every dependent field from its inputs.
    ///
    /// A non-positive (or NaN) keyboard height yields a hidden keyboard.
    pub fn derive(
        viewport: ViewportConfig,
        visual_viewport: Option<VisualViewportHandle>,
        keyboard_height: f64,
        safe_area_insets: SafeAreaInsets,
        policy: &KeyboardPolicy,
    ) -> Self {
        let keyboard_height = if keyboard_height > 0.0 {
            keyboard_height
        } else {
            0.0
        };
        let is_keyboard_visible = keyboard_height > 0.0;
        let is_reduced_viewport =
            is_keyboard_visible || viewport.height < policy.reduced_height_threshold;

        Self {
            viewport,
            visual_viewport,
            is_keyboard_visible,
            keyboard_height,
            safe_area_insets,
            orientation: viewport.orientation,
            is_reduced_viewport,
        }
    }

    /// Layout viewport config.
    pub fn viewport(&self) -> &ViewportConfig {
        &self.viewport
    }

    /// Visual viewport, when the host has one.
    pub fn visual_viewport(&self) -> Option<&VisualViewportHandle> {
        self.visual_viewport.as_ref()
    }

    /// Whether a keyboard is reported.
    pub fn is_keyboard_visible(&self) -> bool {
        self.is_keyboard_visible
    }

    /// Keyboard height in px, 0 when hidden.
    pub fn keyboard_height(&self) -> f64 {
        self.keyboard_height
    }

    /// Resolved safe-area insets.
    pub fn safe_area_insets(&self) -> &SafeAreaInsets {
        &self.safe_area_insets
    }

    /// Committed orientation.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Keyboard up or window shorter than the reduced-height threshold.
    pub fn is_reduced_viewport(&self) -> bool {
        self.is_reduced_viewport
    }

    /// Height left for content above the keyboard.
    pub fn visible_height(&self) -> f64 {
        self.full_height() - self.keyboard_height
    }

    /// Keyboard-free layout height.
    ///
    /// With a visual viewport the window keeps its full height while the
    /// keyboard is up. Without one the window itself shrinks, so the keyboard
    /// height is added back.
    pub fn full_height(&self) -> f64 {
        match self.visual_viewport {
            Some(_) => self.viewport.height,
            None => self.viewport.height + self.keyboard_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive(height: f64, keyboard: f64) -> ViewportState {
        ViewportState::derive(
            ViewportConfig::new(375.0, height, 2.0),
            None,
            keyboard,
            SafeAreaInsets::ZERO,
            &KeyboardPolicy::default(),
        )
    }

    #[test]
    fn keyboard_visible_iff_positive_height() {
        assert!(derive(667.0, 300.0).is_keyboard_visible());
        assert!(!derive(667.0, 0.0).is_keyboard_visible());
    }

    #[test]
    fn negative_keyboard_height_is_zeroed() {
        let state = derive(667.0, -12.0);
        assert_eq!(state.keyboard_height(), 0.0);
        assert!(!state.is_keyboard_visible());
    }

    #[test]
    fn short_viewport_is_reduced_without_keyboard() {
        let state = derive(599.0, 0.0);
        assert!(state.is_reduced_viewport());
        assert!(!state.is_keyboard_visible());
    }

    #[test]
    fn tall_viewport_without_keyboard_is_not_reduced() {
        assert!(!derive(667.0, 0.0).is_reduced_viewport());
    }

    #[test]
    fn keyboard_makes_viewport_reduced() {
        assert!(derive(900.0, 280.0).is_reduced_viewport());
    }

    #[test]
    fn orientation_mirrors_viewport() {
        let state = ViewportState::derive(
            ViewportConfig::new(800.0, 400.0, 1.0),
            None,
            0.0,
            SafeAreaInsets::ZERO,
            &KeyboardPolicy::default(),
        );
        assert_eq!(state.orientation(), Orientation::Landscape);
        assert_eq!(state.orientation(), state.viewport().orientation);
    }

    #[test]
    fn fallback_full_height_adds_keyboard_back() {
        // No visual viewport: the window already shrank to 367.
        let state = derive(367.0, 300.0);
        assert_eq!(state.full_height(), 667.0);
        assert_eq!(state.visible_height(), 367.0);
    }

    #[test]
    fn visual_viewport_full_height_is_window_height() {
        let state = ViewportState::derive(
            ViewportConfig::new(375.0, 667.0, 2.0),
            Some(VisualViewportHandle::sized(375.0, 367.0)),
            300.0,
            SafeAreaInsets::ZERO,
            &KeyboardPolicy::default(),
        );
        assert_eq!(state.full_height(), 667.0);
        assert_eq!(state.visible_height(), 367.0);
    }
}
