//! Layout container geometry.

use crate::config::ContainerChrome;
use serde::Serialize;

/// Heights of the dictation container and its chrome.
///
/// # Invariants
/// - `available_height == content_height + header_height + footer_height`
/// - `content_height` never increases when `keyboard_adjustment` grows
/// - `content_height >= 0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutContainerState {
    /// Header height in px.
    pub header_height: f64,
    /// Footer height in px.
    pub footer_height: f64,
    /// Height left for scrollable content.
    pub content_height: f64,
    /// Viewport height minus the keyboard adjustment.
    pub available_height: f64,
    /// Whether the header stays pinned while scrolling.
    pub is_header_fixed: bool,
    /// Whether the footer stays pinned above the keyboard.
    pub is_footer_fixed: bool,
    /// Visual-viewport page offset in px.
    pub scroll_position: f64,
    /// Keyboard height subtracted from the viewport.
    pub keyboard_adjustment: f64,
}

impl LayoutContainerState {
    /// Compute container heights for a viewport and keyboard adjustment.
    pub fn compute(
        chrome: &ContainerChrome,
        viewport_height: f64,
        keyboard_adjustment: f64,
        scroll_position: f64,
    ) -> Self {
        let keyboard_adjustment = keyboard_adjustment.max(0.0);
        let content_height = (viewport_height
            - chrome.header_height
            - chrome.footer_height
            - keyboard_adjustment)
            .max(0.0);

        Self {
            header_height: chrome.header_height,
            footer_height: chrome.footer_height,
            content_height,
            available_height: content_height + chrome.header_height + chrome.footer_height,
            is_header_fixed: chrome.header_fixed,
            is_footer_fixed: chrome.footer_fixed,
            scroll_position,
            keyboard_adjustment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_is_sum_of_parts() {
        let state = LayoutContainerState::compute(&ContainerChrome::default(), 667.0, 0.0, 0.0);
        assert_eq!(state.content_height, 667.0 - 56.0 - 64.0);
        assert_eq!(
            state.available_height,
            state.content_height + state.header_height + state.footer_height
        );
    }

    #[test]
    fn keyboard_shrinks_content() {
        let chrome = ContainerChrome::default();
        let open = LayoutContainerState::compute(&chrome, 667.0, 300.0, 0.0);
        let closed = LayoutContainerState::compute(&chrome, 667.0, 0.0, 0.0);
        assert!(open.content_height < closed.content_height);
        assert_eq!(open.content_height, 247.0);
    }

    #[test]
    fn content_never_goes_negative() {
        let state = LayoutContainerState::compute(&ContainerChrome::default(), 200.0, 500.0, 0.0);
        assert_eq!(state.content_height, 0.0);
        assert_eq!(state.available_height, 120.0);
    }
}
