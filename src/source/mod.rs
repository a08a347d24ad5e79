//! Host platform ports.
//!
//! The coordination core never touches browser globals. Everything it reads
//! (geometry, insets, focus, caret, timers) and every listener it registers goes
//! through [`ViewportSource`]:
//! - [`MockViewportSource`] - deterministic host for tests and trace replay
//! - `BrowserViewportSource` - `web-sys` adapter (wasm32 only)
//! - [`trace`] - JSONL replay traces driving the mock host

use crate::model::{CaretSnapshot, ElementId, GeometrySample, SafeAreaInsets};

#[cfg(target_arch = "wasm32")]
pub mod browser;
pub mod mock;
pub mod trace;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserViewportSource;
pub use mock::MockViewportSource;

/// Handle for a registered event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wrap an adapter-assigned id.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Handle for a pending animation-frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Wrap an adapter-assigned handle.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw handle.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Kinds of host events the core listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEventKind {
    /// `window` `resize`
    WindowResize,
    /// `window` `orientationchange`
    OrientationChange,
    /// `visualViewport` `resize`
    VisualViewportResize,
    /// `visualViewport` `scroll`
    VisualViewportScroll,
    /// `ResizeObserver` on the document root
    RootResize,
    /// `document` `selectionchange`
    SelectionChange,
    /// element `focus`
    Focus,
    /// element `blur`
    Blur,
    /// element `scroll`
    ElementScroll,
    /// element `input`
    Input,
}

impl HostEventKind {
    /// Every kind, window-level first.
    pub const ALL: [HostEventKind; 10] = [
        Self::WindowResize,
        Self::OrientationChange,
        Self::VisualViewportResize,
        Self::VisualViewportScroll,
        Self::RootResize,
        Self::SelectionChange,
        Self::Focus,
        Self::Blur,
        Self::ElementScroll,
        Self::Input,
    ];

    /// Whether listeners of this kind attach to a specific element.
    pub fn is_element_scoped(self) -> bool {
        matches!(self, Self::Focus | Self::Blur | Self::ElementScroll | Self::Input)
    }

    /// DOM event name.
    pub fn dom_name(self) -> &'static str {
        match self {
            Self::WindowResize | Self::VisualViewportResize | Self::RootResize => "resize",
            Self::OrientationChange => "orientationchange",
            Self::VisualViewportScroll | Self::ElementScroll => "scroll",
            Self::SelectionChange => "selectionchange",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Input => "input",
        }
    }
}

/// One event delivered by the host.
///
/// Geometry events carry no payload: handlers re-read geometry from the source,
/// which makes redundant deliveries of the same change harmless.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// `window` resized.
    WindowResize,
    /// Device rotated.
    OrientationChange,
    /// Visual viewport resized, usually by the keyboard.
    VisualViewportResize,
    /// Visual viewport panned.
    VisualViewportScroll,
    /// Document root resized.
    RootResize,
    /// Document selection moved.
    SelectionChange,
    /// Element gained focus.
    Focus(ElementId),
    /// Element lost focus.
    Blur(ElementId),
    /// Element scrolled.
    Scroll(ElementId),
    /// Element received input.
    Input(ElementId),
    /// Animation-frame callback.
    AnimationFrame {
        /// Frame time (ms).
        timestamp: f64,
    },
}

impl HostEvent {
    /// Listener kind that delivers this event; `None` for animation frames.
    pub fn kind(&self) -> Option<HostEventKind> {
        Some(match self {
            Self::WindowResize => HostEventKind::WindowResize,
            Self::OrientationChange => HostEventKind::OrientationChange,
            Self::VisualViewportResize => HostEventKind::VisualViewportResize,
            Self::VisualViewportScroll => HostEventKind::VisualViewportScroll,
            Self::RootResize => HostEventKind::RootResize,
            Self::SelectionChange => HostEventKind::SelectionChange,
            Self::Focus(_) => HostEventKind::Focus,
            Self::Blur(_) => HostEventKind::Blur,
            Self::Scroll(_) => HostEventKind::ElementScroll,
            Self::Input(_) => HostEventKind::Input,
            Self::AnimationFrame { .. } => return None,
        })
    }

    /// Whether this event should trigger a geometry recompute.
    pub fn is_geometry(&self) -> bool {
        matches!(
            self,
            Self::WindowResize
                | Self::OrientationChange
                | Self::VisualViewportResize
                | Self::VisualViewportScroll
                | Self::RootResize
        )
    }
}

/// Host platform adapter.
///
/// Implementations must be cheap to query: the session reads geometry on every
/// geometry event.
pub trait ViewportSource {
    /// Current window and visual-viewport geometry.
    fn geometry(&self) -> GeometrySample;

    /// `env(safe-area-inset-*)` values as reported by the host (zero if unsupported).
    fn safe_area_env(&self) -> SafeAreaInsets;

    /// The document's active focus target, if it is a known element.
    fn active_element(&self) -> Option<ElementId>;

    /// Selection and scroll of `element`; `None` if the element is detached.
    fn caret(&self, element: &ElementId) -> Option<CaretSnapshot>;

    /// Register a listener. `element` is required for element-scoped kinds.
    fn add_listener(&mut self, kind: HostEventKind, element: Option<&ElementId>) -> ListenerId;

    /// Remove a listener. Unknown ids are ignored.
    fn remove_listener(&mut self, id: ListenerId);

    /// Request one animation frame, delivered as [`HostEvent::AnimationFrame`].
    fn request_animation_frame(&mut self) -> FrameHandle;

    /// Cancel a pending frame. Unknown handles are ignored.
    fn cancel_animation_frame(&mut self, handle: FrameHandle);

    /// High-resolution time in ms, or `None` without a timer.
    fn now(&self) -> Option<f64>;

    /// Next queued host event, if the adapter buffers events.
    fn next_event(&mut self) -> Option<HostEvent> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animation_frame_has_no_listener_kind() {
        assert_eq!(HostEvent::AnimationFrame { timestamp: 16.0 }.kind(), None);
    }

    #[test]
    fn element_events_map_to_element_scoped_kinds() {
        let id = ElementId::new("notes");
        for event in [
            HostEvent::Focus(id.clone()),
            HostEvent::Blur(id.clone()),
            HostEvent::Scroll(id.clone()),
            HostEvent::Input(id),
        ] {
            assert!(event.kind().is_some_and(HostEventKind::is_element_scoped));
            assert!(!event.is_geometry());
        }
    }

    #[test]
    fn geometry_events_are_not_element_scoped() {
        for event in [
            HostEvent::WindowResize,
            HostEvent::OrientationChange,
            HostEvent::VisualViewportResize,
            HostEvent::VisualViewportScroll,
            HostEvent::RootResize,
        ] {
            assert!(event.is_geometry());
            assert!(!event.kind().is_some_and(HostEventKind::is_element_scoped));
        }
    }

    #[test]
    fn dom_names_match_browser_events() {
        assert_eq!(HostEventKind::VisualViewportResize.dom_name(), "resize");
        assert_eq!(HostEventKind::SelectionChange.dom_name(), "selectionchange");
        assert_eq!(HostEventKind::OrientationChange.dom_name(), "orientationchange");
    }
}
