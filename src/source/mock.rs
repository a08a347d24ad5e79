//! Deterministic host adapter.
//!
//! Models just enough of a mobile browser to drive the core: a window, an
//! optional visual viewport, an on-screen keyboard, focusable text elements,
//! listeners, animation frames, and a settable clock. Host mutations queue
//! events only for kinds that currently have a listener, the way a real
//! browser would.

use super::{FrameHandle, HostEvent, HostEventKind, ListenerId, ViewportSource};
use crate::model::{CaretSnapshot, ElementId, GeometrySample, SafeAreaInsets, VisualViewportHandle};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

#[derive(Debug, Clone)]
struct Registration {
    kind: HostEventKind,
    element: Option<ElementId>,
}

/// Scriptable stand-in for a mobile browser.
#[derive(Debug, Clone)]
pub struct MockViewportSource {
    inner_width: f64,
    /// Keyboard-free window height.
    layout_height: f64,
    device_pixel_ratio: f64,
    visual_viewport: bool,
    visual_offset_top: f64,
    keyboard_height: f64,
    env_insets: SafeAreaInsets,
    clock: Option<f64>,
    active: Option<ElementId>,
    carets: HashMap<ElementId, CaretSnapshot>,
    listeners: BTreeMap<ListenerId, Registration>,
    frames: BTreeSet<FrameHandle>,
    next_id: u64,
    queue: VecDeque<HostEvent>,
}

impl MockViewportSource {
    /// A browser with the given window size, a visual viewport, and a clock at 0.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            inner_width: width,
            layout_height: height,
            device_pixel_ratio: 2.0,
            visual_viewport: true,
            visual_offset_top: 0.0,
            keyboard_height: 0.0,
            env_insets: SafeAreaInsets::ZERO,
            clock: Some(0.0),
            active: None,
            carets: HashMap::new(),
            listeners: BTreeMap::new(),
            frames: BTreeSet::new(),
            next_id: 1,
            queue: VecDeque::new(),
        }
    }

    /// iPhone SE: 375×667 portrait.
    pub fn iphone_se() -> Self {
        Self::new(375.0, 667.0)
    }

    /// Builder: drop the Visual Viewport API.
    pub fn without_visual_viewport(mut self) -> Self {
        self.visual_viewport = false;
        self
    }

    /// Builder: drop `performance.now()`.
    pub fn without_clock(mut self) -> Self {
        self.clock = None;
        self
    }

    /// Builder: report these `env(safe-area-inset-*)` values.
    pub fn with_env_insets(mut self, insets: SafeAreaInsets) -> Self {
        self.env_insets = insets;
        self
    }

    // ===== Host mutations =====

    /// Show or hide an on-screen keyboard of `height` px.
    ///
    /// With a visual viewport the visual height shrinks and the window keeps
    /// its height; without one the window itself shrinks. Returns the new
    /// visible height.
    pub fn simulate_keyboard(&mut self, visible: bool, height: f64) -> f64 {
        self.keyboard_height = if visible { height.max(0.0) } else { 0.0 };
        if self.visual_viewport {
            self.emit(HostEvent::VisualViewportResize);
        } else {
            self.emit(HostEvent::WindowResize);
            self.emit(HostEvent::RootResize);
        }
        self.layout_height - self.keyboard_height
    }

    /// Resize the window (keyboard-free size).
    pub fn set_window(&mut self, width: f64, height: f64) {
        self.inner_width = width;
        self.layout_height = height;
        self.emit_window_change();
    }

    /// Swap width and height and fire `orientationchange`.
    pub fn rotate(&mut self) {
        std::mem::swap(&mut self.inner_width, &mut self.layout_height);
        self.emit(HostEvent::OrientationChange);
        self.emit_window_change();
    }

    /// Scroll the visual viewport within the layout viewport.
    pub fn scroll_visual_viewport(&mut self, offset_top: f64) {
        self.visual_offset_top = offset_top;
        if self.visual_viewport {
            self.emit(HostEvent::VisualViewportScroll);
        }
    }

    /// Change the reported `env()` insets. Fires nothing; the next geometry event picks them up.
    pub fn set_env_insets(&mut self, insets: SafeAreaInsets) {
        self.env_insets = insets;
    }

    /// Move document focus to `element`, blurring the previous target.
    pub fn focus(&mut self, element: &ElementId) {
        if self.active.as_ref() == Some(element) {
            return;
        }
        self.blur();
        self.carets.entry(element.clone()).or_default();
        self.active = Some(element.clone());
        self.emit(HostEvent::Focus(element.clone()));
    }

    /// Clear document focus.
    pub fn blur(&mut self) {
        if let Some(previous) = self.active.take() {
            self.emit(HostEvent::Blur(previous));
        }
    }

    /// Change selection inside `element`; fires `selectionchange` on the document.
    pub fn select(&mut self, element: &ElementId, start: u32, end: u32) {
        let caret = self.carets.entry(element.clone()).or_default();
        caret.selection_start = start;
        caret.selection_end = end;
        self.emit(HostEvent::SelectionChange);
    }

    /// Scroll inside `element`.
    pub fn scroll_element(&mut self, element: &ElementId, scroll_top: u32) {
        self.carets.entry(element.clone()).or_default().scroll_top = scroll_top;
        self.emit(HostEvent::Scroll(element.clone()));
    }

    /// Typing inside `element`.
    pub fn type_input(&mut self, element: &ElementId) {
        self.emit(HostEvent::Input(element.clone()));
    }

    /// Remove `element` from the document.
    pub fn detach(&mut self, element: &ElementId) {
        if self.active.as_ref() == Some(element) {
            self.blur();
        }
        self.carets.remove(element);
    }

    /// Set the clock, or remove it with `None`.
    pub fn set_clock(&mut self, now: Option<f64>) {
        self.clock = now;
    }

    /// Move the clock forward. No-op without a clock.
    pub fn advance_clock(&mut self, ms: f64) {
        if let Some(now) = self.clock.as_mut() {
            *now += ms;
        }
    }

    /// Run the pending animation frame, if any, at the current clock.
    ///
    /// Returns `false` when nothing was requested (or everything was cancelled).
    pub fn tick_frame(&mut self) -> bool {
        let Some(handle) = self.frames.iter().next().copied() else {
            return false;
        };
        self.frames.remove(&handle);
        self.queue.push_back(HostEvent::AnimationFrame {
            timestamp: self.clock.unwrap_or(0.0),
        });
        true
    }

    // ===== Inspection =====

    /// Listeners currently registered.
    pub fn active_listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Whether any listener of `kind` is registered.
    pub fn has_listener(&self, kind: HostEventKind) -> bool {
        self.listeners.values().any(|r| r.kind == kind)
    }

    /// Animation frames requested and not yet run or cancelled.
    pub fn pending_frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Events waiting for `next_event`.
    pub fn queued_event_count(&self) -> usize {
        self.queue.len()
    }

    /// Simulated keyboard height.
    pub fn keyboard_height(&self) -> f64 {
        self.keyboard_height
    }

    // ===== Internals =====

    fn window_height(&self) -> f64 {
        if self.visual_viewport {
            self.layout_height
        } else {
            self.layout_height - self.keyboard_height
        }
    }

    fn emit_window_change(&mut self) {
        self.emit(HostEvent::WindowResize);
        self.emit(HostEvent::RootResize);
        if self.visual_viewport {
            self.emit(HostEvent::VisualViewportResize);
        }
    }

    fn emit(&mut self, event: HostEvent) {
        let Some(kind) = event.kind() else {
            return;
        };
        let target = match &event {
            HostEvent::Focus(e) | HostEvent::Blur(e) | HostEvent::Scroll(e) | HostEvent::Input(e) => {
                Some(e)
            }
            _ => None,
        };
        let listening = self
            .listeners
            .values()
            .filter(|r| r.kind == kind && (target.is_none() || r.element.as_ref() == target))
            .count();
        for _ in 0..listening {
            self.queue.push_back(event.clone());
        }
    }

    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl ViewportSource for MockViewportSource {
    fn geometry(&self) -> GeometrySample {
        let visual = self.visual_viewport.then(|| VisualViewportHandle {
            offset_top: self.visual_offset_top,
            page_top: self.visual_offset_top,
            ..VisualViewportHandle::sized(self.inner_width, self.layout_height - self.keyboard_height)
        });
        GeometrySample {
            inner_width: self.inner_width,
            inner_height: self.window_height(),
            device_pixel_ratio: self.device_pixel_ratio,
            visual,
        }
    }

    fn safe_area_env(&self) -> SafeAreaInsets {
        self.env_insets
    }

    fn active_element(&self) -> Option<ElementId> {
        self.active.clone()
    }

    fn caret(&self, element: &ElementId) -> Option<CaretSnapshot> {
        self.carets.get(element).copied()
    }

    fn add_listener(&mut self, kind: HostEventKind, element: Option<&ElementId>) -> ListenerId {
        let id = ListenerId::new(self.allocate());
        self.listeners.insert(
            id,
            Registration {
                kind,
                element: element.cloned(),
            },
        );
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }

    fn request_animation_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle::new(self.allocate());
        self.frames.insert(handle);
        handle
    }

    fn cancel_animation_frame(&mut self, handle: FrameHandle) {
        self.frames.remove(&handle);
    }

    fn now(&self) -> Option<f64> {
        self.clock
    }

    fn next_event(&mut self) -> Option<HostEvent> {
        self.queue.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_shrinks_visual_viewport_only() {
        let mut mock = MockViewportSource::iphone_se();

        let visible = mock.simulate_keyboard(true, 300.0);

        assert_eq!(visible, 367.0);
        let geometry = mock.geometry();
        assert_eq!(geometry.inner_height, 667.0);
        assert_eq!(geometry.visual.map(|v| v.height), Some(367.0));
    }

    #[test]
    fn keyboard_without_visual_viewport_shrinks_window() {
        let mut mock = MockViewportSource::iphone_se().without_visual_viewport();

        mock.simulate_keyboard(true, 300.0);

        let geometry = mock.geometry();
        assert_eq!(geometry.inner_height, 367.0);
        assert!(geometry.visual.is_none());
    }

    #[test]
    fn events_only_queue_for_registered_listeners() {
        let mut mock = MockViewportSource::iphone_se();
        mock.simulate_keyboard(true, 300.0);
        assert_eq!(mock.queued_event_count(), 0);

        mock.add_listener(HostEventKind::VisualViewportResize, None);
        mock.simulate_keyboard(false, 0.0);
        assert_eq!(mock.next_event(), Some(HostEvent::VisualViewportResize));
        assert_eq!(mock.next_event(), None);
    }

    #[test]
    fn element_events_respect_element_scope() {
        let mut mock = MockViewportSource::iphone_se();
        let notes = ElementId::new("notes");
        let search = ElementId::new("search");
        mock.add_listener(HostEventKind::Focus, Some(&notes));

        mock.focus(&search);
        assert_eq!(mock.queued_event_count(), 0);

        mock.focus(&notes);
        assert_eq!(mock.next_event(), Some(HostEvent::Focus(notes.clone())));
        assert_eq!(mock.active_element(), Some(notes));
    }

    #[test]
    fn rotate_swaps_dimensions_and_fires_redundant_events() {
        let mut mock = MockViewportSource::iphone_se();
        mock.add_listener(HostEventKind::WindowResize, None);
        mock.add_listener(HostEventKind::RootResize, None);
        mock.add_listener(HostEventKind::OrientationChange, None);

        mock.rotate();

        let geometry = mock.geometry();
        assert_eq!((geometry.inner_width, geometry.inner_height), (667.0, 375.0));
        assert_eq!(mock.queued_event_count(), 3);
    }

    #[test]
    fn cancelled_frame_never_ticks() {
        let mut mock = MockViewportSource::iphone_se();
        let handle = mock.request_animation_frame();
        mock.cancel_animation_frame(handle);

        assert!(!mock.tick_frame());
        assert_eq!(mock.pending_frame_count(), 0);
    }

    #[test]
    fn tick_frame_uses_clock() {
        let mut mock = MockViewportSource::iphone_se();
        mock.request_animation_frame();
        mock.advance_clock(16.0);

        assert!(mock.tick_frame());
        assert_eq!(mock.next_event(), Some(HostEvent::AnimationFrame { timestamp: 16.0 }));
    }

    #[test]
    fn removed_listener_stops_events() {
        let mut mock = MockViewportSource::iphone_se();
        let id = mock.add_listener(HostEventKind::WindowResize, None);
        mock.remove_listener(id);

        mock.set_window(414.0, 896.0);

        assert_eq!(mock.active_listener_count(), 0);
        assert_eq!(mock.queued_event_count(), 0);
    }

    #[test]
    fn detach_forgets_caret() {
        let mut mock = MockViewportSource::iphone_se();
        let notes = ElementId::new("notes");
        mock.select(&notes, 1, 2);
        mock.detach(&notes);
        assert_eq!(mock.caret(&notes), None);
    }
}
