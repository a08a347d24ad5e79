//! Session wiring: host events in, custom properties out.
//!
//! [`KeyboardLayoutSession`] owns one instance of every reducer and drives them
//! from [`HostEvent`]s delivered by a [`ViewportSource`]. Each event produces
//! one atomic transition and at most one publish; nothing partial is ever
//! visible to the publisher.

use crate::config::{ContainerChrome, ResolvedConfig};
use crate::focus::{FocusCoordinator, FocusReaction};
use crate::layout::{container_properties, LayoutAdjuster, LayoutOutput};
use crate::model::{
    BudgetReport, ElementId, LayoutContainerState, PerformanceMetrics, TextareaFocusState, ViewportPatch,
    ViewportState,
};
use crate::perf::PerformanceMonitor;
use crate::publish::{CustomProperties, LayoutPublisher};
use crate::safe_area::safe_area_properties;
use crate::source::{FrameHandle, HostEvent, HostEventKind, ListenerId, ViewportSource};
use crate::viewport::{viewport_properties, ViewportMonitor};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// A mounted keyboard-aware layout.
pub struct KeyboardLayoutSession<S: ViewportSource, P: LayoutPublisher> {
    source: S,
    publisher: P,
    monitor: ViewportMonitor,
    focus: FocusCoordinator,
    adjuster: LayoutAdjuster,
    perf: PerformanceMonitor,
    chrome: ContainerChrome,
    container: LayoutContainerState,
    listeners: Vec<ListenerId>,
    element_listeners: Vec<ListenerId>,
    pending_frame: Option<FrameHandle>,
    published: Option<CustomProperties>,
    torn_down: bool,
}

impl<S: ViewportSource, P: LayoutPublisher> KeyboardLayoutSession<S, P> {
    /// Read initial geometry, register listeners, start the frame loop, and
    /// publish the initial property set.
    pub fn mount(mut source: S, publisher: P, config: &ResolvedConfig) -> Self {
        let sample = source.geometry();
        let monitor = ViewportMonitor::new(&sample, source.safe_area_env(), config.policy.clone());
        let adjuster = LayoutAdjuster::new(config.policy.clone(), monitor.state().full_height());
        let perf = PerformanceMonitor::start(source.now(), config.budget);

        let mut kinds = vec![
            HostEventKind::WindowResize,
            HostEventKind::OrientationChange,
            HostEventKind::RootResize,
            HostEventKind::SelectionChange,
        ];
        if sample.visual.is_some() {
            kinds.push(HostEventKind::VisualViewportResize);
            kinds.push(HostEventKind::VisualViewportScroll);
        } else {
            warn!("visual viewport unavailable, tracking window resize only");
        }
        let listeners = kinds
            .into_iter()
            .map(|kind| source.add_listener(kind, None))
            .collect::<Vec<_>>();
        let pending_frame = Some(source.request_animation_frame());

        let container = LayoutContainerState::compute(
            &config.chrome,
            adjuster.window_inner_height(),
            0.0,
            page_top(monitor.state()),
        );

        let mut session = Self {
            source,
            publisher,
            monitor,
            focus: FocusCoordinator::new(),
            adjuster,
            perf,
            chrome: config.chrome,
            container,
            listeners,
            element_listeners: Vec::new(),
            pending_frame,
            published: None,
            torn_down: false,
        };
        info!(
            listeners = session.listeners.len(),
            width = session.monitor.state().viewport().width,
            height = session.monitor.state().viewport().height,
            "session mounted"
        );
        session.publish_if_changed();
        session
    }

    // ===== Accessors =====

    /// Current viewport snapshot.
    pub fn viewport(&self) -> Arc<ViewportState> {
        self.monitor.snapshot()
    }

    /// Whether the monitor reports a keyboard.
    pub fn is_keyboard_visible(&self) -> bool {
        self.monitor.is_keyboard_visible()
    }

    /// Keyboard height in px, 0 when hidden.
    pub fn keyboard_height(&self) -> f64 {
        self.monitor.keyboard_height()
    }

    /// The focus coordinator.
    pub fn focus(&self) -> &FocusCoordinator {
        &self.focus
    }

    /// Focus state of the bound element.
    pub fn focus_state(&self) -> &TextareaFocusState {
        self.focus.state()
    }

    /// Latest layout adjuster output.
    pub fn layout(&self) -> &LayoutOutput {
        self.adjuster.output()
    }

    /// Container heights from the last compose.
    pub fn container(&self) -> &LayoutContainerState {
        &self.container
    }

    /// The host adapter.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The host adapter, for driving a mock host.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// The property publisher.
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Whether `teardown` has run.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Properties from the most recent publish.
    pub fn published(&self) -> Option<&CustomProperties> {
        self.published.as_ref()
    }

    // ===== Event Handling =====

    /// Drain every queued host event. Returns `true` if any changed state.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Some(event) = self.source.next_event() {
            changed |= self.handle(event);
        }
        changed
    }

    /// Apply one host event. Returns `true` if observable state changed.
    pub fn handle(&mut self, event: HostEvent) -> bool {
        if self.torn_down {
            trace!(?event, "event after teardown ignored");
            return false;
        }
        let changed = if event.is_geometry() {
            self.on_geometry_change()
        } else {
            self.on_non_geometry_event(event)
        };
        if changed {
            self.publish_if_changed();
        }
        changed
    }

    /// Re-read geometry and insets; the event itself carries no payload.
    fn on_geometry_change(&mut self) -> bool {
        let env = self.source.safe_area_env();
        let sample = self.source.geometry();
        let insets_changed = self.monitor.set_env_insets(env);
        let geometry_changed = self.monitor.apply_geometry(&sample);
        if insets_changed || geometry_changed {
            self.after_viewport_change();
            true
        } else {
            false
        }
    }

    fn on_non_geometry_event(&mut self, event: HostEvent) -> bool {
        match event {
            HostEvent::Focus(element) => {
                let caret = self.source.caret(&element).unwrap_or_default();
                let before = self.focus.phase();
                let reaction = self.focus.on_focus(&element, caret, &self.monitor.snapshot());
                self.perf.mark_input(self.source.now());
                self.apply_reaction(reaction);
                before != self.focus.phase() || reaction != FocusReaction::None
            }
            HostEvent::Blur(element) => {
                let before = self.focus.phase();
                let reaction = self.focus.on_blur(&element);
                self.apply_reaction(reaction);
                before != self.focus.phase() || reaction != FocusReaction::None
            }
            HostEvent::SelectionChange => self.on_selection_change(),
            HostEvent::Scroll(element) => {
                let active = self.source.active_element();
                match self.source.caret(&element) {
                    Some(caret) => {
                        let changed = self.focus.on_scroll(&element, active.as_ref(), caret.scroll_top);
                        if changed {
                            self.perf.mark_input(self.source.now());
                        }
                        changed
                    }
                    None => false,
                }
            }
            HostEvent::Input(_) => {
                self.perf.mark_input(self.source.now());
                false
            }
            HostEvent::AnimationFrame { timestamp } => {
                self.perf.record_frame(timestamp);
                self.pending_frame = Some(self.source.request_animation_frame());
                false
            }
            // Routed through `on_geometry_change`.
            HostEvent::WindowResize
            | HostEvent::OrientationChange
            | HostEvent::VisualViewportResize
            | HostEvent::VisualViewportScroll
            | HostEvent::RootResize => false,
        }
    }

    fn on_selection_change(&mut self) -> bool {
        let Some(element) = self.focus.bound_element().cloned() else {
            return false;
        };
        // Detached element: nothing to read.
        let Some(caret) = self.source.caret(&element) else {
            return false;
        };
        let active = self.source.active_element();
        let changed = self.focus.on_selection_change(&element, active.as_ref(), caret);
        if changed {
            self.perf.mark_input(self.source.now());
        }
        changed
    }

    // ===== Operations =====

    /// Bind the text element whose focus drives keyboard adjustment.
    ///
    /// Rebinding the same element is a no-op. Binding an element that already
    /// holds focus enters the focused state immediately.
    pub fn bind_textarea(&mut self, element: ElementId) {
        if self.torn_down || self.focus.bound_element() == Some(&element) {
            return;
        }
        self.release_element_listeners();
        let reaction = self.focus.bind(element.clone());
        self.apply_reaction(reaction);
        for kind in HostEventKind::ALL.into_iter().filter(|kind| kind.is_element_scoped()) {
            let id = self.source.add_listener(kind, Some(&element));
            self.element_listeners.push(id);
        }
        if self.source.active_element().as_ref() == Some(&element) {
            let caret = self.source.caret(&element).unwrap_or_default();
            let reaction = self.focus.on_focus(&element, caret, &self.monitor.snapshot());
            self.apply_reaction(reaction);
        }
        debug!(element = %element, "textarea bound");
        self.publish_if_changed();
    }

    /// Release the bound element and its listeners, resetting any adjustment.
    pub fn unbind_textarea(&mut self) {
        self.release_element_listeners();
        let reaction = self.focus.unbind();
        self.apply_reaction(reaction);
        self.publish_if_changed();
    }

    /// Merge a partial viewport config. Returns `true` if state changed.
    pub fn update_viewport(&mut self, patch: ViewportPatch) -> bool {
        if self.torn_down || !self.monitor.update_viewport(&patch) {
            return false;
        }
        self.after_viewport_change();
        self.publish_if_changed();
        true
    }

    /// Restore the default 375×667 portrait preset with no keyboard.
    pub fn reset_viewport(&mut self) -> bool {
        if self.torn_down || !self.monitor.reset_viewport() {
            return false;
        }
        self.after_viewport_change();
        self.publish_if_changed();
        true
    }

    /// Metrics snapshot at the host's current time.
    pub fn measure_performance(&self) -> PerformanceMetrics {
        self.perf.measure_performance(self.source.now())
    }

    /// Measure and check against the configured budget, logging violations.
    pub fn check_budget(&self) -> BudgetReport {
        let report = self.measure_performance().check(self.perf.budget());
        for violation in &report.violations {
            warn!(%violation, "performance budget exceeded");
        }
        report
    }

    /// Remove every listener and cancel the frame loop. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.release_element_listeners();
        for id in self.listeners.drain(..) {
            self.source.remove_listener(id);
        }
        if let Some(handle) = self.pending_frame.take() {
            self.source.cancel_animation_frame(handle);
        }
        self.torn_down = true;
        info!("session torn down");
    }

    // ===== Internals =====

    fn release_element_listeners(&mut self) {
        for id in self.element_listeners.drain(..) {
            self.source.remove_listener(id);
        }
    }

    fn after_viewport_change(&mut self) {
        let state = self.monitor.snapshot();
        self.adjuster.set_window_inner_height(state.full_height());
        let reaction = self.focus.on_viewport_change(&state);
        self.apply_reaction(reaction);
    }

    fn apply_reaction(&mut self, reaction: FocusReaction) {
        match reaction {
            FocusReaction::None => return,
            FocusReaction::Adjust(keyboard_height) => {
                self.perf.mark_layout_start(self.source.now());
                self.adjuster.adjust_for_keyboard(keyboard_height);
                debug!(keyboard_height, "layout adjusted for keyboard");
            }
            FocusReaction::Reset => {
                self.perf.mark_layout_start(self.source.now());
                self.adjuster.reset_layout();
                debug!("layout reset");
            }
        }
    }

    fn compose(&mut self) -> CustomProperties {
        let state = self.monitor.state();
        self.container = LayoutContainerState::compute(
            &self.chrome,
            self.adjuster.window_inner_height(),
            self.adjuster.output().keyboard_height,
            page_top(state),
        );

        let mut properties = safe_area_properties(state.safe_area_insets());
        properties.extend(&viewport_properties(state));
        properties.extend(&container_properties(&self.container));
        if self.adjuster.is_adjusted() {
            properties.extend(&self.adjuster.output().properties);
        }
        properties
    }

    fn publish_if_changed(&mut self) {
        let properties = self.compose();
        if self.published.as_ref() == Some(&properties) {
            return;
        }
        trace!(count = properties.len(), "publishing custom properties");
        self.publisher.publish(&properties);
        self.published = Some(properties);
    }
}

impl<S: ViewportSource, P: LayoutPublisher> Drop for KeyboardLayoutSession<S, P> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn page_top(state: &ViewportState) -> f64 {
    state.visual_viewport().map_or(0.0, |v| v.page_top)
}

#[cfg(test)]
#[path = "integration_tests.rs"]
mod tests;
