//! Authoritative viewport state.
//!
//! Every update path (visual-viewport resize/scroll, window resize, the root
//! `ResizeObserver`, explicit patches) funnels into [`reduce_geometry`] or
//! [`ViewportConfig::merged`] and then into a single commit. Commits compare the
//! derived state with the current one and keep the existing snapshot when they
//! are equal, so redundant firings for the same geometry are no-ops.

use super::keyboard::detect_keyboard;
use crate::config::KeyboardPolicy;
use crate::model::{
    GeometrySample, Orientation, SafeAreaInsets, ViewportConfig, ViewportPatch, ViewportState,
};
use crate::publish::{self, CustomProperties};
use crate::safe_area::resolve_safe_area;
use std::sync::Arc;
use tracing::{debug, trace};

/// Reference geometry for keyboard detection without a visual viewport.
///
/// Tracks the tallest window seen since the last rotation; a shorter window of
/// the same width is compared against it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackBaseline {
    /// Orientation the baseline was taken in.
    pub orientation: Orientation,
    /// Window width at the baseline.
    pub width: f64,
    /// Tallest window height seen.
    pub height: f64,
}

impl FallbackBaseline {
    fn from_sample(sample: &GeometrySample) -> Self {
        Self {
            orientation: Orientation::infer(sample.inner_width, sample.inner_height),
            width: sample.inner_width,
            height: sample.inner_height,
        }
    }

    fn from_config(config: &ViewportConfig) -> Self {
        Self {
            orientation: config.orientation,
            width: config.width,
            height: config.height,
        }
    }
}

/// Pure geometry reducer.
///
/// Maps raw host geometry (plus the fallback baseline) to a new state and
/// baseline. Applying the same sample to its own output returns the same state.
pub fn reduce_geometry(
    baseline: &FallbackBaseline,
    sample: &GeometrySample,
    env_insets: &SafeAreaInsets,
    policy: &KeyboardPolicy,
) -> (ViewportState, FallbackBaseline) {
    let (viewport, keyboard_height, baseline) = match sample.visual {
        Some(visual) => {
            let viewport = ViewportConfig::new(
                sample.inner_width,
                sample.inner_height,
                sample.device_pixel_ratio,
            );
            let reading =
                detect_keyboard(sample.inner_height, visual.height, policy.noise_threshold_px);
            (viewport, reading.height, FallbackBaseline::from_config(&viewport))
        }
        None => {
            let baseline = next_baseline(baseline, sample);
            let reading =
                detect_keyboard(baseline.height, sample.inner_height, policy.noise_threshold_px);
            // A keyboard can make a portrait window wider than tall; keep the
            // rotation-stable orientation in that case.
            let orientation = if reading.visible {
                baseline.orientation
            } else {
                Orientation::infer(sample.inner_width, sample.inner_height)
            };
            let viewport = ViewportConfig {
                width: sample.inner_width,
                height: sample.inner_height,
                orientation,
                device_pixel_ratio: sample.device_pixel_ratio,
            };
            (viewport, reading.height, baseline)
        }
    };

    let insets = resolve_safe_area(viewport.orientation, env_insets, &policy.safe_area_floors);
    let state = ViewportState::derive(viewport, sample.visual, keyboard_height, insets, policy);
    (state, baseline)
}

fn next_baseline(previous: &FallbackBaseline, sample: &GeometrySample) -> FallbackBaseline {
    // Same width means the window only changed height (keyboard or chrome),
    // anything else is a rotation or window resize and starts over.
    if previous.width != sample.inner_width {
        return FallbackBaseline::from_sample(sample);
    }
    FallbackBaseline {
        height: previous.height.max(sample.inner_height),
        ..*previous
    }
}

/// Owner of the current [`ViewportState`].
#[derive(Debug, Clone)]
pub struct ViewportMonitor {
    policy: KeyboardPolicy,
    env_insets: SafeAreaInsets,
    baseline: FallbackBaseline,
    state: Arc<ViewportState>,
}

impl ViewportMonitor {
    /// Build the initial state from mount-time geometry.
    pub fn new(sample: &GeometrySample, env_insets: SafeAreaInsets, policy: KeyboardPolicy) -> Self {
        let initial = FallbackBaseline::from_sample(sample);
        let (state, baseline) = reduce_geometry(&initial, sample, &env_insets, &policy);
        Self {
            policy,
            env_insets,
            baseline,
            state: Arc::new(state),
        }
    }

    /// Shared, immutable snapshot of the current state.
    pub fn snapshot(&self) -> Arc<ViewportState> {
        Arc::clone(&self.state)
    }

    /// Borrow the current state.
    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    /// Detection policy.
    pub fn policy(&self) -> &KeyboardPolicy {
        &self.policy
    }

    /// Whether a keyboard is reported.
    pub fn is_keyboard_visible(&self) -> bool {
        self.state.is_keyboard_visible()
    }

    /// Keyboard height in px.
    pub fn keyboard_height(&self) -> f64 {
        self.state.keyboard_height()
    }

    /// Recompute from host geometry. Returns `true` if observable state changed.
    pub fn apply_geometry(&mut self, sample: &GeometrySample) -> bool {
        let (next, baseline) = reduce_geometry(&self.baseline, sample, &self.env_insets, &self.policy);
        self.baseline = baseline;
        self.commit(next)
    }

    /// Merge a partial viewport config.
    ///
    /// An explicit orientation in the patch always wins over inference. The
    /// keyboard height is left untouched; safe-area insets follow the new
    /// orientation.
    pub fn update_viewport(&mut self, patch: &ViewportPatch) -> bool {
        let viewport = self.state.viewport().merged(patch);
        let insets = resolve_safe_area(
            viewport.orientation,
            &self.env_insets,
            &self.policy.safe_area_floors,
        );
        let next = ViewportState::derive(
            viewport,
            self.state.visual_viewport().copied(),
            self.state.keyboard_height(),
            insets,
            &self.policy,
        );
        self.commit(next)
    }

    /// Restore the default mobile preset (portrait) and clear the keyboard.
    pub fn reset_viewport(&mut self) -> bool {
        let viewport = ViewportConfig::new(
            self.policy.default_width,
            self.policy.default_height,
            self.policy.default_device_pixel_ratio,
        );
        let insets = resolve_safe_area(
            viewport.orientation,
            &self.env_insets,
            &self.policy.safe_area_floors,
        );
        self.baseline = FallbackBaseline::from_config(&viewport);
        let next = ViewportState::derive(
            viewport,
            self.state.visual_viewport().copied(),
            0.0,
            insets,
            &self.policy,
        );
        self.commit(next)
    }

    /// Replace the host-reported `env()` insets and re-resolve.
    pub fn set_env_insets(&mut self, env_insets: SafeAreaInsets) -> bool {
        self.env_insets = env_insets;
        let insets = resolve_safe_area(
            self.state.orientation(),
            &self.env_insets,
            &self.policy.safe_area_floors,
        );
        let next = ViewportState::derive(
            *self.state.viewport(),
            self.state.visual_viewport().copied(),
            self.state.keyboard_height(),
            insets,
            &self.policy,
        );
        self.commit(next)
    }

    fn commit(&mut self, next: ViewportState) -> bool {
        if *self.state == next {
            trace!("viewport recompute produced identical state");
            return false;
        }

        let previous = &self.state;
        if previous.orientation() != next.orientation() {
            debug!(
                from = %previous.orientation(),
                to = %next.orientation(),
                insets = ?next.safe_area_insets(),
                "orientation changed"
            );
        }
        match (previous.is_keyboard_visible(), next.is_keyboard_visible()) {
            (false, true) => debug!(height = next.keyboard_height(), "keyboard shown"),
            (true, false) => debug!("keyboard hidden"),
            (true, true) if previous.keyboard_height() != next.keyboard_height() => debug!(
                from = previous.keyboard_height(),
                to = next.keyboard_height(),
                "keyboard resized"
            ),
            _ => {}
        }

        self.state = Arc::new(next);
        true
    }
}

/// Keyboard and height properties as the viewport reports them.
///
/// Published whether or not a text element is focused, so fixed chrome can
/// follow the keyboard on its own. The layout adjuster overlays the same names
/// while it holds an adjustment.
pub fn viewport_properties(state: &ViewportState) -> CustomProperties {
    let visible = state.visible_height().max(0.0);
    let mut properties = CustomProperties::new();
    properties.set_px(publish::KEYBOARD_HEIGHT, state.keyboard_height());
    properties.set_px(publish::ADJUSTED_HEIGHT, visible);
    properties.set_px(publish::MOBILE_VH, visible / 100.0);
    properties
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
