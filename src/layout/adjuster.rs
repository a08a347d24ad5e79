//! Keyboard-safe container styling.
//!
//! Both operations are pure functions of `(window height, keyboard height,
//! policy)`: calling either one repeatedly with the same input yields the same
//! output, with nothing accumulated between calls.

use crate::config::KeyboardPolicy;
use crate::publish::{self, css_px, CustomProperties};
use serde::Serialize;

/// Inline style for the dictation container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerStyle {
    /// Container height in CSS px.
    pub height: f64,
    /// Vertical lift in CSS px (0 when reset). Rendered as `translateY(-lift)`.
    pub lift: f64,
    /// CSS `transition` value; identical for adjust and reset.
    pub transition: String,
}

impl ContainerStyle {
    /// CSS `transform` value.
    pub fn transform(&self) -> String {
        format!("translateY({})", css_px(-self.lift))
    }

    /// Render as inline declarations.
    pub fn to_css(&self) -> String {
        format!(
            "height: {}; transform: {}; transition: {};",
            css_px(self.height),
            self.transform(),
            self.transition
        )
    }
}

/// Complete adjuster output: inline style plus custom properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutOutput {
    /// Keyboard height the output was computed for.
    pub keyboard_height: f64,
    /// Container inline style.
    pub style: ContainerStyle,
    /// `--keyboard-height`, `--adjusted-height` and `--mobile-vh`.
    pub properties: CustomProperties,
}

/// Cosmetic lift for a keyboard of `keyboard_height`:
/// `min(keyboard_height / lift_divisor, transform_cap_px)`.
///
/// The lift keeps the caret area in view without chasing the full keyboard
/// height, which would move the whole page by hundreds of pixels.
pub fn lift_for(keyboard_height: f64, policy: &KeyboardPolicy) -> f64 {
    if keyboard_height <= 0.0 || policy.lift_divisor <= 0.0 {
        return 0.0;
    }
    (keyboard_height / policy.lift_divisor).min(policy.transform_cap_px)
}

/// Computes container styles for the keyboard-up and keyboard-down layouts.
#[derive(Debug, Clone)]
pub struct LayoutAdjuster {
    policy: KeyboardPolicy,
    window_inner_height: f64,
    output: LayoutOutput,
}

impl LayoutAdjuster {
    /// Start in the reset (full-height) layout.
    pub fn new(policy: KeyboardPolicy, window_inner_height: f64) -> Self {
        let output = compute(&policy, window_inner_height, 0.0);
        Self {
            policy,
            window_inner_height,
            output,
        }
    }

    /// Current output.
    pub fn output(&self) -> &LayoutOutput {
        &self.output
    }

    /// Keyboard-free window height.
    pub fn window_inner_height(&self) -> f64 {
        self.window_inner_height
    }

    /// Whether a keyboard adjustment is held.
    pub fn is_adjusted(&self) -> bool {
        self.output.keyboard_height > 0.0
    }

    /// Track a new window height, keeping the current keyboard adjustment.
    ///
    /// Returns `true` when the output changed.
    pub fn set_window_inner_height(&mut self, window_inner_height: f64) -> bool {
        if self.window_inner_height == window_inner_height {
            return false;
        }
        self.window_inner_height = window_inner_height;
        self.replace(compute(&self.policy, window_inner_height, self.output.keyboard_height))
    }

    /// Shrink the container to sit above a keyboard of `keyboard_height` and
    /// lift it by the capped cosmetic offset.
    pub fn adjust_for_keyboard(&mut self, keyboard_height: f64) -> &LayoutOutput {
        let next = compute(&self.policy, self.window_inner_height, keyboard_height);
        self.replace(next);
        &self.output
    }

    /// Restore full height, zero lift, and zero keyboard properties.
    pub fn reset_layout(&mut self) -> &LayoutOutput {
        let next = compute(&self.policy, self.window_inner_height, 0.0);
        self.replace(next);
        &self.output
    }

    fn replace(&mut self, next: LayoutOutput) -> bool {
        if self.output == next {
            return false;
        }
        self.output = next;
        true
    }
}

fn compute(policy: &KeyboardPolicy, window_inner_height: f64, keyboard_height: f64) -> LayoutOutput {
    let keyboard_height = keyboard_height.max(0.0);
    let height = (window_inner_height - keyboard_height).max(0.0);

    let style = ContainerStyle {
        height,
        lift: lift_for(keyboard_height, policy),
        transition: policy.transition.css(),
    };

    let mut properties = CustomProperties::new();
    properties.set_px(publish::KEYBOARD_HEIGHT, keyboard_height);
    properties.set_px(publish::ADJUSTED_HEIGHT, height);
    properties.set_px(publish::MOBILE_VH, height / 100.0);

    LayoutOutput {
        keyboard_height,
        style,
        properties,
    }
}
