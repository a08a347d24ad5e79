//! Heuristic policy constants for keyboard and safe-area handling.
//!
//! Every magic number the coordination core depends on lives here so the
//! policy can be audited and tuned per device class from the config file.

/// Default mobile preset width (iPhone SE, CSS px).
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 375.0;
/// Default mobile preset height (iPhone SE, CSS px).
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 667.0;

/// Height reductions at or below this are treated as browser chrome jitter
/// (address bar collapse, toolbar show/hide), not a keyboard.
pub const KEYBOARD_NOISE_THRESHOLD_PX: f64 = 50.0;

/// Viewports shorter than this count as reduced even without a keyboard.
pub const REDUCED_HEIGHT_THRESHOLD_PX: f64 = 600.0;

/// Upper bound of the cosmetic lift applied to focused content.
pub const TRANSFORM_CAP_PX: f64 = 50.0;

/// The lift is `keyboard_height / LIFT_DIVISOR`, capped at [`TRANSFORM_CAP_PX`].
pub const LIFT_DIVISOR: f64 = 4.0;

/// Keyboard policy used by the monitor and the layout adjuster.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardPolicy {
    /// Minimum height reduction (exclusive) classified as a keyboard.
    pub noise_threshold_px: f64,
    /// Height below which the viewport is reduced regardless of keyboard.
    pub reduced_height_threshold: f64,
    /// Preset restored by `reset_viewport`.
    pub default_width: f64,
    /// Preset height.
    pub default_height: f64,
    /// Preset pixel ratio.
    pub default_device_pixel_ratio: f64,
    /// Cap for the focused-content lift.
    pub transform_cap_px: f64,
    /// Divisor applied to keyboard height before capping.
    pub lift_divisor: f64,
    /// Animation contract attached to every layout output.
    pub transition: TransitionContract,
    /// Device-class safe-area floors.
    pub safe_area_floors: SafeAreaFloors,
}

impl Default for KeyboardPolicy {
    fn default() -> Self {
        Self {
            noise_threshold_px: KEYBOARD_NOISE_THRESHOLD_PX,
            reduced_height_threshold: REDUCED_HEIGHT_THRESHOLD_PX,
            default_width: DEFAULT_VIEWPORT_WIDTH,
            default_height: DEFAULT_VIEWPORT_HEIGHT,
            default_device_pixel_ratio: 2.0,
            transform_cap_px: TRANSFORM_CAP_PX,
            lift_divisor: LIFT_DIVISOR,
            transition: TransitionContract::default(),
            safe_area_floors: SafeAreaFloors::default(),
        }
    }
}

/// Fixed animation contract for height/transform changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionContract {
    /// Duration of both transitions.
    pub duration_ms: u32,
    /// CSS easing function.
    pub easing: String,
}

impl TransitionContract {
    /// Render as a CSS `transition` value.
    ///
    /// ```
    /// # use keyboard_viewport::config::TransitionContract;
    /// assert_eq!(
    ///     TransitionContract::default().css(),
    ///     "height 0.3s ease-out, transform 0.3s ease-out"
    /// );
    /// ```
    pub fn css(&self) -> String {
        let seconds = crate::publish::css_number(f64::from(self.duration_ms) / 1000.0);
        format!(
            "height {seconds}s {easing}, transform {seconds}s {easing}",
            easing = self.easing
        )
    }
}

impl Default for TransitionContract {
    fn default() -> Self {
        Self {
            duration_ms: 300,
            easing: "ease-out".to_string(),
        }
    }
}

/// Minimum insets simulating notch and home-indicator geometry.
///
/// Applied even when the host reports real `env(safe-area-inset-*)` values;
/// set a floor to zero to let the host value through unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeAreaFloors {
    /// Notch.
    pub portrait_top: f64,
    /// Home indicator.
    pub portrait_bottom: f64,
    /// Notch side.
    pub landscape_left: f64,
    /// Opposite side, kept symmetric.
    pub landscape_right: f64,
    /// Home indicator in landscape.
    pub landscape_bottom: f64,
}

impl Default for SafeAreaFloors {
    fn default() -> Self {
        Self {
            portrait_top: 47.0,
            portrait_bottom: 34.0,
            landscape_left: 47.0,
            landscape_right: 47.0,
            landscape_bottom: 21.0,
        }
    }
}

/// Real-time thresholds for the dictation workflow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceBudget {
    /// Exclusive limit for a layout transition.
    pub max_layout_transition_ms: f64,
    /// Exclusive limit for input latency.
    pub max_input_latency_ms: f64,
    /// Lowest acceptable frame rate.
    pub min_frame_rate: f64,
    /// Reported as-is; there is no IME timing signal to measure against.
    pub keyboard_show_delay_ms: f64,
    /// Reported as-is, like the show delay.
    pub keyboard_hide_delay_ms: f64,
}

impl Default for PerformanceBudget {
    fn default() -> Self {
        Self {
            max_layout_transition_ms: 100.0,
            max_input_latency_ms: 50.0,
            min_frame_rate: 60.0,
            keyboard_show_delay_ms: 300.0,
            keyboard_hide_delay_ms: 250.0,
        }
    }
}

/// Fixed header/footer chrome around the dictation container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerChrome {
    /// Header height in px.
    pub header_height: f64,
    /// Footer height in px.
    pub footer_height: f64,
    /// Header stays pinned.
    pub header_fixed: bool,
    /// Footer rides above the keyboard.
    pub footer_fixed: bool,
}

impl Default for ContainerChrome {
    fn default() -> Self {
        Self {
            header_height: 56.0,
            footer_height: 64.0,
            header_fixed: true,
            footer_fixed: true,
        }
    }
}
