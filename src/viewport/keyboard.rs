//! On-screen keyboard detection heuristic.

/// Outcome of classifying one height reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyboardReading {
    /// Layout height minus visible height. May be negative (pinch-zoom out, overscroll).
    pub reduction: f64,
    /// Reduction exceeds the noise threshold.
    pub visible: bool,
    /// `reduction` when visible, else 0.
    pub height: f64,
}

/// Classify a height reduction as keyboard or chrome noise.
///
/// `reduction = layout_height - visible_height`; a keyboard is reported only
/// when the reduction exceeds `noise_threshold` (strictly). Smaller changes
/// come from address-bar and toolbar animation and are dropped. Some real
/// keyboards (floating, split) shrink the viewport by less than the threshold
/// and go undetected; that is accepted.
pub fn detect_keyboard(layout_height: f64, visible_height: f64, noise_threshold: f64) -> KeyboardReading {
    let reduction = layout_height - visible_height;
    let visible = reduction > noise_threshold;

    KeyboardReading {
        reduction,
        visible,
        height: if visible { reduction } else { 0.0 },
    }
}
