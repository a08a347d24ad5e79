//! Performance metrics snapshot and budget checks.

use crate::config::PerformanceBudget;
use serde::Serialize;

/// Ephemeral performance snapshot, recomputed on demand and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    /// Time since the last layout adjustment began (ms).
    pub layout_transition_duration: f64,
    /// Time since the last input event (ms).
    pub input_latency: f64,
    /// Estimated frames per second, capped at 60.
    pub animation_frame_rate: f64,
    /// Assumed keyboard show delay (ms).
    pub keyboard_show_delay: f64,
    /// Assumed keyboard hide delay (ms).
    pub keyboard_hide_delay: f64,
}

impl PerformanceMetrics {
    /// Optimistic metrics reported when no timer is available.
    pub const IDEAL: Self = Self {
        layout_transition_duration: 0.0,
        input_latency: 0.0,
        animation_frame_rate: 60.0,
        keyboard_show_delay: 0.0,
        keyboard_hide_delay: 0.0,
    };

    /// Check this snapshot against a budget.
    pub fn check(&self, budget: &PerformanceBudget) -> BudgetReport {
        let mut violations = Vec::new();

        if self.layout_transition_duration >= budget.max_layout_transition_ms {
            violations.push(BudgetViolation::LayoutTransition {
                measured_ms: self.layout_transition_duration,
                limit_ms: budget.max_layout_transition_ms,
            });
        }
        if self.input_latency >= budget.max_input_latency_ms {
            violations.push(BudgetViolation::InputLatency {
                measured_ms: self.input_latency,
                limit_ms: budget.max_input_latency_ms,
            });
        }
        if self.animation_frame_rate < budget.min_frame_rate {
            violations.push(BudgetViolation::FrameRate {
                measured_fps: self.animation_frame_rate,
                minimum_fps: budget.min_frame_rate,
            });
        }

        BudgetReport { violations }
    }
}

/// A single budget miss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BudgetViolation {
    /// Layout transition took too long.
    LayoutTransition {
        /// Measured duration.
        measured_ms: f64,
        /// Exclusive limit.
        limit_ms: f64,
    },
    /// Input latency too high.
    InputLatency {
        /// Measured latency.
        measured_ms: f64,
        /// Exclusive limit.
        limit_ms: f64,
    },
    /// Frame rate too low.
    FrameRate {
        /// Measured rate.
        measured_fps: f64,
        /// Required minimum.
        minimum_fps: f64,
    },
}

impl std::fmt::Display for BudgetViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LayoutTransition {
                measured_ms,
                limit_ms,
            } => write!(f, "layout transition {measured_ms:.1}ms (limit < {limit_ms}ms)"),
            Self::InputLatency {
                measured_ms,
                limit_ms,
            } => write!(f, "input latency {measured_ms:.1}ms (limit < {limit_ms}ms)"),
            Self::FrameRate {
                measured_fps,
                minimum_fps,
            } => write!(f, "frame rate {measured_fps:.1}fps (minimum {minimum_fps}fps)"),
        }
    }
}

/// Result of [`PerformanceMetrics::check`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BudgetReport {
    /// Every miss, in check order.
    pub violations: Vec<BudgetViolation>,
}

impl BudgetReport {
    /// No violations.
    pub fn is_within_budget(&self) -> bool {
        self.violations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ideal_metrics_meet_default_budget() {
        let report = PerformanceMetrics::IDEAL.check(&PerformanceBudget::default());
        assert!(report.is_within_budget(), "{:?}", report);
    }

    #[test]
    fn slow_layout_is_reported() {
        let metrics = PerformanceMetrics {
            layout_transition_duration: 140.0,
            ..PerformanceMetrics::IDEAL
        };
        let report = metrics.check(&PerformanceBudget::default());
        assert_eq!(report.violations.len(), 1);
        assert!(matches!(
            report.violations[0],
            BudgetViolation::LayoutTransition { .. }
        ));
    }

    #[test]
    fn every_dimension_can_fail_at_once() {
        let metrics = PerformanceMetrics {
            layout_transition_duration: 100.0,
            input_latency: 50.0,
            animation_frame_rate: 30.0,
            keyboard_show_delay: 0.0,
            keyboard_hide_delay: 0.0,
        };
        let report = metrics.check(&PerformanceBudget::default());
        assert_eq!(report.violations.len(), 3);
    }

    #[test]
    fn violation_display_names_the_metric() {
        let violation = BudgetViolation::InputLatency {
            measured_ms: 72.0,
            limit_ms: 50.0,
        };
        assert_eq!(violation.to_string(), "input latency 72.0ms (limit < 50ms)");
    }
}
