//! Performance sampling.
//!
//! The monitor only records timestamps handed to it; it never reads a clock
//! itself. A host without `performance.now()` passes `None` everywhere, and
//! the monitor then reports [`PerformanceMetrics::IDEAL`].

use crate::config::PerformanceBudget;
use crate::model::PerformanceMetrics;

/// Frame-rate sampling window (ms).
const FRAME_WINDOW_MS: f64 = 1000.0;
const MAX_FRAME_RATE: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct FrameWindow {
    start: f64,
    frames: u32,
}

/// Samples layout, input, and animation-frame timestamps.
#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    budget: PerformanceBudget,
    /// Most recent layout adjustment (adjust or reset).
    layout_start: Option<f64>,
    last_input: Option<f64>,
    window: Option<FrameWindow>,
    /// Rate of the last completed window.
    settled_rate: Option<f64>,
}

impl PerformanceMonitor {
    /// Start sampling at `now` (the mount time).
    pub fn start(now: Option<f64>, budget: PerformanceBudget) -> Self {
        Self {
            budget,
            layout_start: None,
            last_input: None,
            window: now.map(|start| FrameWindow { start, frames: 0 }),
            settled_rate: None,
        }
    }

    /// Configured budget.
    pub fn budget(&self) -> &PerformanceBudget {
        &self.budget
    }

    /// A layout adjustment (adjust or reset) began.
    pub fn mark_layout_start(&mut self, now: Option<f64>) {
        if now.is_some() {
            self.layout_start = now;
        }
    }

    /// An input event (typing, selection, scroll) arrived.
    pub fn mark_input(&mut self, now: Option<f64>) {
        if now.is_some() {
            self.last_input = now;
        }
    }

    /// Count one animation frame delivered at `timestamp`.
    pub fn record_frame(&mut self, timestamp: f64) {
        let window = self.window.get_or_insert(FrameWindow {
            start: timestamp,
            frames: 0,
        });
        window.frames += 1;
        let elapsed = timestamp - window.start;
        if elapsed >= FRAME_WINDOW_MS {
            self.settled_rate = Some(frame_rate(window.frames, elapsed));
            *window = FrameWindow {
                start: timestamp,
                frames: 0,
            };
        }
    }

    /// Snapshot metrics at `now`.
    ///
    /// Never fails: without a timer the ideal constants are reported.
    pub fn measure_performance(&self, now: Option<f64>) -> PerformanceMetrics {
        let Some(now) = now else {
            return PerformanceMetrics::IDEAL;
        };

        let layout_transition_duration = self.layout_start.map_or(0.0, |start| now - start);
        let input_latency = self.last_input.map_or(0.0, |at| now - at);

        PerformanceMetrics {
            layout_transition_duration: layout_transition_duration.max(0.0),
            input_latency: input_latency.max(0.0),
            animation_frame_rate: self.current_frame_rate(now),
            keyboard_show_delay: self.budget.keyboard_show_delay_ms,
            keyboard_hide_delay: self.budget.keyboard_hide_delay_ms,
        }
    }

    fn current_frame_rate(&self, now: f64) -> f64 {
        if let Some(rate) = self.settled_rate {
            return rate;
        }
        match self.window {
            Some(window) => frame_rate(window.frames, now - window.start),
            None => MAX_FRAME_RATE,
        }
    }
}

/// Frames per second over `elapsed` ms, capped at 60.
///
/// Windows shorter than one 60 Hz frame report the cap: there is nothing to
/// measure yet.
fn frame_rate(frames: u32, elapsed: f64) -> f64 {
    if elapsed < FRAME_WINDOW_MS / MAX_FRAME_RATE {
        return MAX_FRAME_RATE;
    }
    (f64::from(frames) * 1000.0 / elapsed).min(MAX_FRAME_RATE)
}
