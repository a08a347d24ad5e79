//! Trace replay: drive a session on the mock host and report each step.
//!
//! Each trace step mutates the mock host (or calls a session operation), then
//! the session drains the resulting host events. One JSON snapshot per step is
//! written to the output.

use crate::config::ResolvedConfig;
use crate::focus::FocusPhase;
use crate::integration::KeyboardLayoutSession;
use crate::model::{AppError, Orientation, PerformanceMetrics, TraceError};
use crate::publish::{CustomProperties, LayoutPublisher};
use crate::source::trace::{TraceAction, TraceReader, TraceStep};
use crate::source::{MockViewportSource, ViewportSource};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

/// Clock advance for an unstamped `frame` step (one 60 Hz frame).
pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

/// What to include in each snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Include metrics on every step, not only `measure` steps.
    pub metrics: bool,
    /// Include the full published property set.
    pub properties: bool,
}

/// State after one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepSnapshot {
    /// Trace line the step came from.
    pub line: usize,
    /// Step name, as in the trace.
    pub step: &'static str,
    /// Replay clock after the step, if stamped.
    pub clock_ms: Option<f64>,
    /// Whether the step changed observable state.
    pub changed: bool,
    /// Orientation after the step.
    pub orientation: Orientation,
    /// Whether the monitor reports a keyboard.
    pub keyboard_visible: bool,
    /// Keyboard height in px.
    pub keyboard_height: f64,
    /// Whether the viewport is reduced by the keyboard or a short window.
    pub reduced_viewport: bool,
    /// Focus phase of the bound element.
    pub focus: FocusPhase,
    /// Container height from the layout adjuster.
    pub container_height: f64,
    /// Container `transform` value.
    pub transform: String,
    /// Published properties, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<CustomProperties>,
    /// Metrics, on `measure` steps or when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<PerformanceMetrics>,
    /// Budget misses found with the metrics.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub budget_violations: Vec<String>,
}

/// Totals for a finished replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Steps applied.
    pub steps: usize,
    /// Malformed steps skipped.
    pub skipped: usize,
}

/// A session mounted on the mock host, fed from trace steps.
pub struct Replay<P: LayoutPublisher> {
    session: KeyboardLayoutSession<MockViewportSource, P>,
    start: Option<DateTime<Utc>>,
    options: ReplayOptions,
}

impl<P: LayoutPublisher> Replay<P> {
    /// Mount on a mock host sized to the configured default viewport.
    pub fn new(publisher: P, config: &ResolvedConfig, options: ReplayOptions) -> Self {
        let source = MockViewportSource::new(config.policy.default_width, config.policy.default_height);
        Self::with_source(source, publisher, config, options)
    }

    /// Mount on a prepared mock host.
    pub fn with_source(
        source: MockViewportSource,
        publisher: P,
        config: &ResolvedConfig,
        options: ReplayOptions,
    ) -> Self {
        Self {
            session: KeyboardLayoutSession::mount(source, publisher, config),
            start: None,
            options,
        }
    }

    /// The replayed session.
    pub fn session(&self) -> &KeyboardLayoutSession<MockViewportSource, P> {
        &self.session
    }

    /// Apply one step and snapshot the result.
    ///
    /// # Errors
    /// `TraceError::TimestampBeforeStart` if the step is stamped earlier than
    /// the first stamped step; the step is not applied.
    pub fn apply(&mut self, line: usize, step: TraceStep) -> Result<StepSnapshot, TraceError> {
        if let Some(at) = step.at {
            let start = *self.start.get_or_insert(at);
            let elapsed = at - start;
            if elapsed < chrono::Duration::zero() {
                return Err(TraceError::TimestampBeforeStart { line });
            }
            let ms = elapsed
                .num_microseconds()
                .map_or(elapsed.num_milliseconds() as f64, |us| us as f64 / 1000.0);
            self.session.source_mut().set_clock(Some(ms));
        }

        let name = step_name(&step.action);
        let measure = matches!(step.action, TraceAction::Measure);
        let mut changed = self.perform(step.action, step.at.is_some());
        changed |= self.session.pump();
        debug!(line, step = name, changed, "trace step applied");

        Ok(self.snapshot(line, name, changed, measure))
    }

    fn perform(&mut self, action: TraceAction, stamped: bool) -> bool {
        let session = &mut self.session;
        match action {
            TraceAction::Keyboard { visible, height } => {
                session.source_mut().simulate_keyboard(visible, height);
            }
            TraceAction::Window { width, height } => session.source_mut().set_window(width, height),
            TraceAction::Rotate => session.source_mut().rotate(),
            TraceAction::Bind { element } => session.bind_textarea(element),
            TraceAction::Unbind => session.unbind_textarea(),
            TraceAction::Focus { element } => session.source_mut().focus(&element),
            TraceAction::Blur => session.source_mut().blur(),
            TraceAction::Caret { element, start, end } => {
                if let Some(element) = element.or_else(|| session.source().active_element()) {
                    session.source_mut().select(&element, start, end);
                } else {
                    warn!("caret step without a focused element ignored");
                }
            }
            TraceAction::Scroll { element, scroll_top } => {
                if let Some(element) = element.or_else(|| session.source().active_element()) {
                    session.source_mut().scroll_element(&element, scroll_top);
                } else {
                    warn!("scroll step without a focused element ignored");
                }
            }
            TraceAction::Input { element } => {
                if let Some(element) = element.or_else(|| session.source().active_element()) {
                    session.source_mut().type_input(&element);
                }
            }
            TraceAction::UpdateViewport(patch) => return session.update_viewport(patch),
            TraceAction::ResetViewport => return session.reset_viewport(),
            TraceAction::Frame => {
                if !stamped {
                    session.source_mut().advance_clock(FRAME_INTERVAL_MS);
                }
                session.source_mut().tick_frame();
            }
            TraceAction::Measure => {}
        }
        false
    }

    fn snapshot(&self, line: usize, step: &'static str, changed: bool, measure: bool) -> StepSnapshot {
        let session = &self.session;
        let viewport = session.viewport();
        let layout = session.layout();

        let (metrics, budget_violations) = if measure || self.options.metrics {
            let report = session.check_budget();
            (
                Some(session.measure_performance()),
                report.violations.iter().map(ToString::to_string).collect(),
            )
        } else {
            (None, Vec::new())
        };

        StepSnapshot {
            line,
            step,
            clock_ms: session.source().now(),
            changed,
            orientation: viewport.orientation(),
            keyboard_visible: viewport.is_keyboard_visible(),
            keyboard_height: viewport.keyboard_height(),
            reduced_viewport: viewport.is_reduced_viewport(),
            focus: session.focus().phase(),
            container_height: layout.style.height,
            transform: layout.style.transform(),
            properties: self
                .options
                .properties
                .then(|| session.published().cloned())
                .flatten(),
            metrics,
            budget_violations,
        }
    }
}

fn step_name(action: &TraceAction) -> &'static str {
    match action {
        TraceAction::Keyboard { .. } => "keyboard",
        TraceAction::Window { .. } => "window",
        TraceAction::Rotate => "rotate",
        TraceAction::Bind { .. } => "bind",
        TraceAction::Unbind => "unbind",
        TraceAction::Focus { .. } => "focus",
        TraceAction::Blur => "blur",
        TraceAction::Caret { .. } => "caret",
        TraceAction::Scroll { .. } => "scroll",
        TraceAction::Input { .. } => "input",
        TraceAction::UpdateViewport(_) => "update_viewport",
        TraceAction::ResetViewport => "reset_viewport",
        TraceAction::Frame => "frame",
        TraceAction::Measure => "measure",
    }
}

/// Replay a whole trace, writing one JSON line per applied step to `out`.
///
/// Malformed steps are reported on stderr and skipped.
///
/// # Errors
/// Fatal trace errors (I/O) and output write failures.
pub fn run<R: BufRead, P: LayoutPublisher, W: Write>(
    trace: TraceReader<R>,
    replay: &mut Replay<P>,
    out: &mut W,
) -> Result<ReplaySummary, AppError> {
    let mut summary = ReplaySummary::default();

    for item in trace {
        let applied = item.and_then(|(line, step)| replay.apply(line, step));
        match applied {
            Ok(snapshot) => {
                serde_json::to_writer(&mut *out, &snapshot).map_err(std::io::Error::from)?;
                out.write_all(b"\n")?;
                summary.steps += 1;
            }
            Err(err) if err.is_recoverable() => {
                warn!(error = %err, "skipping trace step");
                eprintln!("warning: {err}");
                summary.skipped += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }

    out.flush()?;
    Ok(summary)
}
