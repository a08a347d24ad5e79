//! JSONL replay traces.
//!
//! One step per line, tagged by `"step"`:
//!
//! ```text
//! {"step":"bind","element":"notes"}
//! {"step":"focus","element":"notes","at":"2026-01-05T09:00:00Z"}
//! {"step":"keyboard","visible":true,"height":300}
//! {"step":"update_viewport","orientation":"landscape"}
//! {"step":"measure"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use crate::model::{ElementId, TraceError, ViewportPatch};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

/// One host action in a trace.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum TraceAction {
    /// Show or hide the on-screen keyboard.
    Keyboard {
        /// Keyboard up.
        visible: bool,
        /// Keyboard height in px; ignored when hidden.
        #[serde(default)]
        height: f64,
    },
    /// Resize the window.
    Window {
        /// New inner width.
        width: f64,
        /// New inner height.
        height: f64,
    },
    /// Swap window width and height.
    Rotate,
    /// Bind the session to a text element.
    Bind {
        /// Element to bind.
        element: ElementId,
    },
    /// Release the bound element.
    Unbind,
    /// Move document focus to an element.
    Focus {
        /// Element to focus.
        element: ElementId,
    },
    /// Clear document focus.
    Blur,
    /// Change selection in an element (default: the focused one).
    Caret {
        /// Target element.
        #[serde(default)]
        element: Option<ElementId>,
        /// Selection start.
        start: u32,
        /// Selection end.
        end: u32,
    },
    /// Scroll inside an element (default: the focused one).
    Scroll {
        /// Target element.
        #[serde(default)]
        element: Option<ElementId>,
        /// New scroll offset.
        scroll_top: u32,
    },
    /// Typing in an element (default: the focused one).
    Input {
        /// Target element.
        #[serde(default)]
        element: Option<ElementId>,
    },
    /// Merge a partial viewport config.
    UpdateViewport(ViewportPatch),
    /// Restore the default viewport preset.
    ResetViewport,
    /// Run one animation frame.
    Frame,
    /// Include performance metrics in the snapshot.
    Measure,
}

/// A parsed trace line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TraceStep {
    /// Wall-clock time of the step; drives the replay clock.
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
    /// What the host does.
    #[serde(flatten)]
    pub action: TraceAction,
}

/// Parse a single line. Returns `Ok(None)` for blank and comment lines.
///
/// # Errors
/// `TraceError::InvalidStep` if the line is not a valid step.
pub fn parse_step(line: &str, line_number: usize) -> Result<Option<TraceStep>, TraceError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| TraceError::InvalidStep {
            line: line_number,
            message: e.to_string(),
        })
}

/// Line-numbered reader over a JSONL trace.
///
/// Yields `(line_number, step)` pairs; malformed lines yield an error item
/// and reading continues with the next line.
pub struct TraceReader<R: BufRead> {
    reader: R,
    line_number: usize,
    buffer: Vec<u8>,
}

impl<R: BufRead> TraceReader<R> {
    /// Read steps from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buffer: Vec::new(),
        }
    }

    /// Number of lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl TraceReader<Box<dyn BufRead>> {
    /// Open a trace file, or stdin when `path` is `None`.
    ///
    /// # Errors
    /// `TraceError::FileNotFound` if the file does not exist, `TraceError::Io`
    /// if it cannot be opened.
    pub fn open(path: Option<PathBuf>) -> Result<Self, TraceError> {
        let reader: Box<dyn BufRead> = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(TraceError::FileNotFound { path });
                }
                Box::new(BufReader::new(File::open(&path)?))
            }
            None => Box::new(BufReader::new(std::io::stdin())),
        };
        Ok(Self::new(reader))
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<(usize, TraceStep), TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            match self.reader.read_until(b'\n', &mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    // Bad bytes spoil only their own line.
                    let Ok(line) = std::str::from_utf8(&self.buffer) else {
                        return Some(Err(TraceError::InvalidStep {
                            line: self.line_number,
                            message: "line is not valid UTF-8".to_string(),
                        }));
                    };
                    match parse_step(line, self.line_number) {
                        Ok(Some(step)) => return Some(Ok((self.line_number, step))),
                        Ok(None) => continue,
                        Err(err) => return Some(Err(err)),
                    }
                }
                Err(err) => return Some(Err(err.into())),
            }
        }
    }
}
