//! Error types for the shell layer.
//!
//! The coordination core (monitor, resolver, coordinator, adjuster, performance
//! monitor) never fails: every degraded path resolves to a conservative default.
//! Errors only exist at the edges, where configuration, log files, and replay
//! traces are read.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - top-level error returned from the binary
//!   - [`ConfigError`] - config file unreadable or invalid
//!   - [`LoggingError`] - tracing subscriber setup failed
//!   - [`TraceError`] - replay trace could not be opened or a step was malformed
//!
//! # Recovery Strategy
//!
//! Malformed trace lines are **non-fatal**: the replay reports them with their line
//! number and moves on. Config, logging, and input errors are fatal and propagate
//! to `main`.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
///
/// All shell error types convert into `AppError` via `From`, so `main` can use `?`
/// throughout.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Replay trace could not be read.
    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    /// Writing replay output failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors raised while reading a replay trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file does not exist.
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use keyboard_viewport::model::error::TraceError;
    ///
    /// let err = TraceError::FileNotFound { path: PathBuf::from("/tmp/missing.jsonl") };
    /// assert!(err.to_string().contains("/tmp/missing.jsonl"));
    /// ```
    #[error("Trace file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// A line is not a valid JSON step.
    #[error("Invalid trace step at line {line}: {message}")]
    InvalidStep {
        /// 1-based line number.
        line: usize,
        /// Deserializer message.
        message: String,
    },

    /// A step carries a timestamp earlier than the first stamped step.
    #[error("Timestamp at line {line} precedes trace start")]
    TimestampBeforeStart {
        /// 1-based line number.
        line: usize,
    },

    /// Generic I/O failure while reading.
    #[error("I/O error reading trace: {0}")]
    Io(#[from] std::io::Error),
}

impl TraceError {
    /// Line number for per-line errors, `None` for whole-trace failures.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::InvalidStep { line, .. } | Self::TimestampBeforeStart { line } => Some(*line),
            Self::FileNotFound { .. } | Self::Io(_) => None,
        }
    }

    /// Whether replay can continue past this error.
    pub fn is_recoverable(&self) -> bool {
        self.line().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_step_is_recoverable_and_reports_line() {
        let err = TraceError::InvalidStep {
            line: 7,
            message: "expected value".to_string(),
        };
        assert_eq!(err.line(), Some(7));
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("line 7"));
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = TraceError::FileNotFound {
            path: PathBuf::from("/nope.jsonl"),
        };
        assert!(!err.is_recoverable());
    }

    #[test]
    fn io_error_converts_into_app_error() {
        fn fails() -> Result<(), AppError> {
            Err(std::io::Error::other("broken pipe"))?;
            Ok(())
        }
        let err = fails().unwrap_err();
        assert!(matches!(err, AppError::Output(_)));
    }

    #[test]
    fn trace_error_converts_into_app_error() {
        fn fails() -> Result<(), AppError> {
            Err(TraceError::FileNotFound {
                path: PathBuf::from("x"),
            })?;
            Ok(())
        }
        assert!(matches!(fails().unwrap_err(), AppError::Trace(_)));
    }
}
