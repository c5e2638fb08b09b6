//! Error types for TrafficWatch.
//!
//! Structured error handling with stable numeric codes for machine parsing,
//! category classification, and recoverability hints. Detector abstention
//! (insufficient samples, degenerate distributions, all-missing metrics) is
//! deliberately NOT an error: detectors contribute zero candidates instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for TrafficWatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed caller input (period bounds).
    Validation,
    /// Configuration file errors.
    Config,
    /// Observation store read/write failures.
    Store,
    /// Suggestion generation failures (recovered locally by the pipeline).
    Suggestion,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Store => write!(f, "store"),
            ErrorCategory::Suggestion => write!(f, "suggestion"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for TrafficWatch.
#[derive(Error, Debug)]
pub enum Error {
    // Validation errors (10-19)
    #[error("invalid period bound '{value}': {reason}")]
    InvalidPeriod { value: String, reason: String },

    #[error("period start {start} is after end {end}")]
    PeriodOrder {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    // Configuration errors (20-29)
    #[error("configuration error: {0}")]
    Config(String),

    // Store errors (30-39)
    #[error("observation fetch failed: {0}")]
    StoreRead(String),

    #[error("anomaly persistence failed: {0}")]
    StoreWrite(String),

    // Suggestion errors (40-49)
    #[error("suggestion generation failed: {0}")]
    Suggestion(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the stable error code for this error type.
    ///
    /// Codes are grouped by category:
    /// - 10-19: Validation errors
    /// - 20-29: Configuration errors
    /// - 30-39: Store errors
    /// - 40-49: Suggestion errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidPeriod { .. } => 10,
            Error::PeriodOrder { .. } => 11,
            Error::Config(_) => 20,
            Error::StoreRead(_) => 30,
            Error::StoreWrite(_) => 31,
            Error::Suggestion(_) => 40,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidPeriod { .. } | Error::PeriodOrder { .. } => ErrorCategory::Validation,
            Error::Config(_) => ErrorCategory::Config,
            Error::StoreRead(_) | Error::StoreWrite(_) => ErrorCategory::Store,
            Error::Suggestion(_) => ErrorCategory::Suggestion,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Whether this is a client-side (caller input) error.
    pub fn is_client_error(&self) -> bool {
        matches!(self.category(), ErrorCategory::Validation)
    }

    /// Whether this error is potentially recoverable.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Caller can fix and resubmit.
            Error::InvalidPeriod { .. } | Error::PeriodOrder { .. } => true,
            Error::Config(_) => true,
            // Store failures are often transient; retry policy belongs to the caller.
            Error::StoreRead(_) | Error::StoreWrite(_) => true,
            // The pipeline already substitutes a fallback suggestion.
            Error::Suggestion(_) => true,
            Error::Io(_) => true,
            Error::Json(_) => false,
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}
