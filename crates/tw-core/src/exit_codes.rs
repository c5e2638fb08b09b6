//! Exit codes for the tw CLI.
//!
//! Exit codes communicate operation outcome without requiring output
//! parsing. Ranges:
//! - 0-1: Success outcomes (0 = clean, 1 = anomalies found)
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors

use tw_common::{Error, ErrorCategory};

/// Exit codes for tw operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Clean run, no anomalies detected.
    Clean = 0,

    /// Run succeeded and anomalies were detected.
    AnomaliesFound = 1,

    /// Invalid arguments or malformed period bounds.
    ArgsError = 10,

    /// Configuration file invalid or missing.
    ConfigError = 11,

    /// Observation store unreachable or corrupt.
    StoreError = 12,

    /// Internal error (bug - please report).
    InternalError = 20,
}

impl ExitCode {
    /// Map a pipeline error to its exit code.
    pub fn from_error(err: &Error) -> Self {
        match err.category() {
            ErrorCategory::Validation => ExitCode::ArgsError,
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Store => ExitCode::StoreError,
            ErrorCategory::Suggestion | ErrorCategory::Io => ExitCode::InternalError,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}
