//! TrafficWatch common types, IDs, and errors.
//!
//! This crate provides foundational types shared across tw-core modules:
//! - Observation and metric types for traffic sensor readings
//! - Anomaly candidate and consolidated anomaly records
//! - Analysis period parsing and validation
//! - Common error types
//! - Output format specifications

pub mod anomaly;
pub mod error;
pub mod id;
pub mod observation;
pub mod output;
pub mod period;

pub use anomaly::{AnalysisResult, Anomaly, Candidate, Method, Suggestion};
pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use id::{LocationId, ObservationId};
pub use observation::{Metric, Observation};
pub use output::OutputFormat;
pub use period::Period;
