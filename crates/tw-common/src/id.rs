//! Observation and location identity types.
//!
//! Observation identifiers are assigned by upstream ingestion and are the
//! join key between readings, anomaly records, and suggestions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a single traffic sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservationId(pub i64);

impl fmt::Display for ObservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ObservationId {
    fn from(id: i64) -> Self {
        ObservationId(id)
    }
}

/// Identifier of the sensor location that produced a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub i32);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for LocationId {
    fn from(id: i32) -> Self {
        LocationId(id)
    }
}
