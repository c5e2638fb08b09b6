//! Analysis period bounds.
//!
//! Either bound may be absent, meaning unbounded on that side. Bounds are
//! caller input and are validated before any I/O happens.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Half-open-ended time range for one analysis invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl Period {
    /// Period covering all time.
    pub fn unbounded() -> Self {
        Period::default()
    }

    /// Period between two parsed bounds.
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Result<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(Error::PeriodOrder { start: s, end: e });
            }
        }
        Ok(Period { start, end })
    }

    /// Parse raw caller-supplied bounds.
    ///
    /// Accepts RFC 3339 (`2026-03-01T08:00:00Z`, with offset) or a naive
    /// `YYYY-MM-DDTHH:MM:SS[.fff]` timestamp interpreted as UTC.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let start = start.map(parse_bound).transpose()?;
        let end = end.map(parse_bound).transpose()?;
        Period::new(start, end)
    }

    /// Whether a timestamp falls inside the period (inclusive bounds).
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        if let Some(start) = self.start {
            if ts < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if ts > end {
                return false;
            }
        }
        true
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.start, self.end) {
            (Some(s), Some(e)) => write!(f, "{} .. {}", s.to_rfc3339(), e.to_rfc3339()),
            (Some(s), None) => write!(f, "{} ..", s.to_rfc3339()),
            (None, Some(e)) => write!(f, ".. {}", e.to_rfc3339()),
            (None, None) => write!(f, "all time"),
        }
    }
}

fn parse_bound(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|err| Error::InvalidPeriod {
            value: raw.to_string(),
            reason: err.to_string(),
        })
}
