//! Anomaly candidates, consolidated anomalies, and analysis results.
//!
//! A `Candidate` is a single detector's claim that one observation is
//! anomalous. Consolidation keeps the highest-confidence candidate per
//! observation; the survivor is promoted to an `Anomaly` and persisted.

use crate::id::ObservationId;
use crate::observation::Metric;
use crate::period::Period;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Detection methods the pipeline can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    #[serde(rename = "zscore")]
    ZScore,
    Iqr,
    IsolationForest,
    Lof,
}

impl Method {
    /// All methods in canonical execution order.
    ///
    /// Detectors always run in this order regardless of how the request
    /// lists them, so exact-confidence ties consolidate reproducibly.
    pub const ALL: [Method; 4] = [
        Method::ZScore,
        Method::Iqr,
        Method::IsolationForest,
        Method::Lof,
    ];

    /// Methods run when a request does not name any.
    pub const DEFAULT: [Method; 3] = [Method::ZScore, Method::Iqr, Method::IsolationForest];

    /// Wire name for this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::ZScore => "zscore",
            Method::Iqr => "iqr",
            Method::IsolationForest => "isolation_forest",
            Method::Lof => "lof",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zscore" => Ok(Method::ZScore),
            "iqr" => Ok(Method::Iqr),
            "isolation_forest" => Ok(Method::IsolationForest),
            "lof" => Ok(Method::Lof),
            _ => Err(format!("unknown detection method: {}", s)),
        }
    }
}

/// One detector's claim that an observation is anomalous.
///
/// Produced by exactly one detector, consumed by consolidation, never
/// persisted directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Observation this claim refers to (foreign reference, not ownership).
    #[serde(rename = "traffic_event_id")]
    pub observation_id: ObservationId,

    /// Detector that produced the claim.
    #[serde(rename = "anomaly_type")]
    pub method: Method,

    /// Confidence in [0, 1].
    #[serde(rename = "confidence_score")]
    pub confidence: f64,

    /// Metric columns implicated by the claim.
    pub affected_metrics: Vec<Metric>,

    /// Human-readable explanation.
    pub description: String,
}

/// The winning candidate for an observation after cross-method merging.
///
/// At most one anomaly exists per observation per analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(rename = "traffic_event_id")]
    pub observation_id: ObservationId,

    /// Method that produced the winning explanation.
    #[serde(rename = "anomaly_type")]
    pub method: Method,

    #[serde(rename = "confidence_score")]
    pub confidence: f64,

    pub affected_metrics: Vec<Metric>,

    pub description: String,
}

impl From<Candidate> for Anomaly {
    fn from(candidate: Candidate) -> Self {
        Anomaly {
            observation_id: candidate.observation_id,
            method: candidate.method,
            confidence: candidate.confidence,
            affected_metrics: candidate.affected_metrics,
            description: candidate.description,
        }
    }
}

/// Summary returned to the caller of one analysis invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Number of consolidated anomalies.
    pub anomalies_detected: usize,

    /// The consolidated anomalies, ordered by observation id.
    #[serde(rename = "anomaly_details")]
    pub anomalies: Vec<Anomaly>,

    /// Echo of the queried period bounds.
    pub period: Period,

    /// Recognized methods that actually ran, in canonical order.
    pub methods_used: Vec<Method>,

    /// Set when the pipeline short-circuited (e.g. empty batch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AnalysisResult {
    /// Result for a period with no observations: nothing ran, nothing persisted.
    pub fn empty(period: Period, methods_used: Vec<Method>, message: impl Into<String>) -> Self {
        AnalysisResult {
            anomalies_detected: 0,
            anomalies: Vec::new(),
            period,
            methods_used,
            message: Some(message.into()),
        }
    }
}

/// Narrative guidance generated from a non-empty anomaly list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Store-assigned identifier; `None` until (unless) persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    #[serde(rename = "time_period_start")]
    pub period_start: Option<DateTime<Utc>>,

    #[serde(rename = "time_period_end")]
    pub period_end: Option<DateTime<Utc>>,

    /// Record kind; currently always `"anomaly_summary"`.
    pub suggestion_type: String,

    /// 0.8 for generated text, 0.5 for the fallback.
    pub confidence_level: f64,

    /// The narrative itself.
    pub description: String,

    /// Observations the narrative refers to (capped at 10).
    pub related_anomalies: Vec<ObservationId>,
}
