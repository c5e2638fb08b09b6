//! Traffic observation records and metric columns.
//!
//! An observation is one timestamped sensor reading. Individual metrics may
//! be missing for a given reading (sensor dropout, partial ingestion), so
//! every metric is optional and detectors must handle absence.

use crate::id::{LocationId, ObservationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numeric metric columns carried by an observation.
///
/// `TRACKED` is the subset detectors score. Min/max speed are recorded for
/// operator display but are too noisy per-reading to threshold directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    VehicleCount,
    AvgSpeed,
    MinSpeed,
    MaxSpeed,
    #[serde(rename = "traffic_density_score")]
    DensityScore,
}

impl Metric {
    /// Metrics examined by the detection pipeline.
    pub const TRACKED: [Metric; 3] = [Metric::VehicleCount, Metric::AvgSpeed, Metric::DensityScore];

    /// Wire/column name for this metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::VehicleCount => "vehicle_count",
            Metric::AvgSpeed => "avg_speed",
            Metric::MinSpeed => "min_speed",
            Metric::MaxSpeed => "max_speed",
            Metric::DensityScore => "traffic_density_score",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vehicle_count" => Ok(Metric::VehicleCount),
            "avg_speed" => Ok(Metric::AvgSpeed),
            "min_speed" => Ok(Metric::MinSpeed),
            "max_speed" => Ok(Metric::MaxSpeed),
            "traffic_density_score" => Ok(Metric::DensityScore),
            _ => Err(format!("unknown metric: {}", s)),
        }
    }
}

/// A single traffic sensor reading.
///
/// Created by upstream ingestion; read-only to the detection pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Unique, immutable identifier assigned at ingestion.
    pub id: ObservationId,

    /// Reading timestamp (UTC).
    pub timestamp: DateTime<Utc>,

    /// Sensor location that produced this reading.
    pub location_id: LocationId,

    /// Vehicles observed in the sampling window.
    pub vehicle_count: Option<u32>,

    /// Average speed over the window (km/h).
    pub avg_speed: Option<f64>,

    /// Slowest vehicle observed (km/h).
    pub min_speed: Option<f64>,

    /// Fastest vehicle observed (km/h).
    pub max_speed: Option<f64>,

    /// Normalized congestion score in [0, 1].
    #[serde(rename = "traffic_density_score")]
    pub density_score: Option<f64>,
}

impl Observation {
    /// Uniform numeric access to a metric column.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::VehicleCount => self.vehicle_count.map(f64::from),
            Metric::AvgSpeed => self.avg_speed,
            Metric::MinSpeed => self.min_speed,
            Metric::MaxSpeed => self.max_speed,
            Metric::DensityScore => self.density_score,
        }
    }
}
