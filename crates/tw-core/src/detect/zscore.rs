//! Z-score detector.
//!
//! Flags readings whose distance from the batch mean exceeds the threshold
//! in units of sample standard deviation. A zero-variance metric defines no
//! anomalies and is skipped.

use super::MetricRule;
use tw_common::{Candidate, Method, Metric, ObservationId};
use tw_math::stats;

pub(crate) struct ZScoreRule {
    pub threshold: f64,
}

impl MetricRule for ZScoreRule {
    fn candidates(&self, metric: Metric, values: &[(ObservationId, f64)]) -> Vec<Candidate> {
        let samples: Vec<f64> = values.iter().map(|&(_, v)| v).collect();
        let Some(mean) = stats::mean(&samples) else {
            return Vec::new();
        };
        let Some(std) = stats::sample_std(&samples) else {
            return Vec::new();
        };
        if std == 0.0 {
            return Vec::new();
        }

        values
            .iter()
            .filter_map(|&(id, value)| {
                let z = ((value - mean) / std).abs();
                if z <= self.threshold {
                    return None;
                }
                Some(Candidate {
                    observation_id: id,
                    method: Method::ZScore,
                    confidence: (z / self.threshold).min(1.0),
                    affected_metrics: vec![metric],
                    description: format!(
                        "{} value {} is {:.2} standard deviations from mean",
                        metric, value, z
                    ),
                })
            })
            .collect()
    }
}
