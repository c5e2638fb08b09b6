//! Interquartile-range detector.
//!
//! Tukey fences: readings outside `[Q1 - m·IQR, Q3 + m·IQR]` are flagged.
//! Confidence scales with the distance past the fence; when the quartiles
//! collapse (IQR = 0) distance is undefined and a fixed 0.5 applies.

use super::MetricRule;
use tw_common::{Candidate, Method, Metric, ObservationId};
use tw_math::stats;

/// Fallback confidence when the quartiles collapse.
const DEGENERATE_CONFIDENCE: f64 = 0.5;

pub(crate) struct IqrRule {
    pub multiplier: f64,
}

impl MetricRule for IqrRule {
    fn candidates(&self, metric: Metric, values: &[(ObservationId, f64)]) -> Vec<Candidate> {
        let samples: Vec<f64> = values.iter().map(|&(_, v)| v).collect();
        let Some(q1) = stats::quantile(&samples, 0.25) else {
            return Vec::new();
        };
        let Some(q3) = stats::quantile(&samples, 0.75) else {
            return Vec::new();
        };
        let iqr = q3 - q1;
        let lower = q1 - self.multiplier * iqr;
        let upper = q3 + self.multiplier * iqr;

        values
            .iter()
            .filter_map(|&(id, value)| {
                if value >= lower && value <= upper {
                    return None;
                }
                let confidence = if iqr > 0.0 {
                    let distance = (value - lower).abs().max((value - upper).abs());
                    (distance / (self.multiplier * iqr)).min(1.0)
                } else {
                    DEGENERATE_CONFIDENCE
                };
                Some(Candidate {
                    observation_id: id,
                    method: Method::Iqr,
                    confidence,
                    affected_metrics: vec![metric],
                    description: format!(
                        "{} value {} is outside IQR bounds [{:.2}, {:.2}]",
                        metric, value, lower, upper
                    ),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{run_metric_rule, test_batch};

    #[test]
    fn flags_reading_outside_the_fences() {
        let mut counts = vec![48, 52, 50, 49, 51, 50, 47, 53, 50, 49, 51];
        counts.push(90);
        let batch = test_batch::with_vehicle_counts(&counts);

        let candidates = run_metric_rule(&IqrRule { multiplier: 1.5 }, &batch);
        let spike = candidates
            .iter()
            .find(|c| {
                c.observation_id == ObservationId(12)
                    && c.affected_metrics == [Metric::VehicleCount]
            })
            .expect("spike candidate");
        assert_eq!(spike.confidence, 1.0);
        assert!(spike.description.contains("outside IQR bounds"));
    }

    #[test]
    fn values_on_the_fence_are_inliers() {
        // Quartiles of 1..=4 are 1.75/3.25, fences [-0.5, 5.5].
        let batch = test_batch::with_vehicle_counts(&[1, 2, 3, 4]);
        let candidates = run_metric_rule(&IqrRule { multiplier: 1.5 }, &batch);
        assert!(candidates
            .iter()
            .all(|c| c.affected_metrics != [Metric::VehicleCount]));
    }

    #[test]
    fn collapsed_quartiles_use_fixed_confidence() {
        // 14 identical readings and one outlier: Q1 == Q3, IQR == 0.
        let mut counts = vec![50; 14];
        counts.push(200);
        let batch = test_batch::with_vehicle_counts(&counts);
        let candidates = run_metric_rule(&IqrRule { multiplier: 1.5 }, &batch);
        let spike = candidates
            .iter()
            .find(|c| {
                c.observation_id == ObservationId(15)
                    && c.affected_metrics == [Metric::VehicleCount]
            })
            .expect("degenerate spike candidate");
        assert_eq!(spike.confidence, DEGENERATE_CONFIDENCE);
    }

    #[test]
    fn confidence_stays_within_unit_interval() {
        let mut counts: Vec<u32> = (40..60).collect();
        counts.push(1000);
        counts.push(0);
        let batch = test_batch::with_vehicle_counts(&counts);
        let candidates = run_metric_rule(&IqrRule { multiplier: 1.5 }, &batch);
        assert!(!candidates.is_empty());
        for candidate in candidates {
            assert!(candidate.confidence > 0.0 && candidate.confidence <= 1.0);
        }
    }
}
