//! Anomaly detectors.
//!
//! Each detector is a pure function from an observation batch to a list of
//! anomaly candidates for one method. The univariate rules (z-score, IQR)
//! share a per-metric driver that owns the skip guards; the multivariate
//! detectors (isolation forest, LOF) share the feature-matrix preparation
//! in [`features`].
//!
//! Detectors never error: insufficient samples, degenerate distributions,
//! and all-missing metrics all mean "contribute zero candidates".

pub mod features;
pub mod iforest;
pub mod iqr;
pub mod lof;
pub mod zscore;

use crate::config::AnalysisConfig;
use tw_common::{Candidate, Method, Metric, Observation, ObservationId};

/// One statistical rule applied independently to each tracked metric.
///
/// The driver collects present `(id, value)` pairs and skips metrics with
/// no values at all, so implementations only handle their own degeneracy
/// (zero variance, collapsed quartiles).
pub(crate) trait MetricRule {
    fn candidates(&self, metric: Metric, values: &[(ObservationId, f64)]) -> Vec<Candidate>;
}

/// Apply a per-metric rule across the tracked metric set.
pub(crate) fn run_metric_rule(rule: &dyn MetricRule, batch: &[Observation]) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for metric in Metric::TRACKED {
        let values: Vec<(ObservationId, f64)> = batch
            .iter()
            .filter_map(|obs| obs.metric(metric).map(|v| (obs.id, v)))
            .collect();
        if values.is_empty() {
            continue;
        }
        candidates.extend(rule.candidates(metric, &values));
    }
    candidates
}

/// Run a single detection method over a batch.
pub fn run_method(
    method: Method,
    batch: &[Observation],
    config: &AnalysisConfig,
    seed: u64,
) -> Vec<Candidate> {
    let candidates = match method {
        Method::ZScore => run_metric_rule(
            &zscore::ZScoreRule {
                threshold: config.zscore_threshold,
            },
            batch,
        ),
        Method::Iqr => run_metric_rule(
            &iqr::IqrRule {
                multiplier: config.iqr_multiplier,
            },
            batch,
        ),
        Method::IsolationForest => iforest::detect(batch, config, seed),
        Method::Lof => lof::detect(batch, config),
    };
    tracing::debug!(
        method = %method,
        candidates = candidates.len(),
        "detector finished"
    );
    candidates
}

#[cfg(test)]
pub(crate) mod test_batch {
    use chrono::{Duration, TimeZone, Utc};
    use tw_common::{LocationId, Observation, ObservationId};

    /// Batch with the given vehicle counts, five minutes apart; speeds and
    /// density track the count so multivariate detectors see the same shape.
    pub fn with_vehicle_counts(counts: &[u32]) -> Vec<Observation> {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        counts
            .iter()
            .enumerate()
            .map(|(i, &count)| Observation {
                id: ObservationId(i as i64 + 1),
                timestamp: t0 + Duration::minutes(5 * i as i64),
                location_id: LocationId(1),
                vehicle_count: Some(count),
                avg_speed: Some(60.0 - count as f64 * 0.3),
                min_speed: Some(20.0),
                max_speed: Some(80.0),
                density_score: Some((count as f64 / 100.0).min(1.0)),
            })
            .collect()
    }
}
