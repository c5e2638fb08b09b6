//! Isolation-forest detector over the full feature matrix.
//!
//! Multivariate: one candidate per outlier observation, implicating every
//! feature column. Confidence rescales the raw score so that a borderline
//! sample (score near -0.5) maps near zero and extreme isolation maps to 1,
//! clamped into [0, 1].

use super::features::feature_matrix;
use crate::config::AnalysisConfig;
use tw_common::{Candidate, Method, Observation};
use tw_math::iforest::{self, IsolationForestConfig};

pub(crate) fn detect(batch: &[Observation], config: &AnalysisConfig, seed: u64) -> Vec<Candidate> {
    let Some(matrix) = feature_matrix(batch) else {
        return Vec::new();
    };
    if matrix.rows.len() < config.min_ensemble_samples {
        tracing::debug!(
            rows = matrix.rows.len(),
            min = config.min_ensemble_samples,
            "isolation forest abstaining: batch too small"
        );
        return Vec::new();
    }

    let outcome = iforest::fit_score(
        &matrix.rows,
        &IsolationForestConfig {
            n_trees: config.isolation_trees,
            subsample: config.isolation_subsample,
            contamination: config.contamination,
            seed,
        },
    );

    let names = matrix.column_names();
    batch
        .iter()
        .zip(outcome.scores.iter().zip(&outcome.outliers))
        .filter(|(_, (_, &outlier))| outlier)
        .map(|(obs, (score, _))| Candidate {
            observation_id: obs.id,
            method: Method::IsolationForest,
            confidence: (1.0 - (score + 0.5)).clamp(0.0, 1.0),
            affected_metrics: matrix.columns.clone(),
            description: format!(
                "Anomaly detected using Isolation Forest on features: {}",
                names
            ),
        })
        .collect()
}
