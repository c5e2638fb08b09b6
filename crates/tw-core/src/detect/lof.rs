//! Local-outlier-factor detector over the full feature matrix.
//!
//! Multivariate, deterministic. Confidence is the magnitude of the negative
//! outlier factor capped at 1; inliers sit near 1 by construction, so any
//! flagged observation lands at or very near full confidence. The cap keeps
//! the pipeline-wide [0, 1] invariant.

use super::features::feature_matrix;
use crate::config::AnalysisConfig;
use tw_common::{Candidate, Method, Observation};
use tw_math::lof::{self, LofConfig};

pub(crate) fn detect(batch: &[Observation], config: &AnalysisConfig) -> Vec<Candidate> {
    let Some(matrix) = feature_matrix(batch) else {
        return Vec::new();
    };
    if matrix.rows.len() < config.min_ensemble_samples {
        tracing::debug!(
            rows = matrix.rows.len(),
            min = config.min_ensemble_samples,
            "LOF abstaining: batch too small"
        );
        return Vec::new();
    }

    let outcome = lof::fit_score(
        &matrix.rows,
        &LofConfig {
            n_neighbors: config.lof_neighbors,
            contamination: config.contamination,
        },
    );

    let names = matrix.column_names();
    batch
        .iter()
        .zip(
            outcome
                .negative_outlier_factor
                .iter()
                .zip(&outcome.outliers),
        )
        .filter(|(_, (_, &outlier))| outlier)
        .map(|(obs, (factor, _))| Candidate {
            observation_id: obs.id,
            method: Method::Lof,
            confidence: factor.abs().min(1.0),
            affected_metrics: matrix.columns.clone(),
            description: format!("Local outlier detected on features: {}", names),
        })
        .collect()
}
