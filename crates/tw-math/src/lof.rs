//! Local outlier factor scoring.
//!
//! Compares each sample's local reachability density against that of its
//! k nearest neighbors. Values near 1 mean the sample sits in a region of
//! comparable density; substantially larger ratios mean it is isolated.
//! Reported as negative outlier factors (more negative = more anomalous),
//! with the verdict cut at the contamination quantile.

use crate::stats;

/// Guard against division by zero for duplicated points.
const LRD_EPSILON: f64 = 1e-10;

/// Parameters for local outlier factor scoring.
#[derive(Debug, Clone)]
pub struct LofConfig {
    /// Neighborhood size (capped at n - 1).
    pub n_neighbors: usize,
    /// Expected outlier fraction; sets the verdict threshold.
    pub contamination: f64,
}

impl Default for LofConfig {
    fn default() -> Self {
        Self {
            n_neighbors: 20,
            contamination: 0.1,
        }
    }
}

/// Per-sample factors and verdicts.
#[derive(Debug, Clone)]
pub struct LofOutcome {
    /// Negated LOF values; lower is more anomalous, inliers sit near -1.
    pub negative_outlier_factor: Vec<f64>,
    /// True where the factor falls below the contamination threshold.
    pub outliers: Vec<bool>,
    /// Factor threshold actually applied.
    pub threshold: f64,
}

/// Score every row against its k-neighborhood.
///
/// Rows must be rectangular with finite values. Fewer than 2 rows cannot
/// form a neighborhood; everything is reported as an inlier.
pub fn fit_score(rows: &[Vec<f64>], config: &LofConfig) -> LofOutcome {
    let n = rows.len();
    if n < 2 {
        return LofOutcome {
            negative_outlier_factor: vec![-1.0; n],
            outliers: vec![false; n],
            threshold: -1.0,
        };
    }

    let k = config.n_neighbors.clamp(1, n - 1);

    // k nearest neighbors of every row as (distance, index), self excluded.
    let neighborhoods: Vec<Vec<(f64, usize)>> = (0..n)
        .map(|i| {
            let mut dists: Vec<(f64, usize)> = (0..n)
                .filter(|&j| j != i)
                .map(|j| (euclidean(&rows[i], &rows[j]), j))
                .collect();
            dists.sort_by(|a, b| a.0.total_cmp(&b.0));
            dists.truncate(k);
            dists
        })
        .collect();

    let k_distance: Vec<f64> = neighborhoods
        .iter()
        .map(|nb| nb.last().map(|&(d, _)| d).unwrap_or(0.0))
        .collect();

    // Local reachability density: inverse mean reachability distance.
    let lrd: Vec<f64> = neighborhoods
        .iter()
        .map(|nb| {
            let reach_sum: f64 = nb
                .iter()
                .map(|&(d, j)| d.max(k_distance[j]))
                .sum();
            1.0 / (reach_sum / nb.len() as f64 + LRD_EPSILON)
        })
        .collect();

    let negative_outlier_factor: Vec<f64> = (0..n)
        .map(|i| {
            let neighbor_lrd: f64 = neighborhoods[i]
                .iter()
                .map(|&(_, j)| lrd[j])
                .sum::<f64>()
                / neighborhoods[i].len() as f64;
            -(neighbor_lrd / lrd[i])
        })
        .collect();

    let threshold = stats::quantile(&negative_outlier_factor, config.contamination)
        .unwrap_or(f64::NEG_INFINITY);
    let outliers = negative_outlier_factor
        .iter()
        .map(|f| *f < threshold)
        .collect();

    LofOutcome {
        negative_outlier_factor,
        outliers,
        threshold,
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
