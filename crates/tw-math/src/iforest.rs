//! Isolation forest outlier scoring.
//!
//! Random binary trees isolate each sample; anomalous samples sit at
//! shallow depths. Scores follow the sklearn sign convention the rest of
//! the pipeline expects: `score_samples`-style values in (-1, 0), more
//! negative meaning more anomalous. The outlier verdict cuts at the
//! contamination quantile of the score distribution.

use crate::stats;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Euler-Mascheroni constant, used in the average-path normalizer.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Parameters for the isolation ensemble.
#[derive(Debug, Clone)]
pub struct IsolationForestConfig {
    /// Number of trees in the ensemble.
    pub n_trees: usize,
    /// Subsample size per tree (capped at the batch size).
    pub subsample: usize,
    /// Expected outlier fraction; sets the verdict threshold.
    pub contamination: f64,
    /// RNG seed; identical inputs and seed produce identical output.
    pub seed: u64,
}

impl Default for IsolationForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            subsample: 256,
            contamination: 0.1,
            seed: 42,
        }
    }
}

/// Per-sample scores and verdicts for one fitted ensemble.
#[derive(Debug, Clone)]
pub struct IsolationOutcome {
    /// Negated anomaly scores in (-1, 0); lower is more anomalous.
    pub scores: Vec<f64>,
    /// True where the sample falls below the contamination threshold.
    pub outliers: Vec<bool>,
    /// Score threshold actually applied.
    pub threshold: f64,
}

enum Node {
    Split {
        feature: usize,
        value: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        size: usize,
    },
}

/// Fit an ensemble on `rows` and score every row.
///
/// Rows must be rectangular (equal length) with finite values; the caller
/// imputes missing cells beforehand.
pub fn fit_score(rows: &[Vec<f64>], config: &IsolationForestConfig) -> IsolationOutcome {
    if rows.is_empty() {
        return IsolationOutcome {
            scores: Vec::new(),
            outliers: Vec::new(),
            threshold: 0.0,
        };
    }

    let n = rows.len();
    let psi = config.subsample.min(n).max(2);
    let height_limit = (psi as f64).log2().ceil() as usize;
    let norm = c_factor(psi);
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut path_sums = vec![0.0; n];
    for _ in 0..config.n_trees {
        let sample = sample_indices(&mut rng, n, psi);
        let tree = build_tree(rows, sample, 0, height_limit, &mut rng);
        for (sum, row) in path_sums.iter_mut().zip(rows) {
            *sum += path_length(&tree, row, 0);
        }
    }

    let scores: Vec<f64> = path_sums
        .iter()
        .map(|sum| {
            let avg_path = sum / config.n_trees as f64;
            -(2.0_f64.powf(-avg_path / norm))
        })
        .collect();

    let threshold =
        stats::quantile(&scores, config.contamination).unwrap_or(f64::NEG_INFINITY);
    let outliers = scores.iter().map(|s| *s < threshold).collect();

    IsolationOutcome {
        scores,
        outliers,
        threshold,
    }
}

/// Average unsuccessful-search path length in a BST of `n` nodes.
fn c_factor(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

fn sample_indices(rng: &mut StdRng, n: usize, k: usize) -> Vec<usize> {
    if k >= n {
        return (0..n).collect();
    }
    rand::seq::index::sample(rng, n, k).into_vec()
}

fn build_tree(
    rows: &[Vec<f64>],
    indices: Vec<usize>,
    depth: usize,
    limit: usize,
    rng: &mut StdRng,
) -> Node {
    if depth >= limit || indices.len() <= 1 {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    // Only features with spread inside this partition are splittable.
    let dims = rows[indices[0]].len();
    let mut splittable = Vec::new();
    for feature in 0..dims {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &i in &indices {
            let v = rows[i][feature];
            min = min.min(v);
            max = max.max(v);
        }
        if max > min {
            splittable.push((feature, min, max));
        }
    }
    if splittable.is_empty() {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    let (feature, min, max) = splittable[rng.random_range(0..splittable.len())];
    let value = rng.random_range(min..max);

    let size = indices.len();
    let (left, right): (Vec<usize>, Vec<usize>) =
        indices.into_iter().partition(|&i| rows[i][feature] < value);
    if left.is_empty() || right.is_empty() {
        return Node::Leaf { size };
    }

    Node::Split {
        feature,
        value,
        left: Box::new(build_tree(rows, left, depth + 1, limit, rng)),
        right: Box::new(build_tree(rows, right, depth + 1, limit, rng)),
    }
}

fn path_length(node: &Node, row: &[f64], depth: usize) -> f64 {
    match node {
        // Unresolved leaves get the average-depth adjustment for their size.
        Node::Leaf { size } => depth as f64 + c_factor(*size),
        Node::Split {
            feature,
            value,
            left,
            right,
        } => {
            if row[*feature] < *value {
                path_length(left, row, depth + 1)
            } else {
                path_length(right, row, depth + 1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster_with_outlier() -> Vec<Vec<f64>> {
        // Tight cluster near the origin plus one far point.
        let mut rows: Vec<Vec<f64>> = (0..30)
            .map(|i| {
                let wobble = (i % 5) as f64 * 0.1;
                vec![wobble, 1.0 - wobble, 0.5 + wobble * 0.01]
            })
            .collect();
        rows.push(vec![25.0, -20.0, 9.0]);
        rows
    }

    #[test]
    fn flags_the_far_point() {
        let rows = cluster_with_outlier();
        let outcome = fit_score(&rows, &IsolationForestConfig::default());
        assert!(outcome.outliers[30], "far point should be an outlier");
        // The far point has the most negative score of the batch.
        let min = outcome
            .scores
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        assert_eq!(outcome.scores[30], min);
    }

    #[test]
    fn scores_stay_in_open_unit_interval() {
        let rows = cluster_with_outlier();
        let outcome = fit_score(&rows, &IsolationForestConfig::default());
        for score in &outcome.scores {
            assert!(*score > -1.0 && *score < 0.0, "score {} out of range", score);
        }
    }

    #[test]
    fn same_seed_is_deterministic() {
        let rows = cluster_with_outlier();
        let config = IsolationForestConfig::default();
        let a = fit_score(&rows, &config);
        let b = fit_score(&rows, &config);
        assert_eq!(a.scores, b.scores);
        assert_eq!(a.outliers, b.outliers);
    }

    #[test]
    fn identical_rows_produce_no_outliers() {
        let rows = vec![vec![1.0, 2.0, 3.0]; 20];
        let outcome = fit_score(&rows, &IsolationForestConfig::default());
        assert!(outcome.outliers.iter().all(|o| !o));
    }

    #[test]
    fn empty_input_is_empty_outcome() {
        let outcome = fit_score(&[], &IsolationForestConfig::default());
        assert!(outcome.scores.is_empty());
        assert!(outcome.outliers.is_empty());
    }

    #[test]
    fn c_factor_grows_with_n() {
        assert_eq!(c_factor(1), 0.0);
        assert_eq!(c_factor(2), 1.0);
        assert!(c_factor(256) > c_factor(16));
    }
}
