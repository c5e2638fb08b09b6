//! TrafficWatch numeric kernels.
//!
//! Pure computations over plain `f64` slices and rows: descriptive
//! statistics plus the two multivariate outlier scorers (isolation forest,
//! local outlier factor). No I/O, no logging; everything is deterministic
//! given an explicit seed.

pub mod iforest;
pub mod lof;
pub mod stats;

pub use iforest::{IsolationForestConfig, IsolationOutcome};
pub use lof::{LofConfig, LofOutcome};
pub use stats::{mean, quantile, sample_std};
