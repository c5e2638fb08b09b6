//! Synthetic traffic data for demos and tests.
//!
//! Mirrors real ingestion patterns: rush-hour windows carry heavy, slow
//! traffic; nights are sparse and fast; everything else sits in between.
//! Optionally injects a handful of extreme readings so a fresh dataset has
//! something for the detectors to find. Fully deterministic per seed.

use chrono::{DateTime, Duration, Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tw_common::{LocationId, Observation, ObservationId};

/// Parameters for one synthetic dataset.
#[derive(Debug, Clone)]
pub struct SynthConfig {
    /// Number of observations to generate.
    pub count: usize,
    /// Minutes between consecutive readings.
    pub interval_minutes: i64,
    /// Timestamp of the first reading.
    pub start: DateTime<Utc>,
    /// Number of extreme readings to inject.
    pub outliers: usize,
    /// RNG seed.
    pub seed: u64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            count: 288,
            interval_minutes: 5,
            // 2026-03-01T00:00:00Z
            start: DateTime::from_timestamp(1_772_323_200, 0).expect("valid epoch"),
            outliers: 0,
            seed: 42,
        }
    }
}

/// Generate an ordered batch of synthetic observations.
pub fn generate(config: &SynthConfig) -> Vec<Observation> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut observations: Vec<Observation> = (0..config.count)
        .map(|i| {
            let timestamp = config.start + Duration::minutes(config.interval_minutes * i as i64);
            observation(&mut rng, ObservationId(i as i64 + 1), timestamp)
        })
        .collect();

    // Spread injected extremes across the dataset.
    let outliers = config.outliers.min(observations.len());
    for _ in 0..outliers {
        let idx = rng.random_range(0..observations.len());
        exaggerate(&mut observations[idx]);
    }

    observations
}

fn observation(rng: &mut StdRng, id: ObservationId, timestamp: DateTime<Utc>) -> Observation {
    let hour = timestamp.hour();
    let (count_range, speed_mean, speed_std, density_range) = if (7..=9).contains(&hour)
        || (17..=19).contains(&hour)
    {
        (40..=100u32, 25.0, 8.0, 0.7..1.0)
    } else if hour >= 22 || hour <= 5 {
        (5..=20u32, 50.0, 10.0, 0.1..0.3)
    } else {
        (20..=60u32, 40.0, 12.0, 0.4..0.7)
    };

    let speed_dist: Normal<f64> = Normal::new(speed_mean, speed_std).expect("finite std dev");
    let avg_speed = speed_dist.sample(rng).max(5.0);
    let min_speed = (avg_speed - rng.random_range(5.0..15.0)).max(5.0);
    let max_speed = avg_speed + rng.random_range(10.0..25.0);

    Observation {
        id,
        timestamp,
        location_id: LocationId(rng.random_range(1..=5)),
        vehicle_count: Some(rng.random_range(count_range)),
        avg_speed: Some(avg_speed),
        min_speed: Some(min_speed),
        max_speed: Some(max_speed),
        density_score: Some(rng.random_range(density_range)),
    }
}

/// Turn a reading into a gridlock-style extreme.
fn exaggerate(obs: &mut Observation) {
    obs.vehicle_count = obs.vehicle_count.map(|c| c * 3 + 50);
    obs.avg_speed = obs.avg_speed.map(|s| (s * 0.3).max(3.0));
    obs.min_speed = obs.min_speed.map(|s| (s * 0.3).max(1.0));
    obs.density_score = Some(1.0);
}
