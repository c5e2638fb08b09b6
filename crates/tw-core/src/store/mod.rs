//! Observation store adapters.
//!
//! The pipeline reads an ordered observation batch for a period and writes
//! back consolidated anomalies and suggestion records. A real deployment
//! fronts a database; the implementations here cover files (operational
//! CLI use) and memory (tests, demos). An empty batch is a valid, non-error
//! outcome everywhere.

pub mod jsonl;
pub mod memory;

pub use jsonl::JsonlStore;
pub use memory::MemoryStore;

use tw_common::{Anomaly, Observation, Period, Result, Suggestion};
use uuid::Uuid;

/// Read/write boundary to wherever observations and findings live.
pub trait ObservationStore {
    /// Fetch observations inside the period, ordered by ascending timestamp.
    fn fetch_observations(&self, period: &Period) -> Result<Vec<Observation>>;

    /// Persist consolidated anomalies; returns the number written.
    fn persist_anomalies(&self, anomalies: &[Anomaly]) -> Result<usize>;

    /// Persist a suggestion record; returns the generated identifier.
    fn persist_suggestion(&self, suggestion: &Suggestion) -> Result<Uuid>;
}
