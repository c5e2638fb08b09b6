//! In-memory observation store for tests and demos.

use super::ObservationStore;
use std::sync::Mutex;
use tw_common::{Anomaly, Error, Observation, Period, Result, Suggestion};
use uuid::Uuid;

/// Store backed by a fixed observation list, recording every write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    observations: Vec<Observation>,
    anomalies: Mutex<Vec<Anomaly>>,
    suggestions: Mutex<Vec<Suggestion>>,
    /// When set, writes fail; exercises fatal-persistence paths.
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new(observations: Vec<Observation>) -> Self {
        MemoryStore {
            observations,
            ..Default::default()
        }
    }

    /// Store whose write operations always fail.
    pub fn failing_writes(observations: Vec<Observation>) -> Self {
        MemoryStore {
            observations,
            fail_writes: true,
            ..Default::default()
        }
    }

    /// Anomalies persisted so far.
    pub fn persisted_anomalies(&self) -> Vec<Anomaly> {
        self.anomalies.lock().expect("anomaly lock poisoned").clone()
    }

    /// Suggestions persisted so far.
    pub fn persisted_suggestions(&self) -> Vec<Suggestion> {
        self.suggestions
            .lock()
            .expect("suggestion lock poisoned")
            .clone()
    }
}

impl ObservationStore for MemoryStore {
    fn fetch_observations(&self, period: &Period) -> Result<Vec<Observation>> {
        let mut batch: Vec<Observation> = self
            .observations
            .iter()
            .filter(|obs| period.contains(obs.timestamp))
            .cloned()
            .collect();
        batch.sort_by_key(|obs| obs.timestamp);
        Ok(batch)
    }

    fn persist_anomalies(&self, anomalies: &[Anomaly]) -> Result<usize> {
        if self.fail_writes {
            return Err(Error::StoreWrite("memory store configured to fail".into()));
        }
        let mut stored = self.anomalies.lock().expect("anomaly lock poisoned");
        stored.extend_from_slice(anomalies);
        Ok(anomalies.len())
    }

    fn persist_suggestion(&self, suggestion: &Suggestion) -> Result<Uuid> {
        if self.fail_writes {
            return Err(Error::StoreWrite("memory store configured to fail".into()));
        }
        let id = Uuid::new_v4();
        let mut record = suggestion.clone();
        record.id = Some(id);
        self.suggestions
            .lock()
            .expect("suggestion lock poisoned")
            .push(record);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use tw_common::{LocationId, ObservationId};

    fn observations() -> Vec<Observation> {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        (0..4)
            .map(|i| Observation {
                id: ObservationId(i),
                // Deliberately inserted out of order.
                timestamp: t0 + Duration::hours((3 - i) * 2),
                location_id: LocationId(1),
                vehicle_count: Some(10),
                avg_speed: None,
                min_speed: None,
                max_speed: None,
                density_score: None,
            })
            .collect()
    }

    #[test]
    fn fetch_filters_and_sorts_ascending() {
        let store = MemoryStore::new(observations());
        let period = Period::parse(Some("2026-03-01T00:00:00Z"), Some("2026-03-01T04:00:00Z"))
            .unwrap();
        let batch = store.fetch_observations(&period).unwrap();
        assert_eq!(batch.len(), 3);
        assert!(batch.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn fetch_outside_data_is_empty_not_error() {
        let store = MemoryStore::new(observations());
        let period = Period::parse(Some("2030-01-01T00:00:00Z"), None).unwrap();
        assert!(store.fetch_observations(&period).unwrap().is_empty());
    }

    #[test]
    fn failing_store_rejects_writes() {
        let store = MemoryStore::failing_writes(Vec::new());
        let err = store.persist_anomalies(&[]).unwrap_err();
        assert!(matches!(err, Error::StoreWrite(_)));
    }
}
