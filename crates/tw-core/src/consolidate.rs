//! Cross-method consolidation of anomaly candidates.
//!
//! The same anomalous reading is frequently flagged by more than one
//! method; the highest-confidence explanation is the most actionable one
//! to surface. Exact ties keep the first candidate encountered in
//! detector-execution order.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tw_common::{Anomaly, Candidate, ObservationId};

/// Merge candidates into one anomaly per observation.
///
/// Output is sorted by observation id so repeated runs compare cleanly.
pub fn consolidate(candidates: Vec<Candidate>) -> Vec<Anomaly> {
    let mut best: HashMap<ObservationId, Candidate> = HashMap::new();
    for candidate in candidates {
        match best.entry(candidate.observation_id) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
            Entry::Occupied(mut slot) => {
                // Strictly greater: first-seen wins on exact tie.
                if candidate.confidence > slot.get().confidence {
                    slot.insert(candidate);
                }
            }
        }
    }

    let mut anomalies: Vec<Anomaly> = best.into_values().map(Anomaly::from).collect();
    anomalies.sort_by_key(|a| a.observation_id);
    anomalies
}

#[cfg(test)]
mod tests {
    use super::*;
    use tw_common::{Method, Metric};

    fn candidate(id: i64, method: Method, confidence: f64) -> Candidate {
        Candidate {
            observation_id: ObservationId(id),
            method,
            confidence,
            affected_metrics: vec![Metric::VehicleCount],
            description: format!("{} claim on {}", method, id),
        }
    }

    #[test]
    fn keeps_highest_confidence_per_observation() {
        let merged = consolidate(vec![
            candidate(1, Method::ZScore, 0.7),
            candidate(1, Method::Iqr, 0.9),
            candidate(2, Method::ZScore, 0.4),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].observation_id, ObservationId(1));
        assert_eq!(merged[0].method, Method::Iqr);
        assert_eq!(merged[0].confidence, 0.9);
        assert_eq!(merged[1].confidence, 0.4);
    }

    #[test]
    fn exact_tie_keeps_first_seen() {
        let merged = consolidate(vec![
            candidate(5, Method::ZScore, 0.8),
            candidate(5, Method::Lof, 0.8),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].method, Method::ZScore);
    }

    #[test]
    fn is_idempotent() {
        let candidates = vec![
            candidate(3, Method::Iqr, 0.6),
            candidate(1, Method::ZScore, 1.0),
            candidate(3, Method::IsolationForest, 0.65),
        ];
        let once = consolidate(candidates.clone());
        let again: Vec<Candidate> = once
            .iter()
            .cloned()
            .map(|a| Candidate {
                observation_id: a.observation_id,
                method: a.method,
                confidence: a.confidence,
                affected_metrics: a.affected_metrics,
                description: a.description,
            })
            .collect();
        let twice = consolidate(again);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(&twice) {
            assert_eq!(a.observation_id, b.observation_id);
            assert_eq!(a.method, b.method);
            assert_eq!(a.confidence, b.confidence);
        }
    }

    #[test]
    fn consolidated_confidence_is_max_of_contributors() {
        let confidences = [0.31, 0.72, 0.55, 0.72];
        let candidates: Vec<Candidate> = confidences
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                candidate(9, Method::ALL[i % Method::ALL.len()], c)
            })
            .collect();
        let merged = consolidate(candidates);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].confidence, 0.72);
        // 0.72 first appeared as the second candidate (iqr).
        assert_eq!(merged[0].method, Method::Iqr);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(consolidate(Vec::new()).is_empty());
    }
}
