//! Suggestion generation.
//!
//! Anomaly detection is the primary deliverable; narrative suggestions are
//! secondary and must never fail the analysis. `generate_with_fallback`
//! wraps any [`SuggestionGenerator`]: generated text is persisted with
//! confidence 0.8, and any failure (generation or persistence) degrades to
//! a fixed generic suggestion at confidence 0.5.

pub mod template;

pub use template::TemplateSuggester;

use crate::store::ObservationStore;
use tw_common::{Anomaly, ObservationId, Period, Result, Suggestion};

/// Record kind for anomaly-summary suggestions.
pub const SUGGESTION_TYPE: &str = "anomaly_summary";

/// Confidence attached to successfully generated text.
const GENERATED_CONFIDENCE: f64 = 0.8;

/// Confidence attached to the generic fallback.
const FALLBACK_CONFIDENCE: f64 = 0.5;

/// How many anomaly references a suggestion carries at most.
const MAX_RELATED: usize = 10;

/// Produces narrative guidance from a non-empty anomaly list.
///
/// Implementations may call out to an external text-generation service;
/// errors are contained by [`generate_with_fallback`].
pub trait SuggestionGenerator {
    fn generate(&self, anomalies: &[Anomaly], period: &Period) -> Result<String>;
}

/// Generate, persist, and return one suggestion; never fails.
pub fn generate_with_fallback<S: ObservationStore + ?Sized>(
    generator: &dyn SuggestionGenerator,
    store: &S,
    anomalies: &[Anomaly],
    period: &Period,
) -> Suggestion {
    let attempt = generator.generate(anomalies, period).and_then(|text| {
        let mut suggestion = build_suggestion(anomalies, period, GENERATED_CONFIDENCE, text);
        let id = store.persist_suggestion(&suggestion)?;
        suggestion.id = Some(id);
        Ok(suggestion)
    });

    match attempt {
        Ok(suggestion) => suggestion,
        Err(err) => {
            tracing::warn!(error = %err, "suggestion generation failed, using fallback");
            build_suggestion(
                anomalies,
                period,
                FALLBACK_CONFIDENCE,
                format!(
                    "Detected {} anomalies in traffic patterns. Manual review recommended.",
                    anomalies.len()
                ),
            )
        }
    }
}

fn build_suggestion(
    anomalies: &[Anomaly],
    period: &Period,
    confidence_level: f64,
    description: String,
) -> Suggestion {
    let related: Vec<ObservationId> = anomalies
        .iter()
        .take(MAX_RELATED)
        .map(|a| a.observation_id)
        .collect();
    Suggestion {
        id: None,
        period_start: period.start,
        period_end: period.end,
        suggestion_type: SUGGESTION_TYPE.into(),
        confidence_level,
        description,
        related_anomalies: related,
    }
}
