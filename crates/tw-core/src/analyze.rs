//! Analysis orchestrator.
//!
//! Drives one invocation end to end: fetch batch → run requested detectors
//! → consolidate → persist → report. Detectors are pure functions over the
//! shared immutable batch and run on scoped worker threads; their outputs
//! are concatenated in canonical method order so consolidation tie-breaks
//! reproducibly regardless of thread timing.

use crate::config::AnalysisConfig;
use crate::consolidate::consolidate;
use crate::detect;
use crate::store::ObservationStore;
use crate::suggest::{self, SuggestionGenerator};
use tw_common::{AnalysisResult, Candidate, Method, Observation, Period, Result, Suggestion};

/// Message reported when the queried period holds no observations.
const EMPTY_BATCH_MESSAGE: &str = "No traffic events found in the specified period";

/// One analysis invocation as received from the caller.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    /// Queried time range; bounds already validated.
    pub period: Period,

    /// Raw requested method names; `None` runs the default set.
    /// Unrecognized names are ignored with a warning.
    pub methods: Option<Vec<String>>,

    /// Per-invocation RNG seed override for the ensemble detectors.
    pub seed: Option<u64>,
}

/// Resolve raw method names to the canonical execution list.
///
/// Unknown names are skipped (logged), duplicates collapse, and the result
/// follows `Method::ALL` order so runs are reproducible.
pub fn resolve_methods(requested: Option<&[String]>) -> Vec<Method> {
    let Some(names) = requested else {
        return Method::DEFAULT.to_vec();
    };
    let mut recognized = Vec::new();
    for name in names {
        match name.parse::<Method>() {
            Ok(method) => {
                if !recognized.contains(&method) {
                    recognized.push(method);
                }
            }
            Err(_) => {
                tracing::warn!(method = %name, "ignoring unrecognized detection method");
            }
        }
    }
    Method::ALL
        .into_iter()
        .filter(|m| recognized.contains(m))
        .collect()
}

/// Run the full detection pipeline for one request.
pub fn run_analysis<S: ObservationStore + ?Sized>(
    store: &S,
    request: &AnalysisRequest,
    config: &AnalysisConfig,
) -> Result<AnalysisResult> {
    let methods = resolve_methods(request.methods.as_deref());
    tracing::info!(period = %request.period, methods = ?methods, "starting analysis");

    let batch = store.fetch_observations(&request.period)?;
    if batch.is_empty() {
        tracing::info!("no observations in period, skipping detection");
        return Ok(AnalysisResult::empty(
            request.period.clone(),
            methods,
            EMPTY_BATCH_MESSAGE,
        ));
    }
    tracing::debug!(observations = batch.len(), "batch fetched");

    let seed = request.seed.unwrap_or(config.seed);
    let candidates = run_detectors(&methods, &batch, config, seed);
    tracing::debug!(candidates = candidates.len(), "detection finished");

    let anomalies = consolidate(candidates);
    if !anomalies.is_empty() {
        let written = store.persist_anomalies(&anomalies)?;
        tracing::info!(anomalies = written, "anomalies persisted");
    }

    Ok(AnalysisResult {
        anomalies_detected: anomalies.len(),
        anomalies,
        period: request.period.clone(),
        methods_used: methods,
        message: None,
    })
}

/// Run the pipeline and, for a non-empty result, attach a suggestion.
///
/// Suggestion failures never fail the analysis; the fallback text is
/// substituted instead.
pub fn run_analysis_with_suggestions<S: ObservationStore + ?Sized>(
    store: &S,
    generator: &dyn SuggestionGenerator,
    request: &AnalysisRequest,
    config: &AnalysisConfig,
) -> Result<(AnalysisResult, Vec<Suggestion>)> {
    let result = run_analysis(store, request, config)?;
    let suggestions = if result.anomalies_detected > 0 {
        vec![suggest::generate_with_fallback(
            generator,
            store,
            &result.anomalies,
            &request.period,
        )]
    } else {
        Vec::new()
    };
    Ok((result, suggestions))
}

/// Execute detectors concurrently, concatenating in canonical order.
fn run_detectors(
    methods: &[Method],
    batch: &[Observation],
    config: &AnalysisConfig,
    seed: u64,
) -> Vec<Candidate> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = methods
            .iter()
            .map(|&method| scope.spawn(move || detect::run_method(method, batch, config, seed)))
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().expect("detector thread panicked"))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_method_set_excludes_lof() {
        assert_eq!(
            resolve_methods(None),
            vec![Method::ZScore, Method::Iqr, Method::IsolationForest]
        );
    }

    #[test]
    fn unknown_names_are_dropped() {
        let raw = vec!["lof".to_string(), "dbscan".to_string(), "zscore".to_string()];
        assert_eq!(
            resolve_methods(Some(&raw)),
            vec![Method::ZScore, Method::Lof]
        );
    }

    #[test]
    fn duplicates_collapse() {
        let raw = vec!["iqr".to_string(), "iqr".to_string()];
        assert_eq!(resolve_methods(Some(&raw)), vec![Method::Iqr]);
    }

    #[test]
    fn empty_request_list_runs_nothing() {
        assert!(resolve_methods(Some(&[])).is_empty());
    }
}
