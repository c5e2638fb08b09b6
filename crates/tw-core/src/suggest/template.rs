//! Deterministic template suggester.
//!
//! Stands in for an external text-generation backend: summarizes the
//! anomaly list per method and emits fixed traffic-management guidance.
//! Useful offline and as the reference implementation of the contract.

use super::SuggestionGenerator;
use std::collections::BTreeMap;
use tw_common::{Anomaly, Method, Period, Result};

#[derive(Debug, Default)]
pub struct TemplateSuggester;

impl SuggestionGenerator for TemplateSuggester {
    fn generate(&self, anomalies: &[Anomaly], period: &Period) -> Result<String> {
        let mut by_method: BTreeMap<&'static str, usize> = BTreeMap::new();
        for anomaly in anomalies {
            *by_method.entry(anomaly.method.as_str()).or_default() += 1;
        }
        let breakdown = Method::ALL
            .iter()
            .filter_map(|m| {
                by_method
                    .get(m.as_str())
                    .map(|count| format!("- {} anomalies detected using {} method", count, m))
            })
            .collect::<Vec<_>>()
            .join("\n");

        let mut text = format!(
            "Based on the analysis of {} traffic anomalies ({}):\n\n{}\n\n",
            anomalies.len(),
            period,
            breakdown
        );
        text.push_str(
            "\u{2022} Unusual traffic patterns detected - consider investigating potential incidents or events\n\
             \u{2022} Speed variations suggest possible congestion or road conditions requiring attention\n\
             \u{2022} Monitor these patterns for recurring issues during similar time periods\n\
             \u{2022} Consider adjusting traffic signal timing if anomalies persist\n\
             \u{2022} Review footage or sensor data for the affected time periods\n",
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tw_common::{Metric, ObservationId};

    fn anomaly(id: i64, method: Method) -> Anomaly {
        Anomaly {
            observation_id: ObservationId(id),
            method,
            confidence: 0.7,
            affected_metrics: vec![Metric::VehicleCount],
            description: "spike".into(),
        }
    }

    #[test]
    fn breakdown_groups_by_method_in_canonical_order() {
        let anomalies = vec![
            anomaly(1, Method::Lof),
            anomaly(2, Method::ZScore),
            anomaly(3, Method::ZScore),
        ];
        let text = TemplateSuggester
            .generate(&anomalies, &Period::unbounded())
            .unwrap();
        assert!(text.contains("analysis of 3 traffic anomalies"));
        let zscore_pos = text.find("2 anomalies detected using zscore").unwrap();
        let lof_pos = text.find("1 anomalies detected using lof").unwrap();
        assert!(zscore_pos < lof_pos);
    }

    #[test]
    fn guidance_bullets_are_present() {
        let text = TemplateSuggester
            .generate(&[anomaly(1, Method::Iqr)], &Period::unbounded())
            .unwrap();
        assert!(text.contains("signal timing"));
        assert!(text.lines().filter(|l| l.starts_with('\u{2022}')).count() >= 5);
    }
}
