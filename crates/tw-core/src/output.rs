//! Result rendering for CLI output.
//!
//! stdout carries exactly one payload per invocation; logs go to stderr.

use serde::Serialize;
use tw_common::{AnalysisResult, OutputFormat, Result, Suggestion};

/// Analysis payload as printed to stdout.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    #[serde(flatten)]
    pub result: AnalysisResult,

    /// Suggestions attached to the run (empty unless requested).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

impl AnalysisReport {
    pub fn new(result: AnalysisResult, suggestions: Vec<Suggestion>) -> Self {
        AnalysisReport {
            result,
            suggestions,
        }
    }

    /// Render in the requested format.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string(self)?),
            OutputFormat::Summary => Ok(self.summary_line()),
        }
    }

    fn summary_line(&self) -> String {
        let methods = self
            .result
            .methods_used
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(",");
        match &self.result.message {
            Some(message) => format!("0 anomalies ({})", message),
            None => format!(
                "{} anomalies in period {} (methods: {})",
                self.result.anomalies_detected, self.result.period, methods
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tw_common::{Anomaly, Method, Metric, ObservationId, Period};

    fn report() -> AnalysisReport {
        AnalysisReport::new(
            AnalysisResult {
                anomalies_detected: 1,
                anomalies: vec![Anomaly {
                    observation_id: ObservationId(8),
                    method: Method::ZScore,
                    confidence: 1.0,
                    affected_metrics: vec![Metric::VehicleCount],
                    description: "spike".into(),
                }],
                period: Period::unbounded(),
                methods_used: vec![Method::ZScore, Method::Iqr],
                message: None,
            },
            Vec::new(),
        )
    }

    #[test]
    fn json_payload_uses_wire_names() {
        let json = report().render(OutputFormat::Json).unwrap();
        assert!(json.contains(r#""anomalies_detected":1"#));
        assert!(json.contains(r#""anomaly_details""#));
        assert!(json.contains(r#""traffic_event_id":8"#));
        assert!(!json.contains("suggestions"));
    }

    #[test]
    fn summary_is_one_line() {
        let line = report().render(OutputFormat::Summary).unwrap();
        assert_eq!(line, "1 anomalies in period all time (methods: zscore,iqr)");
    }

    #[test]
    fn empty_result_summary_carries_the_message() {
        let mut r = report();
        r.result.anomalies_detected = 0;
        r.result.anomalies.clear();
        r.result.message = Some("No traffic events found in the specified period".into());
        let line = r.render(OutputFormat::Summary).unwrap();
        assert!(line.starts_with("0 anomalies"));
        assert!(line.contains("No traffic events"));
    }
}
