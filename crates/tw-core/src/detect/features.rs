//! Feature-matrix preparation for the multivariate detectors.
//!
//! Columns are the tracked metrics that have at least one present value in
//! the batch; missing cells are imputed with the column mean so every row
//! is complete. Rows stay aligned with the batch by index.

use tw_common::{Metric, Observation};
use tw_math::stats;

/// Mean-imputed numeric view of a batch.
pub(crate) struct FeatureMatrix {
    /// Metrics used as columns, in tracked order.
    pub columns: Vec<Metric>,
    /// One row per observation, aligned with the batch.
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Comma-separated column names for descriptions.
    pub fn column_names(&self) -> String {
        self.columns
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Build the matrix, or `None` when no tracked metric has any values.
pub(crate) fn feature_matrix(batch: &[Observation]) -> Option<FeatureMatrix> {
    let mut columns = Vec::new();
    let mut column_means = Vec::new();
    for metric in Metric::TRACKED {
        let present: Vec<f64> = batch.iter().filter_map(|obs| obs.metric(metric)).collect();
        if let Some(mean) = stats::mean(&present) {
            columns.push(metric);
            column_means.push(mean);
        }
    }
    if columns.is_empty() {
        return None;
    }

    let rows = batch
        .iter()
        .map(|obs| {
            columns
                .iter()
                .zip(&column_means)
                .map(|(&metric, &mean)| obs.metric(metric).unwrap_or(mean))
                .collect()
        })
        .collect();

    Some(FeatureMatrix { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tw_common::{LocationId, ObservationId};

    fn observation(id: i64, count: Option<u32>, speed: Option<f64>) -> Observation {
        Observation {
            id: ObservationId(id),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
            location_id: LocationId(1),
            vehicle_count: count,
            avg_speed: speed,
            min_speed: None,
            max_speed: None,
            density_score: None,
        }
    }

    #[test]
    fn missing_cells_take_the_column_mean() {
        let batch = vec![
            observation(1, Some(10), Some(40.0)),
            observation(2, None, Some(60.0)),
            observation(3, Some(30), None),
        ];
        let matrix = feature_matrix(&batch).unwrap();
        assert_eq!(matrix.columns, vec![Metric::VehicleCount, Metric::AvgSpeed]);
        assert_eq!(matrix.rows[1][0], 20.0); // mean of 10 and 30
        assert_eq!(matrix.rows[2][1], 50.0); // mean of 40 and 60
    }

    #[test]
    fn all_missing_batch_has_no_matrix() {
        let batch = vec![observation(1, None, None), observation(2, None, None)];
        assert!(feature_matrix(&batch).is_none());
    }

    #[test]
    fn column_names_join_wire_names() {
        let batch = vec![observation(1, Some(10), Some(40.0))];
        let matrix = feature_matrix(&batch).unwrap();
        assert_eq!(matrix.column_names(), "vehicle_count, avg_speed");
    }
}
