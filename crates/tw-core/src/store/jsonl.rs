//! JSONL-file observation store.
//!
//! One record per line: `observations.jsonl` is the read side (produced by
//! ingestion or the synthetic generator); anomalies and suggestions are
//! appended to sibling files. A missing observations file reads as an
//! empty table.

use super::ObservationStore;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tw_common::{Anomaly, Error, Observation, Period, Result, Suggestion};
use uuid::Uuid;

const OBSERVATIONS_FILE: &str = "observations.jsonl";
const ANOMALIES_FILE: &str = "anomalies.jsonl";
const SUGGESTIONS_FILE: &str = "suggestions.jsonl";

/// Store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    dir: PathBuf,
}

impl JsonlStore {
    pub fn at_dir(dir: impl Into<PathBuf>) -> Self {
        JsonlStore { dir: dir.into() }
    }

    /// Path of the observations file inside the data directory.
    pub fn observations_path(&self) -> PathBuf {
        self.dir.join(OBSERVATIONS_FILE)
    }

    fn append_lines<T: serde::Serialize>(&self, file: &str, records: &[T]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|err| Error::StoreWrite(format!("{}: {}", self.dir.display(), err)))?;
        let path = self.dir.join(file);
        let mut out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| Error::StoreWrite(format!("{}: {}", path.display(), err)))?;
        for record in records {
            let line = serde_json::to_string(record)?;
            writeln!(out, "{}", line)
                .map_err(|err| Error::StoreWrite(format!("{}: {}", path.display(), err)))?;
        }
        Ok(())
    }
}

impl ObservationStore for JsonlStore {
    fn fetch_observations(&self, period: &Period) -> Result<Vec<Observation>> {
        let path = self.observations_path();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "observations file missing, treating as empty");
            return Ok(Vec::new());
        }

        let file = File::open(&path)
            .map_err(|err| Error::StoreRead(format!("{}: {}", path.display(), err)))?;
        let reader = BufReader::new(file);

        let mut batch = Vec::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line =
                line.map_err(|err| Error::StoreRead(format!("{}: {}", path.display(), err)))?;
            if line.trim().is_empty() {
                continue;
            }
            let obs: Observation = serde_json::from_str(&line).map_err(|err| {
                Error::StoreRead(format!(
                    "{} line {}: {}",
                    path.display(),
                    lineno + 1,
                    err
                ))
            })?;
            if period.contains(obs.timestamp) {
                batch.push(obs);
            }
        }
        batch.sort_by_key(|obs| obs.timestamp);
        Ok(batch)
    }

    fn persist_anomalies(&self, anomalies: &[Anomaly]) -> Result<usize> {
        self.append_lines(ANOMALIES_FILE, anomalies)?;
        Ok(anomalies.len())
    }

    fn persist_suggestion(&self, suggestion: &Suggestion) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let mut record = suggestion.clone();
        record.id = Some(id);
        self.append_lines(SUGGESTIONS_FILE, std::slice::from_ref(&record))?;
        Ok(id)
    }
}

/// Write a full observation set, replacing any existing file.
///
/// Used by the synthetic generator; the store itself only appends.
pub fn write_observations(dir: &Path, observations: &[Observation]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .map_err(|err| Error::StoreWrite(format!("{}: {}", dir.display(), err)))?;
    let path = dir.join(OBSERVATIONS_FILE);
    let mut out = File::create(&path)
        .map_err(|err| Error::StoreWrite(format!("{}: {}", path.display(), err)))?;
    for obs in observations {
        let line = serde_json::to_string(obs)?;
        writeln!(out, "{}", line)
            .map_err(|err| Error::StoreWrite(format!("{}: {}", path.display(), err)))?;
    }
    Ok(path)
}
