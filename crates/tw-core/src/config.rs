//! Configuration loading and validation.
//!
//! Detection parameters live in an optional TOML file. Resolution order:
//! explicit `--config` path > `$XDG_CONFIG_HOME/trafficwatch/config.toml` >
//! built-in defaults. Every field is optional in the file; semantic
//! validation runs after parsing (shape checking is serde's job).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config directory name under the XDG config root.
const CONFIG_DIR_NAME: &str = "trafficwatch";

/// Config file name inside the config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("invalid TOML in config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("semantic validation failed: {0}")]
    Validation(String),
}

impl From<ConfigError> for tw_common::Error {
    fn from(err: ConfigError) -> Self {
        tw_common::Error::Config(err.to_string())
    }
}

/// Tunable parameters for one analysis invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Absolute z-score above which a reading is flagged.
    pub zscore_threshold: f64,

    /// IQR fence multiplier (1.5 gives the Tukey fences).
    pub iqr_multiplier: f64,

    /// Expected outlier fraction for the ensemble detectors.
    pub contamination: f64,

    /// Batch size below which the ensemble detectors abstain.
    pub min_ensemble_samples: usize,

    /// Neighborhood size for the local-density detector.
    pub lof_neighbors: usize,

    /// Tree count for the isolation ensemble.
    pub isolation_trees: usize,

    /// Per-tree subsample cap for the isolation ensemble.
    pub isolation_subsample: usize,

    /// Default RNG seed; a request may override it per invocation.
    pub seed: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            zscore_threshold: 3.0,
            iqr_multiplier: 1.5,
            contamination: 0.1,
            min_ensemble_samples: 10,
            lof_neighbors: 20,
            isolation_trees: 100,
            isolation_subsample: 256,
            seed: 42,
        }
    }
}

impl AnalysisConfig {
    /// Semantic validation beyond shape/type checking.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.zscore_threshold > 0.0) {
            return Err(ConfigError::Validation(format!(
                "zscore_threshold must be positive, got {}",
                self.zscore_threshold
            )));
        }
        if !(self.iqr_multiplier > 0.0) {
            return Err(ConfigError::Validation(format!(
                "iqr_multiplier must be positive, got {}",
                self.iqr_multiplier
            )));
        }
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(ConfigError::Validation(format!(
                "contamination must be in (0, 0.5], got {}",
                self.contamination
            )));
        }
        if self.min_ensemble_samples < 2 {
            return Err(ConfigError::Validation(format!(
                "min_ensemble_samples must be at least 2, got {}",
                self.min_ensemble_samples
            )));
        }
        if self.lof_neighbors == 0 {
            return Err(ConfigError::Validation(
                "lof_neighbors must be at least 1".into(),
            ));
        }
        if self.isolation_trees == 0 {
            return Err(ConfigError::Validation(
                "isolation_trees must be at least 1".into(),
            ));
        }
        if self.isolation_subsample < 2 {
            return Err(ConfigError::Validation(format!(
                "isolation_subsample must be at least 2, got {}",
                self.isolation_subsample
            )));
        }
        Ok(())
    }
}

/// Load configuration from an explicit path or the default location.
///
/// With no explicit path, a missing default file is not an error: the
/// built-in defaults apply. An explicit path that does not exist is.
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig, ConfigError> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (default_config_path(), false),
    };

    if !path.exists() {
        if required {
            return Err(ConfigError::NotFound { path });
        }
        return Ok(AnalysisConfig::default());
    }

    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let config: AnalysisConfig =
        toml::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })?;
    config.validate()?;
    Ok(config)
}

/// Default config file location (`~/.config/trafficwatch/config.toml`).
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        AnalysisConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_out_of_range_contamination() {
        let config = AnalysisConfig {
            contamination: 0.9,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn rejects_zero_threshold() {
        let config = AnalysisConfig {
            zscore_threshold: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/tw.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "zscore_threshold = 2.5\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.zscore_threshold, 2.5);
        assert_eq!(config.lof_neighbors, 20);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "zscore_treshold = 2.5\n").unwrap();
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));
    }
}
