//! TOML-based planner configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::model::{BoostingParams, ForestParams, RegressorConfig, TrainOptions};

/// Top-level planner configuration parsed from TOML.
///
/// All fields have defaults matching the baseline preset. Load from TOML
/// with [`PlannerConfig::from_toml_file`] or use [`PlannerConfig::baseline`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    /// Split and learner selection.
    #[serde(default)]
    pub training: TrainingConfig,
    /// Random forest hyperparameters.
    #[serde(default)]
    pub random_forest: RandomForestConfig,
    /// Gradient boosting hyperparameters.
    #[serde(default)]
    pub gradient_boosted: GradientBoostedConfig,
    /// Station telemetry location.
    #[serde(default)]
    pub data: DataConfig,
    /// Model artifact location.
    #[serde(default)]
    pub model: ModelConfig,
}

/// Split and learner selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    /// Held-out fraction, in (0, 1).
    pub test_ratio: f64,
    /// Seed for the split and the learner.
    pub seed: u64,
    /// Learner: `"random_forest"` or `"gradient_boosted"`.
    pub regressor: String,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            seed: 42,
            regressor: "random_forest".to_string(),
        }
    }
}

/// Random forest hyperparameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RandomForestConfig {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
}

impl Default for RandomForestConfig {
    fn default() -> Self {
        let p = ForestParams::default();
        Self {
            n_estimators: p.n_estimators,
            max_depth: p.max_depth,
            min_samples_split: p.min_samples_split,
        }
    }
}

/// Gradient boosting hyperparameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GradientBoostedConfig {
    pub n_estimators: usize,
    /// Shrinkage per stage, in (0, 1].
    pub learning_rate: f64,
    pub max_depth: usize,
    /// Row fraction per stage, in (0, 1].
    pub subsample: f64,
}

impl Default for GradientBoostedConfig {
    fn default() -> Self {
        let p = BoostingParams::default();
        Self {
            n_estimators: p.n_estimators,
            learning_rate: p.learning_rate,
            max_depth: p.max_depth,
            subsample: p.subsample,
        }
    }
}

/// Station telemetry location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Directory holding one 5-minute CSV per station.
    pub data_dir: PathBuf,
    /// Station file names inside `data_dir`.
    pub stations: Vec<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/charge_5min"),
            stations: ["1001", "1002", "1003", "1006", "1008"]
                .iter()
                .map(|s| format!("{s}.csv"))
                .collect(),
        }
    }
}

impl DataConfig {
    /// Full paths of the configured station files.
    pub fn station_paths(&self) -> Vec<PathBuf> {
        self.stations.iter().map(|s| self.data_dir.join(s)).collect()
    }
}

/// Model artifact location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models/rf_demand.json"),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"training.test_ratio"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl PlannerConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "boosted", "quick"];

    /// Random forest with 100 trees of depth 10, 20% hold-out, seed 42.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Gradient-boosted trees instead of the forest.
    pub fn boosted() -> Self {
        Self {
            training: TrainingConfig {
                regressor: "gradient_boosted".to_string(),
                ..TrainingConfig::default()
            },
            gradient_boosted: GradientBoostedConfig {
                n_estimators: 200,
                learning_rate: 0.05,
                max_depth: 4,
                subsample: 0.8,
            },
            ..Self::default()
        }
    }

    /// Small forest for smoke runs.
    pub fn quick() -> Self {
        Self {
            random_forest: RandomForestConfig {
                n_estimators: 10,
                max_depth: 6,
                ..RandomForestConfig::default()
            },
            ..Self::default()
        }
    }

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "boosted" => Ok(Self::boosted()),
            "quick" => Ok(Self::quick()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let t = &self.training;
        if !(t.test_ratio > 0.0 && t.test_ratio < 1.0) {
            errors.push(ConfigError::new("training.test_ratio", "must be in (0.0, 1.0)"));
        }
        if t.regressor != "random_forest" && t.regressor != "gradient_boosted" {
            errors.push(ConfigError::new(
                "training.regressor",
                format!(
                    "must be \"random_forest\" or \"gradient_boosted\", got \"{}\"",
                    t.regressor
                ),
            ));
        }

        let rf = &self.random_forest;
        if rf.n_estimators == 0 {
            errors.push(ConfigError::new("random_forest.n_estimators", "must be > 0"));
        }
        if rf.max_depth == 0 {
            errors.push(ConfigError::new("random_forest.max_depth", "must be > 0"));
        }
        if rf.min_samples_split < 2 {
            errors.push(ConfigError::new("random_forest.min_samples_split", "must be >= 2"));
        }

        let gb = &self.gradient_boosted;
        if gb.n_estimators == 0 {
            errors.push(ConfigError::new("gradient_boosted.n_estimators", "must be > 0"));
        }
        if gb.max_depth == 0 {
            errors.push(ConfigError::new("gradient_boosted.max_depth", "must be > 0"));
        }
        if !(gb.learning_rate > 0.0 && gb.learning_rate <= 1.0) {
            errors.push(ConfigError::new(
                "gradient_boosted.learning_rate",
                "must be in (0.0, 1.0]",
            ));
        }
        if !(gb.subsample > 0.0 && gb.subsample <= 1.0) {
            errors.push(ConfigError::new("gradient_boosted.subsample", "must be in (0.0, 1.0]"));
        }

        if self.data.stations.is_empty() {
            errors.push(ConfigError::new("data.stations", "must list at least one station"));
        }

        errors
    }

    /// Selected learner with its hyperparameters.
    pub fn regressor(&self) -> RegressorConfig {
        if self.training.regressor == "gradient_boosted" {
            let gb = &self.gradient_boosted;
            RegressorConfig::GradientBoosted(BoostingParams {
                n_estimators: gb.n_estimators,
                learning_rate: gb.learning_rate,
                max_depth: gb.max_depth,
                subsample: gb.subsample,
            })
        } else {
            let rf = &self.random_forest;
            RegressorConfig::RandomForest(ForestParams {
                n_estimators: rf.n_estimators,
                max_depth: rf.max_depth,
                min_samples_split: rf.min_samples_split,
            })
        }
    }

    pub fn train_options(&self) -> TrainOptions {
        TrainOptions {
            test_ratio: self.training.test_ratio,
            seed: self.training.seed,
            regressor: self.regressor(),
        }
    }
}
