//! Demand model: training, evaluation, prediction, and persistence.
//!
//! The model maps `(hour, day_of_week, is_weekend, s_price, e_price)` to a
//! predicted hourly charging volume. A [`TrainedModel`] always carries the
//! hold-out [`Metrics`] it was validated with; the two are persisted and
//! restored together.

pub mod metrics;
pub mod persist;
pub mod regressor;
pub mod split;
pub mod tree;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ModelError;
use crate::features::{FeatureRow, FeatureTable};

pub use metrics::Metrics;
pub use persist::{persist, restore};
pub use regressor::{
    BoostingParams, FittedRegressor, ForestParams, Regressor, RegressorConfig,
};

/// Fixed model input order. Changing it invalidates every persisted blob.
pub const FEATURE_COLUMNS: [&str; 5] = ["hour", "day_of_week", "is_weekend", "s_price", "e_price"];

/// Name of the target column in exported training tables.
pub const TARGET_COLUMN: &str = "volume";

/// Parameters of a training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainOptions {
    /// Fraction of rows held out for validation.
    pub test_ratio: f64,
    /// Seed for the split and for the learner's own randomness.
    pub seed: u64,
    pub regressor: RegressorConfig,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            seed: 42,
            regressor: RegressorConfig::default(),
        }
    }
}

/// A fitted regressor, its input column order, and its validation metrics.
///
/// Immutable once trained; share it by reference for concurrent predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    columns: Vec<String>,
    regressor: FittedRegressor,
    metrics: Metrics,
}

impl TrainedModel {
    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    /// Input columns in the order recorded at training time.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Learner family, e.g. `"random_forest"`.
    pub fn kind(&self) -> &'static str {
        self.regressor.kind()
    }

    /// Predicts a single value for a row or a sequence of values for a table.
    ///
    /// Table predictions keep input row order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Schema`] if the input lacks a model column.
    pub fn predict<I: PredictionInput + ?Sized>(&self, input: &I) -> Result<I::Output, ModelError> {
        input.predict_with(self)
    }

    fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(String::as_str).collect()
    }
}

/// Inputs accepted by [`TrainedModel::predict`].
///
/// Rows yield a scalar, tables yield one prediction per row.
pub trait PredictionInput {
    type Output;

    /// Runs `model` on this input.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Schema`] if a model column is absent.
    fn predict_with(&self, model: &TrainedModel) -> Result<Self::Output, ModelError>;
}

impl PredictionInput for FeatureRow {
    type Output = f64;

    fn predict_with(&self, model: &TrainedModel) -> Result<f64, ModelError> {
        let values = self.select(&model.column_names())?;
        Ok(model.regressor.predict_row(&values))
    }
}

impl PredictionInput for FeatureTable {
    type Output = Vec<f64>;

    fn predict_with(&self, model: &TrainedModel) -> Result<Vec<f64>, ModelError> {
        let rows = self.select(&model.column_names())?;
        Ok(rows
            .iter()
            .map(|row| model.regressor.predict_row(row))
            .collect())
    }
}

/// Trains a demand model and validates it on a seeded hold-out split.
///
/// # Arguments
///
/// * `features` - Table containing at least [`FEATURE_COLUMNS`]
/// * `targets` - Observed volume per row
/// * `options` - Split ratio, seed, and learner selection
///
/// # Errors
///
/// - [`ModelError::InvalidParams`] if the split ratio or a learner
///   hyperparameter is out of range
/// - [`ModelError::ShapeMismatch`] if row and target counts differ
/// - [`ModelError::InsufficientData`] if fewer than 2 rows are available
/// - [`ModelError::Schema`] if a model column is missing from `features`
pub fn train(
    features: &FeatureTable,
    targets: &[f64],
    options: &TrainOptions,
) -> Result<TrainedModel, ModelError> {
    check_options(options)?;
    if features.len() != targets.len() {
        return Err(ModelError::ShapeMismatch {
            features: features.len(),
            targets: targets.len(),
        });
    }

    let split = split::train_test_split(features.len(), options.test_ratio, options.seed)?;
    let x = features.select(&FEATURE_COLUMNS)?;
    debug!(
        n_train = split.train.len(),
        n_test = split.test.len(),
        seed = options.seed,
        "split training rows"
    );

    let x_train: Vec<Vec<f64>> = split.train.iter().map(|&i| x[i].clone()).collect();
    let y_train: Vec<f64> = split.train.iter().map(|&i| targets[i]).collect();
    let regressor = FittedRegressor::fit(&options.regressor, &x_train, &y_train, options.seed);

    let predicted: Vec<f64> = split
        .test
        .iter()
        .map(|&i| regressor.predict_row(&x[i]))
        .collect();
    let actual: Vec<f64> = split.test.iter().map(|&i| targets[i]).collect();
    let metrics = Metrics::from_predictions(&predicted, &actual);

    info!(
        kind = regressor.kind(),
        mae = metrics.mae,
        rmse = metrics.rmse,
        "trained demand model"
    );

    Ok(TrainedModel {
        columns: FEATURE_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
        regressor,
        metrics,
    })
}

fn check_options(options: &TrainOptions) -> Result<(), ModelError> {
    let invalid = |field: &str, message: &str| {
        Err(ModelError::InvalidParams {
            field: field.to_string(),
            message: message.to_string(),
        })
    };
    if !(options.test_ratio > 0.0 && options.test_ratio < 1.0) {
        return invalid("test_ratio", "must be in (0.0, 1.0)");
    }
    match &options.regressor {
        RegressorConfig::RandomForest(p) => {
            if p.n_estimators == 0 {
                return invalid("n_estimators", "must be > 0");
            }
        }
        RegressorConfig::GradientBoosted(p) => {
            if p.n_estimators == 0 {
                return invalid("n_estimators", "must be > 0");
            }
            if !(p.learning_rate > 0.0 && p.learning_rate <= 1.0) {
                return invalid("learning_rate", "must be in (0.0, 1.0]");
            }
            if !(p.subsample > 0.0 && p.subsample <= 1.0) {
                return invalid("subsample", "must be in (0.0, 1.0]");
            }
        }
    }
    Ok(())
}
