//! Regression learners behind a single capability interface.
//!
//! Two tree ensembles are available, selected by [`RegressorConfig`]:
//! a bagged random forest and gradient-boosted trees.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::index};
use serde::{Deserialize, Serialize};

use super::tree::{RegressionTree, TreeParams};

/// A fitted learner mapping a feature row to a predicted value.
pub trait Regressor {
    /// Predicts the target for one row, columns in training order.
    fn predict_row(&self, row: &[f64]) -> f64;

    /// Short, stable identifier of the learner family.
    fn kind(&self) -> &'static str;
}

/// Random forest hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 10,
            min_samples_split: 2,
        }
    }
}

/// Gradient boosting hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    /// Fraction of training rows drawn (without replacement) per stage.
    pub subsample: f64,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            subsample: 1.0,
        }
    }
}

/// Learner selection together with its hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegressorConfig {
    RandomForest(ForestParams),
    GradientBoosted(BoostingParams),
}

impl Default for RegressorConfig {
    fn default() -> Self {
        Self::RandomForest(ForestParams::default())
    }
}

/// Bagged ensemble of deep regression trees; predicts the tree mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fits `n_estimators` trees, each on a bootstrap sample drawn from `rng`.
    ///
    /// Callers pass at least one row and one tree; [`super::train`] checks both.
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: &ForestParams, rng: &mut StdRng) -> Self {
        debug_assert!(!x.is_empty(), "cannot fit a forest on zero rows");
        debug_assert!(params.n_estimators > 0, "n_estimators must be > 0");

        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            ..TreeParams::default()
        };
        let n = x.len();
        let trees = (0..params.n_estimators)
            .map(|_| {
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
                RegressionTree::fit(x, y, &bootstrap, &tree_params)
            })
            .collect();
        Self { trees }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// # Errors
    ///
    /// Returns a description of the defect if the forest is empty or a tree
    /// is malformed.
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        validate_trees(&self.trees, n_features)
    }
}

impl Regressor for RandomForest {
    fn predict_row(&self, row: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict(row)).sum();
        sum / self.trees.len() as f64
    }

    fn kind(&self) -> &'static str {
        "random_forest"
    }
}

/// Additive ensemble of shallow trees fitted to successive residuals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoosted {
    init: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
}

impl GradientBoosted {
    /// Fits `n_estimators` boosting stages with squared-error loss.
    ///
    /// `x` must not be empty.
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: &BoostingParams, rng: &mut StdRng) -> Self {
        debug_assert!(!x.is_empty(), "cannot fit boosting on zero rows");

        let n = x.len();
        let init = y.iter().sum::<f64>() / n as f64;
        let tree_params = TreeParams {
            max_depth: params.max_depth,
            ..TreeParams::default()
        };
        let sample_size = ((params.subsample * n as f64).round() as usize).clamp(1, n);

        let mut current = vec![init; n];
        let mut trees = Vec::with_capacity(params.n_estimators);
        for _ in 0..params.n_estimators {
            let residuals: Vec<f64> = y.iter().zip(&current).map(|(t, p)| t - p).collect();
            let rows: Vec<usize> = if sample_size == n {
                (0..n).collect()
            } else {
                index::sample(rng, n, sample_size).into_vec()
            };
            let tree = RegressionTree::fit(x, &residuals, &rows, &tree_params);
            for (i, p) in current.iter_mut().enumerate() {
                *p += params.learning_rate * tree.predict(&x[i]);
            }
            trees.push(tree);
        }

        Self {
            init,
            learning_rate: params.learning_rate,
            trees,
        }
    }

    /// # Errors
    ///
    /// Returns a description of the defect if there are no stages, the
    /// initial value or learning rate is not finite, or a tree is malformed.
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("boosted model has no stages".to_string());
        }
        if !self.init.is_finite() {
            return Err("non-finite initial prediction".to_string());
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(format!("invalid learning rate {}", self.learning_rate));
        }
        validate_trees(&self.trees, n_features)
    }
}

fn validate_trees(trees: &[RegressionTree], n_features: usize) -> Result<(), String> {
    trees
        .iter()
        .enumerate()
        .try_for_each(|(i, tree)| {
            tree.validate(n_features)
                .map_err(|e| format!("tree {i}: {e}"))
        })
}

impl Regressor for GradientBoosted {
    fn predict_row(&self, row: &[f64]) -> f64 {
        self.trees
            .iter()
            .fold(self.init, |acc, t| acc + self.learning_rate * t.predict(row))
    }

    fn kind(&self) -> &'static str {
        "gradient_boosted"
    }
}

/// A fitted learner of either family, as stored inside a model artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "model", rename_all = "snake_case")]
pub enum FittedRegressor {
    RandomForest(RandomForest),
    GradientBoosted(GradientBoosted),
}

impl FittedRegressor {
    /// Fits the learner selected by `config`; all randomness derives from `seed`.
    pub fn fit(config: &RegressorConfig, x: &[Vec<f64>], y: &[f64], seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        match config {
            RegressorConfig::RandomForest(p) => {
                Self::RandomForest(RandomForest::fit(x, y, p, &mut rng))
            }
            RegressorConfig::GradientBoosted(p) => {
                Self::GradientBoosted(GradientBoosted::fit(x, y, p, &mut rng))
            }
        }
    }
}

impl FittedRegressor {
    /// Checks that the learner is complete, finite, and reads at most
    /// `n_features` inputs.
    ///
    /// # Errors
    ///
    /// Returns a description of the first defect found.
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        match self {
            Self::RandomForest(m) => m.validate(n_features),
            Self::GradientBoosted(m) => m.validate(n_features),
        }
    }
}

impl Regressor for FittedRegressor {
    fn predict_row(&self, row: &[f64]) -> f64 {
        match self {
            Self::RandomForest(m) => m.predict_row(row),
            Self::GradientBoosted(m) => m.predict_row(row),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::RandomForest(m) => m.kind(),
            Self::GradientBoosted(m) => m.kind(),
        }
    }
}
