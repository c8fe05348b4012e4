//! Hold-out validation metrics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error metrics measured on the held-out partition after training.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Mean absolute error (kWh).
    #[serde(rename = "MAE")]
    pub mae: f64,
    /// Root-mean-square error (kWh).
    #[serde(rename = "RMSE")]
    pub rmse: f64,
}

impl Metrics {
    /// Computes MAE and RMSE between paired predictions and observations.
    ///
    /// Returns zeros for empty input.
    ///
    /// # Panics
    ///
    /// Panics if the two slices differ in length.
    pub fn from_predictions(predicted: &[f64], actual: &[f64]) -> Self {
        assert_eq!(predicted.len(), actual.len());
        if actual.is_empty() {
            return Self {
                mae: 0.0,
                rmse: 0.0,
            };
        }

        let n = actual.len() as f64;
        let mut abs_sum = 0.0_f64;
        let mut sq_sum = 0.0_f64;
        for (p, a) in predicted.iter().zip(actual) {
            let err = p - a;
            abs_sum += err.abs();
            sq_sum += err * err;
        }

        Self {
            mae: abs_sum / n,
            rmse: (sq_sum / n).sqrt(),
        }
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MAE: {:.4}, RMSE: {:.4}", self.mae, self.rmse)
    }
}
