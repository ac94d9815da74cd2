//! Binary logistic regression model over dense `f64` feature rows.

use serde::{Deserialize, Serialize};

use super::ModelError;

mod train;
pub use train::{
    BatchGradientAscent, DEFAULT_LEARNING_RATE, DEFAULT_REGULARIZATION, Solver, SolverError,
    SolverParams, train,
};

/// Fitted logistic regression weights, bias first.
///
/// A model built through [`train`] or [`LogisticModel::from_weights`] always
/// holds a bias plus at least one finite feature weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    weights: Vec<f64>,
}

impl LogisticModel {
    /// Wrap a weight vector (`[bias, w1, .., wd]`) produced elsewhere.
    pub fn from_weights(weights: Vec<f64>) -> Result<Self, ModelError> {
        if weights.len() < 2 {
            return Err(ModelError::ModelNotTrained);
        }
        if let Some(position) = weights.iter().position(|w| !w.is_finite()) {
            return Err(SolverError::NonFiniteWeight { position }.into());
        }
        Ok(Self { weights })
    }

    /// Full weight vector including the bias at index 0.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.weights[0]
    }

    /// Number of input features the model was trained on.
    pub fn feature_dim(&self) -> usize {
        self.weights.len() - 1
    }

    /// Probability that `row` belongs to the positive class.
    pub fn predict_proba(&self, row: &[f64]) -> Result<f64, ModelError> {
        self.check_dim(row)?;
        Ok(sigmoid(linear_term(&self.weights, row)))
    }

    /// Positive iff the probability reaches `decision_boundary`.
    pub fn classify(&self, row: &[f64], decision_boundary: f64) -> Result<bool, ModelError> {
        Ok(self.predict_proba(row)? >= decision_boundary)
    }

    pub(crate) fn check_dim(&self, row: &[f64]) -> Result<(), ModelError> {
        if row.len() != self.feature_dim() {
            return Err(ModelError::DimensionMismatch {
                expected: self.feature_dim(),
                actual: row.len(),
            });
        }
        Ok(())
    }
}

pub(crate) fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// `theta[0] + sum(theta[j + 1] * row[j])`; callers check lengths.
pub(crate) fn linear_term(theta: &[f64], row: &[f64]) -> f64 {
    theta[1..]
        .iter()
        .zip(row)
        .fold(theta[0], |acc, (w, x)| acc + w * x)
}
