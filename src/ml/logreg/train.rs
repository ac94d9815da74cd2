use thiserror::Error;

use super::{LogisticModel, linear_term, sigmoid};
use crate::ml::ModelError;

/// Step size used by the harness when none is configured.
pub const DEFAULT_LEARNING_RATE: f64 = 0.0001;
/// L2 penalty used by the harness when none is configured.
pub const DEFAULT_REGULARIZATION: f64 = 0.0;

/// Inputs to a single solver run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverParams {
    pub learning_rate: f64,
    pub regularization: f64,
    /// Exact number of update steps; there is no early stopping.
    pub iterations: usize,
}

impl SolverParams {
    /// Harness defaults with the given iteration budget.
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            regularization: DEFAULT_REGULARIZATION,
            iterations,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.iterations == 0 {
            return Err(ModelError::InvalidHyperparameters(
                "iterations must be positive".to_string(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(ModelError::InvalidHyperparameters(format!(
                "learning rate must be > 0 (got {})",
                self.learning_rate
            )));
        }
        if !self.regularization.is_finite() || self.regularization < 0.0 {
            return Err(ModelError::InvalidHyperparameters(format!(
                "regularization must be >= 0 (got {})",
                self.regularization
            )));
        }
        Ok(())
    }
}

/// Numerical or input failures reported by a [`Solver`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("training set is empty")]
    EmptyTrainingSet,
    #[error("{rows} training rows but {labels} labels")]
    LabelCountMismatch { rows: usize, labels: usize },
    #[error("training rows have no features")]
    NoFeatures,
    #[error("training row {row} has {actual} features, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("learning diverged at iteration {iteration}: weights became infinite or NaN")]
    Diverged { iteration: usize },
    #[error("weight {position} is infinite or NaN")]
    NonFiniteWeight { position: usize },
    #[error("solver returned {actual} weights, expected {expected}")]
    WeightCount { expected: usize, actual: usize },
}

/// Fits a weight vector `[bias, w1, .., wd]` for binary labels.
pub trait Solver {
    fn fit(
        &self,
        features: &[Vec<f64>],
        labels: &[f64],
        params: &SolverParams,
    ) -> Result<Vec<f64>, SolverError>;
}

/// Full-batch gradient ascent on the log-likelihood.
///
/// Weights start at zero. Every step sums `(y - p) * x` over the whole
/// training set (bias column fixed at 1), subtracts `regularization * w` for
/// non-bias weights and applies all updates at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchGradientAscent;

impl Solver for BatchGradientAscent {
    fn fit(
        &self,
        features: &[Vec<f64>],
        labels: &[f64],
        params: &SolverParams,
    ) -> Result<Vec<f64>, SolverError> {
        let dim = check_training_set(features, labels)?;
        let mut theta = vec![0.0f64; dim + 1];
        let mut gradient = vec![0.0f64; dim + 1];

        for iteration in 0..params.iterations {
            gradient.fill(0.0);
            for (row, &y) in features.iter().zip(labels) {
                let residual = y - sigmoid(linear_term(&theta, row));
                gradient[0] += residual;
                for (g, x) in gradient[1..].iter_mut().zip(row) {
                    *g += residual * x;
                }
            }
            for (g, w) in gradient[1..].iter_mut().zip(&theta[1..]) {
                *g -= params.regularization * w;
            }
            for (w, g) in theta.iter_mut().zip(&gradient) {
                *w += params.learning_rate * g;
            }
            if theta.iter().any(|w| !w.is_finite()) {
                return Err(SolverError::Diverged {
                    iteration: iteration + 1,
                });
            }
        }
        Ok(theta)
    }
}

fn check_training_set(features: &[Vec<f64>], labels: &[f64]) -> Result<usize, SolverError> {
    let Some(first) = features.first() else {
        return Err(SolverError::EmptyTrainingSet);
    };
    if features.len() != labels.len() {
        return Err(SolverError::LabelCountMismatch {
            rows: features.len(),
            labels: labels.len(),
        });
    }
    let dim = first.len();
    if dim == 0 {
        return Err(SolverError::NoFeatures);
    }
    if let Some((row, bad)) = features
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != dim)
    {
        return Err(SolverError::RaggedRows {
            row,
            expected: dim,
            actual: bad.len(),
        });
    }
    Ok(dim)
}

/// Run `solver` once and wrap its weights as a [`LogisticModel`].
pub fn train<S: Solver + ?Sized>(
    solver: &S,
    features: &[Vec<f64>],
    labels: &[f64],
    params: &SolverParams,
) -> Result<LogisticModel, ModelError> {
    params.validate()?;
    let weights = solver.fit(features, labels, params)?;
    let expected = features.first().map_or(0, Vec::len) + 1;
    if weights.len() != expected {
        return Err(SolverError::WeightCount {
            expected,
            actual: weights.len(),
        }
        .into());
    }
    tracing::debug!(
        "Trained logistic model: {} iterations, {} weights",
        params.iterations,
        weights.len()
    );
    LogisticModel::from_weights(weights)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> (Vec<Vec<f64>>, Vec<f64>) {
        (
            vec![
                vec![0.0, 0.0],
                vec![1.0, 1.0],
                vec![2.0, 2.0],
                vec![-1.0, -1.0],
            ],
            vec![0.0, 1.0, 1.0, 0.0],
        )
    }

    #[test]
    fn first_step_follows_batch_gradient() {
        let (x, y) = separable();
        let params = SolverParams {
            learning_rate: 0.1,
            regularization: 0.0,
            iterations: 1,
        };
        let theta = BatchGradientAscent.fit(&x, &y, &params).unwrap();
        // At zero weights every p is 0.5: bias gradient is 0, feature gradient is 2.
        assert!(theta[0].abs() < 1e-12);
        assert!((theta[1] - 0.2).abs() < 1e-12);
        assert!((theta[2] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn regularization_shrinks_weights() {
        let (x, y) = separable();
        let plain = SolverParams {
            learning_rate: 0.01,
            regularization: 0.0,
            iterations: 200,
        };
        let ridge = SolverParams {
            regularization: 5.0,
            ..plain
        };
        let free = BatchGradientAscent.fit(&x, &y, &plain).unwrap();
        let shrunk = BatchGradientAscent.fit(&x, &y, &ridge).unwrap();
        assert!(shrunk[1].abs() < free[1].abs());
    }

    #[test]
    fn divergence_is_reported() {
        let x = vec![vec![1e308], vec![-1e308]];
        let y = vec![1.0, 0.0];
        let params = SolverParams {
            learning_rate: 1e10,
            regularization: 0.0,
            iterations: 5,
        };
        assert!(matches!(
            BatchGradientAscent.fit(&x, &y, &params),
            Err(SolverError::Diverged { iteration: 1 })
        ));
    }

    #[test]
    fn rejects_malformed_training_sets() {
        let params = SolverParams::with_iterations(10);
        assert_eq!(
            BatchGradientAscent.fit(&[], &[], &params),
            Err(SolverError::EmptyTrainingSet)
        );
        assert_eq!(
            BatchGradientAscent.fit(&[vec![1.0]], &[1.0, 0.0], &params),
            Err(SolverError::LabelCountMismatch { rows: 1, labels: 2 })
        );
        assert_eq!(
            BatchGradientAscent.fit(&[vec![1.0], vec![1.0, 2.0]], &[1.0, 0.0], &params),
            Err(SolverError::RaggedRows {
                row: 1,
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn train_validates_params_and_wraps_model() {
        let (x, y) = separable();
        assert!(matches!(
            train(&BatchGradientAscent, &x, &y, &SolverParams::with_iterations(0)),
            Err(ModelError::InvalidHyperparameters(_))
        ));
        let model = train(&BatchGradientAscent, &x, &y, &SolverParams::with_iterations(1000)).unwrap();
        assert_eq!(model.feature_dim(), 2);
        assert!(model.predict_proba(&[1.0, 1.0]).unwrap() > 0.5);
        assert!(model.predict_proba(&[-1.0, -1.0]).unwrap() < 0.5);
    }

    #[test]
    fn train_rejects_solver_with_wrong_weight_count() {
        struct Short;
        impl Solver for Short {
            fn fit(&self, _: &[Vec<f64>], _: &[f64], _: &SolverParams) -> Result<Vec<f64>, SolverError> {
                Ok(vec![0.0])
            }
        }
        let (x, y) = separable();
        assert_eq!(
            train(&Short, &x, &y, &SolverParams::with_iterations(1)),
            Err(ModelError::TrainingFailed(SolverError::WeightCount {
                expected: 3,
                actual: 1
            }))
        );
    }
}
