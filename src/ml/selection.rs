//! Grid search over iteration count and decision boundary.
//!
//! The model depends only on the iteration count, so each iteration count is
//! trained once and its test-set scores are thresholded at every boundary.
//! With a deterministic solver this yields the same winner as retraining at
//! every grid point.

use serde::{Deserialize, Serialize};

use super::ModelError;
use super::logreg::{BatchGradientAscent, LogisticModel, Solver, SolverParams, train};
use super::metrics::{ConfusionMatrix, ThresholdEvaluator};
use crate::dataset::{Dataset, TrainTestData};

/// First iteration count of the default grid.
pub const DEFAULT_ITERATIONS_START: usize = 100;
/// Exclusive upper bound of the default iteration counts.
pub const DEFAULT_ITERATIONS_END: usize = 3300;
pub const DEFAULT_ITERATIONS_STEP: usize = 500;
/// Default boundaries are `DEFAULT_BOUNDARY_START..DEFAULT_BOUNDARY_END` hundredths.
pub const DEFAULT_BOUNDARY_START: u32 = 5;
pub const DEFAULT_BOUNDARY_END: u32 = 100;

/// One point of the hyperparameter grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    pub iterations: usize,
    pub decision_boundary: f64,
}

impl Hyperparameters {
    pub fn new(iterations: usize, decision_boundary: f64) -> Result<Self, ModelError> {
        let point = Self {
            iterations,
            decision_boundary,
        };
        point.validate()?;
        Ok(point)
    }

    /// Iterations must be positive and the boundary strictly inside `(0, 1)`.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.iterations == 0 {
            return Err(ModelError::InvalidHyperparameters(
                "iterations must be positive".to_string(),
            ));
        }
        validate_boundary(self.decision_boundary)
    }
}

fn validate_boundary(boundary: f64) -> Result<(), ModelError> {
    if boundary > 0.0 && boundary < 1.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidHyperparameters(format!(
            "decision boundary must be in (0, 1), got {boundary}"
        )))
    }
}

/// Cartesian grid visited in row-major order (iterations outer).
#[derive(Debug, Clone, PartialEq)]
pub struct HyperparameterGrid {
    iterations: Vec<usize>,
    decision_boundaries: Vec<f64>,
}

impl Default for HyperparameterGrid {
    /// Iterations `100, 600, .., 3100` by boundaries `0.05, 0.06, .., 0.99`.
    fn default() -> Self {
        Self {
            iterations: iteration_range(
                DEFAULT_ITERATIONS_START,
                DEFAULT_ITERATIONS_END,
                DEFAULT_ITERATIONS_STEP,
            ),
            decision_boundaries: boundary_range(DEFAULT_BOUNDARY_START, DEFAULT_BOUNDARY_END),
        }
    }
}

impl HyperparameterGrid {
    pub fn new(iterations: Vec<usize>, decision_boundaries: Vec<f64>) -> Result<Self, ModelError> {
        if iterations.is_empty() || decision_boundaries.is_empty() {
            return Err(ModelError::InvalidHyperparameters(
                "grid needs at least one iteration count and one boundary".to_string(),
            ));
        }
        if iterations.contains(&0) {
            return Err(ModelError::InvalidHyperparameters(
                "iterations must be positive".to_string(),
            ));
        }
        for &boundary in &decision_boundaries {
            validate_boundary(boundary)?;
        }
        Ok(Self {
            iterations,
            decision_boundaries,
        })
    }

    /// Grid containing exactly one point.
    pub fn single(point: Hyperparameters) -> Self {
        Self {
            iterations: vec![point.iterations],
            decision_boundaries: vec![point.decision_boundary],
        }
    }

    pub fn iterations(&self) -> &[usize] {
        &self.iterations
    }

    pub fn decision_boundaries(&self) -> &[f64] {
        &self.decision_boundaries
    }

    pub fn len(&self) -> usize {
        self.iterations.len() * self.decision_boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All points in visiting order.
    pub fn points(&self) -> impl Iterator<Item = Hyperparameters> + '_ {
        self.iterations.iter().flat_map(move |&iterations| {
            self.decision_boundaries
                .iter()
                .map(move |&decision_boundary| Hyperparameters {
                    iterations,
                    decision_boundary,
                })
        })
    }
}

/// `start, start + step, ..` strictly below `end`.
pub fn iteration_range(start: usize, end: usize, step: usize) -> Vec<usize> {
    (start..end).step_by(step.max(1)).collect()
}

/// Boundaries `start/100 ..` strictly below `end/100`, one hundredth apart.
///
/// Each value is computed from its integer index so the grid never drifts.
pub fn boundary_range(start_hundredths: u32, end_hundredths: u32) -> Vec<f64> {
    (start_hundredths..end_hundredths)
        .map(|hundredths| f64::from(hundredths) / 100.0)
        .collect()
}

/// Winner of a selection run.
#[derive(Debug, Clone, PartialEq)]
pub struct BestModelRecord {
    pub model: LogisticModel,
    pub hyperparameters: Hyperparameters,
    pub confusion: ConfusionMatrix,
    pub accuracy: f64,
}

/// How a selection run picks its hyperparameters.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionMode {
    /// Search the grid for the most accurate point.
    Grid(HyperparameterGrid),
    /// Train once at a fixed point, skipping the search.
    Fixed(Hyperparameters),
}

impl Default for SelectionMode {
    fn default() -> Self {
        Self::Grid(HyperparameterGrid::default())
    }
}

/// Progress report emitted after each evaluated grid point.
#[derive(Debug, Clone, Copy)]
pub struct GridPointReport {
    /// Zero-based position in visiting order.
    pub index: usize,
    pub total: usize,
    pub hyperparameters: Hyperparameters,
    pub accuracy: f64,
    /// Whether this point replaced the running best.
    pub improved: bool,
}

/// Trains and scores candidates with a fixed learning rate and regularization.
#[derive(Debug, Clone)]
pub struct ModelSelector<S = BatchGradientAscent> {
    solver: S,
    learning_rate: f64,
    regularization: f64,
}

impl Default for ModelSelector<BatchGradientAscent> {
    fn default() -> Self {
        Self::new(BatchGradientAscent)
    }
}

impl<S: Solver> ModelSelector<S> {
    pub fn new(solver: S) -> Self {
        let defaults = SolverParams::with_iterations(1);
        Self {
            solver,
            learning_rate: defaults.learning_rate,
            regularization: defaults.regularization,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_regularization(mut self, regularization: f64) -> Self {
        self.regularization = regularization;
        self
    }

    fn params(&self, iterations: usize) -> SolverParams {
        SolverParams {
            learning_rate: self.learning_rate,
            regularization: self.regularization,
            iterations,
        }
    }

    /// Run either the grid search or the fixed-point path.
    pub fn run(
        &self,
        data: &TrainTestData,
        mode: &SelectionMode,
    ) -> Result<BestModelRecord, ModelError> {
        match mode {
            SelectionMode::Grid(grid) => self.select_best(data.train(), data.test(), grid),
            SelectionMode::Fixed(point) => self.train_fixed(data.train(), data.test(), *point),
        }
    }

    /// Train once at `point` and report its test-set metrics.
    ///
    /// The record is returned even when the accuracy is undefined.
    pub fn train_fixed(
        &self,
        train_set: &Dataset,
        test_set: &Dataset,
        point: Hyperparameters,
    ) -> Result<BestModelRecord, ModelError> {
        point.validate()?;
        tracing::info!(
            "Training fixed model: {} iterations, decision boundary {:.2}",
            point.iterations,
            point.decision_boundary
        );
        let model = self.train_model(train_set, point.iterations)?;
        let confusion = ThresholdEvaluator::new(&model, test_set)?.at(point.decision_boundary);
        Ok(BestModelRecord {
            model,
            hyperparameters: point,
            accuracy: confusion.accuracy,
            confusion,
        })
    }

    pub fn select_best(
        &self,
        train_set: &Dataset,
        test_set: &Dataset,
        grid: &HyperparameterGrid,
    ) -> Result<BestModelRecord, ModelError> {
        self.select_best_with_progress(train_set, test_set, grid, |_| {})
    }

    /// Grid search keeping the strictly most accurate point.
    ///
    /// Ties keep the earlier point and `NaN` accuracies never win. The first
    /// training or evaluation failure aborts the search.
    pub fn select_best_with_progress(
        &self,
        train_set: &Dataset,
        test_set: &Dataset,
        grid: &HyperparameterGrid,
        mut on_point: impl FnMut(&GridPointReport),
    ) -> Result<BestModelRecord, ModelError> {
        tracing::info!(
            "Searching for the best logistic regression model over {} grid points...",
            grid.len()
        );
        let total = grid.len();
        let mut index = 0usize;
        let mut best: Option<BestModelRecord> = None;

        for &iterations in grid.iterations() {
            let model = self.train_model(train_set, iterations)?;
            let evaluator = ThresholdEvaluator::new(&model, test_set)?;
            for &decision_boundary in grid.decision_boundaries() {
                let confusion = evaluator.at(decision_boundary);
                let accuracy = confusion.accuracy;
                let improved = !accuracy.is_nan()
                    && best.as_ref().is_none_or(|current| accuracy > current.accuracy);
                let hyperparameters = Hyperparameters {
                    iterations,
                    decision_boundary,
                };
                if improved {
                    best = Some(BestModelRecord {
                        model: model.clone(),
                        hyperparameters,
                        confusion,
                        accuracy,
                    });
                }
                on_point(&GridPointReport {
                    index,
                    total,
                    hyperparameters,
                    accuracy,
                    improved,
                });
                index += 1;
            }
            tracing::debug!(
                "Evaluated {} boundaries at {} iterations; best accuracy so far {:.4}",
                grid.decision_boundaries().len(),
                iterations,
                best.as_ref().map_or(f64::NAN, |record| record.accuracy)
            );
        }

        let best = best.ok_or(ModelError::NoViableModel)?;
        tracing::debug!("Maximum accuracy: {:.2}", best.accuracy);
        tracing::debug!(
            "with Decision Boundary: {:.2}",
            best.hyperparameters.decision_boundary
        );
        tracing::debug!("with Num Iterations: {}", best.hyperparameters.iterations);
        Ok(best)
    }

    fn train_model(&self, train_set: &Dataset, iterations: usize) -> Result<LogisticModel, ModelError> {
        train(
            &self.solver,
            train_set.features(),
            train_set.labels(),
            &self.params(iterations),
        )
    }
}

/// Grid search with the default solver, learning rate and regularization.
pub fn select_best(
    train_set: &Dataset,
    test_set: &Dataset,
    grid: &HyperparameterGrid,
) -> Result<BestModelRecord, ModelError> {
    ModelSelector::default().select_best(train_set, test_set, grid)
}
