use thiserror::Error;

use super::logreg::SolverError;

/// Errors surfaced by training, selection and prediction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// An input row does not match the model's feature dimensionality.
    #[error("Row has {actual} features but the model expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// The solver could not produce a usable weight vector.
    #[error("Training failed: {0}")]
    TrainingFailed(#[from] SolverError),
    /// Prediction was requested without a trained model.
    #[error("No trained model available for prediction")]
    ModelNotTrained,
    /// Every grid point produced an undefined (NaN) accuracy.
    #[error("No grid point produced a comparable accuracy")]
    NoViableModel,
    /// A hyperparameter is outside its valid range.
    #[error("Invalid hyperparameters: {0}")]
    InvalidHyperparameters(String),
    /// A prediction batch contained no rows.
    #[error("Prediction input is empty")]
    EmptyDataset,
}
