//! JSON persistence for selected models.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ModelError;
use super::logreg::LogisticModel;
use super::predict::Predictor;
use super::selection::{BestModelRecord, Hyperparameters};
use crate::atomic_file;

/// Current on-disk layout version.
pub const SAVED_MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid model file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Unsupported model format_version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("Invalid saved model: {0}")]
    Invalid(#[from] ModelError),
}

/// Weights, boundary and iteration count of a selected model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedModel {
    pub format_version: u32,
    /// Bias first, then one weight per feature.
    pub weights: Vec<f64>,
    pub decision_boundary: f64,
    pub iterations: usize,
}

impl From<&BestModelRecord> for SavedModel {
    fn from(record: &BestModelRecord) -> Self {
        Self {
            format_version: SAVED_MODEL_FORMAT_VERSION,
            weights: record.model.weights().to_vec(),
            decision_boundary: record.hyperparameters.decision_boundary,
            iterations: record.hyperparameters.iterations,
        }
    }
}

impl SavedModel {
    pub fn validate(&self) -> Result<(), PersistError> {
        if self.format_version != SAVED_MODEL_FORMAT_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found: self.format_version,
                expected: SAVED_MODEL_FORMAT_VERSION,
            });
        }
        Hyperparameters::new(self.iterations, self.decision_boundary)?;
        LogisticModel::from_weights(self.weights.clone())?;
        Ok(())
    }

    pub fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters {
            iterations: self.iterations,
            decision_boundary: self.decision_boundary,
        }
    }

    /// Validate and build a predictor from the stored fields.
    pub fn into_predictor(self) -> Result<Predictor, PersistError> {
        self.validate()?;
        let model = LogisticModel::from_weights(self.weights)?;
        Ok(Predictor::new(model, self.decision_boundary))
    }
}

/// Write `model` as pretty JSON, replacing any previous file atomically.
pub fn save_model(path: &Path, model: &SavedModel) -> Result<(), PersistError> {
    let bytes = serde_json::to_vec_pretty(model).map_err(|source| PersistError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_file::write(path, &bytes).map_err(|source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Saved model to {}", path.display());
    Ok(())
}

/// Read and validate a model written by [`save_model`].
pub fn load_model(path: &Path) -> Result<SavedModel, PersistError> {
    let bytes = std::fs::read(path).map_err(|source| PersistError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let model: SavedModel = serde_json::from_slice(&bytes).map_err(|source| PersistError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    model.validate()?;
    Ok(model)
}
