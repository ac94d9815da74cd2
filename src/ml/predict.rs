//! Binary classification of new rows with a selected model.

use super::ModelError;
use super::logreg::LogisticModel;
use super::selection::BestModelRecord;

/// Holds the model and boundary used for inference, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predictor {
    fitted: Option<(LogisticModel, f64)>,
}

impl Predictor {
    /// A predictor with no model; every prediction fails with `ModelNotTrained`.
    pub fn untrained() -> Self {
        Self::default()
    }

    pub fn new(model: LogisticModel, decision_boundary: f64) -> Self {
        Self {
            fitted: Some((model, decision_boundary)),
        }
    }

    pub fn is_trained(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn decision_boundary(&self) -> Option<f64> {
        self.fitted.as_ref().map(|(_, boundary)| *boundary)
    }

    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<u8>, ModelError> {
        let (model, boundary) = self.fitted.as_ref().ok_or(ModelError::ModelNotTrained)?;
        classify_rows(model, *boundary, rows)
    }
}

impl From<&BestModelRecord> for Predictor {
    fn from(record: &BestModelRecord) -> Self {
        Self::new(
            record.model.clone(),
            record.hyperparameters.decision_boundary,
        )
    }
}

impl From<BestModelRecord> for Predictor {
    fn from(record: BestModelRecord) -> Self {
        Self::new(record.model, record.hyperparameters.decision_boundary)
    }
}

/// Classify `rows` with the record's model and boundary.
pub fn predict(record: &BestModelRecord, rows: &[Vec<f64>]) -> Result<Vec<u8>, ModelError> {
    classify_rows(
        &record.model,
        record.hyperparameters.decision_boundary,
        rows,
    )
}

/// Every row is checked before any is classified, so a bad row yields no output.
fn classify_rows(
    model: &LogisticModel,
    decision_boundary: f64,
    rows: &[Vec<f64>],
) -> Result<Vec<u8>, ModelError> {
    tracing::info!("Making new prediction for {} rows...", rows.len());
    if rows.is_empty() {
        return Err(ModelError::EmptyDataset);
    }
    tracing::debug!("Model size: {}", model.feature_dim());
    tracing::debug!("Prediction data size: {}", rows[0].len());
    for row in rows {
        model.check_dim(row)?;
    }
    rows.iter()
        .map(|row| Ok(u8::from(model.classify(row, decision_boundary)?)))
        .collect()
}
