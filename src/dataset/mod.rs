//! Labelled tabular data and the train/test pair the harness consumes.

use std::path::PathBuf;

use thiserror::Error;

pub mod loader;

pub use loader::{
    DEFAULT_DELIMITER, load_csv, load_prediction_csv, load_train_test_csv, parse_delimiter,
    read_rows,
};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// A partition or input file has no rows.
    #[error("dataset is empty")]
    EmptyDataset,
    /// A row is empty, non-numeric, or differs in width from the first row.
    #[error("malformed input at row {row}: {reason}")]
    MalformedInput { row: usize, reason: String },
    /// Train and test partitions disagree on feature dimensionality.
    #[error("train rows have {train} features but test rows have {test}")]
    ShapeMismatch { train: usize, test: usize },
    #[error("{path}: {source}")]
    InFile {
        path: PathBuf,
        source: Box<DatasetError>,
    },
}

/// Feature rows with aligned labels.
///
/// Construction guarantees at least one row, equal-width rows of at least one
/// feature, and one label per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Vec<Vec<f64>>,
    labels: Vec<f64>,
}

impl Dataset {
    pub fn new(features: Vec<Vec<f64>>, labels: Vec<f64>) -> Result<Self, DatasetError> {
        if features.is_empty() {
            return Err(DatasetError::EmptyDataset);
        }
        if features.len() != labels.len() {
            return Err(DatasetError::MalformedInput {
                row: features.len().min(labels.len()),
                reason: format!("{} feature rows but {} labels", features.len(), labels.len()),
            });
        }
        let dim = check_uniform_width(&features)?;
        if dim == 0 {
            return Err(DatasetError::MalformedInput {
                row: 0,
                reason: "row has no features".to_string(),
            });
        }
        Ok(Self { features, labels })
    }

    /// Split rows whose last column is the label. The input is left untouched.
    pub fn from_labeled_rows(rows: &[Vec<f64>]) -> Result<Self, DatasetError> {
        if rows.is_empty() {
            return Err(DatasetError::EmptyDataset);
        }
        let width = check_uniform_width(rows)?;
        if width < 2 {
            return Err(DatasetError::MalformedInput {
                row: 0,
                reason: format!("need at least one feature and a label, found {width} column(s)"),
            });
        }
        let (features, labels): (Vec<Vec<f64>>, Vec<f64>) = rows
            .iter()
            .map(|row| (row[..width - 1].to_vec(), row[width - 1]))
            .unzip();
        Ok(Self { features, labels })
    }

    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false for a constructed dataset; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn feature_dim(&self) -> usize {
        self.features[0].len()
    }
}

/// Disjoint train and test partitions with matching feature dimensionality.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestData {
    train: Dataset,
    test: Dataset,
}

impl TrainTestData {
    pub fn new(train: Dataset, test: Dataset) -> Result<Self, DatasetError> {
        if train.feature_dim() != test.feature_dim() {
            return Err(DatasetError::ShapeMismatch {
                train: train.feature_dim(),
                test: test.feature_dim(),
            });
        }
        Ok(Self { train, test })
    }

    /// Build both partitions from in-memory rows with the label in the last column.
    pub fn from_rows(train_rows: &[Vec<f64>], test_rows: &[Vec<f64>]) -> Result<Self, DatasetError> {
        tracing::info!("Loading train & test data from in-memory rows...");
        if train_rows.is_empty() || test_rows.is_empty() {
            return Err(DatasetError::EmptyDataset);
        }
        let train = Dataset::from_labeled_rows(train_rows)?;
        let test = Dataset::from_labeled_rows(test_rows)?;
        Self::new(train, test)
    }

    pub fn train(&self) -> &Dataset {
        &self.train
    }

    pub fn test(&self) -> &Dataset {
        &self.test
    }
}

/// Width of the first row, or `MalformedInput` naming the first row that differs.
pub(crate) fn check_uniform_width(rows: &[Vec<f64>]) -> Result<usize, DatasetError> {
    let width = rows.first().map_or(0, Vec::len);
    match rows.iter().position(|row| row.len() != width) {
        Some(row) => Err(DatasetError::MalformedInput {
            row,
            reason: format!("expected {width} columns, found {}", rows[row].len()),
        }),
        None => Ok(width),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_rows_split_off_last_column() {
        let rows = vec![vec![1.0, 2.0, 1.0], vec![3.0, 4.0, 0.0]];
        let data = Dataset::from_labeled_rows(&rows).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.feature_dim(), 2);
        assert_eq!(data.features(), &[vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(data.labels(), &[1.0, 0.0]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 3);
    }

    #[test]
    fn ragged_rows_are_malformed() {
        let rows = vec![vec![1.0, 2.0, 1.0], vec![3.0, 0.0]];
        assert!(matches!(
            Dataset::from_labeled_rows(&rows),
            Err(DatasetError::MalformedInput { row: 1, .. })
        ));
        assert!(matches!(
            Dataset::new(vec![vec![1.0], vec![1.0, 2.0]], vec![0.0, 1.0]),
            Err(DatasetError::MalformedInput { row: 1, .. })
        ));
    }

    #[test]
    fn label_only_rows_are_malformed() {
        assert!(matches!(
            Dataset::from_labeled_rows(&[vec![1.0], vec![0.0]]),
            Err(DatasetError::MalformedInput { row: 0, .. })
        ));
    }

    #[test]
    fn empty_partitions_are_rejected() {
        assert!(matches!(
            TrainTestData::from_rows(&[], &[vec![1.0, 0.0]]),
            Err(DatasetError::EmptyDataset)
        ));
        assert!(matches!(
            TrainTestData::from_rows(&[vec![1.0, 0.0]], &[]),
            Err(DatasetError::EmptyDataset)
        ));
    }

    #[test]
    fn train_and_test_must_share_dimensionality() {
        let err = TrainTestData::from_rows(&[vec![1.0, 2.0, 1.0]], &[vec![1.0, 0.0]]).unwrap_err();
        assert!(matches!(err, DatasetError::ShapeMismatch { train: 2, test: 1 }));
    }
}
