//! Delimited-file loader: one sample per line, label in the final column.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use super::{DatasetError, Dataset, TrainTestData, check_uniform_width};

/// Column separator used when none is configured.
pub const DEFAULT_DELIMITER: u8 = b',';

/// Parse a delimiter argument: one non-alphanumeric ASCII byte, or `tab`.
pub fn parse_delimiter(value: &str) -> Option<u8> {
    match value {
        "\\t" | "tab" => Some(b'\t'),
        _ => match value.as_bytes() {
            [byte] if byte.is_ascii() && !byte.is_ascii_alphanumeric() => Some(*byte),
            _ => None,
        },
    }
}

/// Parse numeric rows from a headerless delimited stream.
///
/// Empty lines are skipped; a line of only whitespace or empty cells is
/// `MalformedInput`. Every other line must parse fully as finite `f64` values
/// and match the column count of the first line.
pub fn parse_rows<R: Read>(reader: R, delimiter: u8) -> Result<Vec<Vec<f64>>, DatasetError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            return Err(DatasetError::MalformedInput {
                row: idx,
                reason: "row is empty".to_string(),
            });
        }
        let row = record
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                match cell.parse::<f64>() {
                    Ok(value) if value.is_finite() => Ok(value),
                    Ok(_) => Err(DatasetError::MalformedInput {
                        row: idx,
                        reason: format!("column {col} is not finite: {cell:?}"),
                    }),
                    Err(_) => Err(DatasetError::MalformedInput {
                        row: idx,
                        reason: format!("column {col} is not a number: {cell:?}"),
                    }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    check_uniform_width(&rows)?;
    Ok(rows)
}

/// Read all numeric rows of a delimited file.
pub fn read_rows(path: &Path, delimiter: u8) -> Result<Vec<Vec<f64>>, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_rows(file, delimiter).map_err(|err| in_file(path, err))
}

/// Load a labelled dataset from a delimited file.
pub fn load_csv(path: &Path, delimiter: u8) -> Result<Dataset, DatasetError> {
    let rows = read_rows(path, delimiter)?;
    Dataset::from_labeled_rows(&rows).map_err(|err| in_file(path, err))
}

/// Load both partitions and check they share a feature dimensionality.
pub fn load_train_test_csv(
    train_path: &Path,
    test_path: &Path,
    delimiter: u8,
) -> Result<TrainTestData, DatasetError> {
    tracing::info!("Loading Train & Test data from CSV files...");
    let train = load_csv(train_path, delimiter)?;
    let test = load_csv(test_path, delimiter)?;
    tracing::debug!(
        "Loaded {} train rows and {} test rows ({} features)",
        train.len(),
        test.len(),
        train.feature_dim()
    );
    TrainTestData::new(train, test)
}

/// Load rows to classify.
///
/// With `labeled` set the final column is dropped, so a labelled test file can
/// be fed straight to the predictor.
pub fn load_prediction_csv(
    path: &Path,
    delimiter: u8,
    labeled: bool,
) -> Result<Vec<Vec<f64>>, DatasetError> {
    tracing::info!("Loading prediction data from {}...", path.display());
    let rows = read_rows(path, delimiter)?;
    if rows.is_empty() {
        return Err(in_file(path, DatasetError::EmptyDataset));
    }
    if !labeled {
        return Ok(rows);
    }
    Ok(Dataset::from_labeled_rows(&rows)
        .map_err(|err| in_file(path, err))?
        .features()
        .to_vec())
}

fn in_file(path: &Path, err: DatasetError) -> DatasetError {
    match err {
        DatasetError::InFile { .. } | DatasetError::Io { .. } => err,
        other => DatasetError::InFile {
            path: path.to_path_buf(),
            source: Box::new(other),
        },
    }
}
