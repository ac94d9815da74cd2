//! Binary confusion matrix and the metrics derived from it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ModelError;
use super::logreg::LogisticModel;
use crate::dataset::Dataset;

/// Ground-truth class totals for a labelled set.
///
/// Labels other than exactly `0.0` or `1.0` are counted in neither total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelCounts {
    pub positive: usize,
    pub negative: usize,
}

impl LabelCounts {
    pub fn from_labels(labels: &[f64]) -> Self {
        labels
            .iter()
            .fold(Self::default(), |mut counts, &y| {
                if y == 1.0 {
                    counts.positive += 1;
                } else if y == 0.0 {
                    counts.negative += 1;
                }
                counts
            })
    }
}

/// Confusion matrix for one (model, test set, threshold) evaluation.
///
/// Ratios whose denominator is zero are `NaN` rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub positive: usize,
    pub negative: usize,
    pub true_positive: usize,
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    /// `TP / positive`.
    pub recall: f64,
    /// `TP / (TP + FP)`.
    pub precision: f64,
    /// `(TP + TN) / (positive + negative)`.
    pub accuracy: f64,
}

impl ConfusionMatrix {
    /// Tally `(label, predicted_positive)` pairs against precomputed totals.
    pub fn tally(counts: LabelCounts, outcomes: impl IntoIterator<Item = (f64, bool)>) -> Self {
        let mut cm = Self {
            positive: counts.positive,
            negative: counts.negative,
            ..Self::default()
        };
        for (label, predicted_positive) in outcomes {
            match (label == 1.0, label == 0.0, predicted_positive) {
                (true, _, true) => cm.true_positive += 1,
                (true, _, false) => cm.false_negative += 1,
                (_, true, true) => cm.false_positive += 1,
                (_, true, false) => cm.true_negative += 1,
                _ => {}
            }
        }
        let tp = cm.true_positive as f64;
        cm.recall = tp / cm.positive as f64;
        cm.precision = tp / (tp + cm.false_positive as f64);
        cm.accuracy =
            (tp + cm.true_negative as f64) / (cm.positive as f64 + cm.negative as f64);
        cm
    }

    /// Build a matrix from predicted classes aligned with `labels`.
    pub fn from_predictions(labels: &[f64], predicted_positive: &[bool]) -> Self {
        Self::tally(
            LabelCounts::from_labels(labels),
            labels.iter().copied().zip(predicted_positive.iter().copied()),
        )
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\tPositives: {}", self.positive)?;
        writeln!(f, "\tNegatives: {}", self.negative)?;
        writeln!(f, "\tTrue Positives: {}", self.true_positive)?;
        writeln!(f, "\tTrue Negatives: {}", self.true_negative)?;
        writeln!(f, "\tFalse Positives: {}", self.false_positive)?;
        writeln!(f, "\tFalse Negatives: {}", self.false_negative)?;
        writeln!(f)?;
        writeln!(f, "\tRecall: {:.2}", self.recall)?;
        writeln!(f, "\tPrecision: {:.2}", self.precision)?;
        writeln!(f, "\tAccuracy: {:.2}", self.accuracy)
    }
}

/// Scores a test set once so it can be thresholded many times.
#[derive(Debug, Clone)]
pub struct ThresholdEvaluator<'a> {
    labels: &'a [f64],
    scores: Vec<f64>,
    counts: LabelCounts,
}

impl<'a> ThresholdEvaluator<'a> {
    /// Fails with `DimensionMismatch` if any test row does not fit the model.
    pub fn new(model: &LogisticModel, test: &'a Dataset) -> Result<Self, ModelError> {
        let scores = test
            .features()
            .iter()
            .map(|row| model.predict_proba(row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            labels: test.labels(),
            scores,
            counts: LabelCounts::from_labels(test.labels()),
        })
    }

    /// Confusion matrix when rows with `p >= decision_boundary` are positive.
    pub fn at(&self, decision_boundary: f64) -> ConfusionMatrix {
        ConfusionMatrix::tally(
            self.counts,
            self.labels
                .iter()
                .zip(&self.scores)
                .map(|(&label, &p)| (label, p >= decision_boundary)),
        )
    }
}

/// Evaluate `model` on `test` at a single decision boundary.
pub fn evaluate(
    model: &LogisticModel,
    test: &Dataset,
    decision_boundary: f64,
) -> Result<ConfusionMatrix, ModelError> {
    Ok(ThresholdEvaluator::new(model, test)?.at(decision_boundary))
}
