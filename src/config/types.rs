use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::dataset::{DEFAULT_DELIMITER, parse_delimiter};
use crate::ml::logreg::{DEFAULT_LEARNING_RATE, DEFAULT_REGULARIZATION};
use crate::ml::selection::{Hyperparameters, SelectionMode};

/// Settings persisted in `config.toml`.
///
/// Config keys (TOML): `selection`, `data`, `model`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HarnessSettings {
    #[serde(default)]
    pub selection: SelectionSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub model: ModelSettings,
}

impl HarnessSettings {
    /// Replace out-of-range values with defaults.
    pub fn normalized(self) -> Self {
        Self {
            selection: self.selection.normalized(),
            data: self.data.normalized(),
            model: self.model,
        }
    }

    /// Fixed point when both override keys are set, otherwise the default grid.
    pub fn selection_mode(&self) -> SelectionMode {
        match self.selection.fixed_point() {
            Some(point) => SelectionMode::Fixed(point),
            None => SelectionMode::default(),
        }
    }
}

/// Solver constants and the optional fixed hyperparameter override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSettings {
    /// Fixed iteration count; only used together with `decision_boundary`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<usize>,
    /// Fixed decision boundary; only used together with `iterations`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_boundary: Option<f64>,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_regularization")]
    pub regularization: f64,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            iterations: None,
            decision_boundary: None,
            learning_rate: default_learning_rate(),
            regularization: default_regularization(),
        }
    }
}

impl SelectionSettings {
    fn normalized(self) -> Self {
        let learning_rate = if self.learning_rate.is_finite() && self.learning_rate > 0.0 {
            self.learning_rate
        } else {
            default_learning_rate()
        };
        let regularization = if self.regularization.is_finite() && self.regularization >= 0.0 {
            self.regularization
        } else {
            default_regularization()
        };
        Self {
            iterations: self.iterations.filter(|&iterations| iterations > 0),
            decision_boundary: self
                .decision_boundary
                .filter(|&boundary| boundary > 0.0 && boundary < 1.0),
            learning_rate,
            regularization,
        }
    }

    pub fn fixed_point(&self) -> Option<Hyperparameters> {
        let iterations = self.iterations?;
        let decision_boundary = self.decision_boundary?;
        Hyperparameters::new(iterations, decision_boundary).ok()
    }

    /// Store `point` so later runs take the fixed path.
    pub fn remember(&mut self, point: Hyperparameters) {
        self.iterations = Some(point.iterations);
        self.decision_boundary = Some(point.decision_boundary);
    }

    pub fn forget(&mut self) {
        self.iterations = None;
        self.decision_boundary = None;
    }
}

/// Input file options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    /// Single ASCII column separator.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }
}

impl DataSettings {
    fn normalized(self) -> Self {
        let mut buf = [0u8; 4];
        match parse_delimiter(self.delimiter.encode_utf8(&mut buf)) {
            Some(_) => self,
            None => Self::default(),
        }
    }

    pub fn delimiter_byte(&self) -> u8 {
        u8::try_from(self.delimiter).unwrap_or(DEFAULT_DELIMITER)
    }
}

/// Where the selected model is written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

fn default_learning_rate() -> f64 {
    DEFAULT_LEARNING_RATE
}

fn default_regularization() -> f64 {
    DEFAULT_REGULARIZATION
}

fn default_delimiter() -> char {
    char::from(DEFAULT_DELIMITER)
}
