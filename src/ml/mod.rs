//! Training, threshold selection and inference for the binary classifier.
//!
//! Data flows from [`logreg::train`] through [`metrics`] scoring into the
//! [`selection`] grid search; the winning record feeds [`predict`] and can be
//! stored with [`persist`].

mod error;
pub mod logreg;
pub mod metrics;
pub mod persist;
pub mod predict;
pub mod selection;

pub use error::ModelError;
