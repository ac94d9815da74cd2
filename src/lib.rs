//! Library exports for reuse in binaries, benchmarks and tests.
/// Application directory resolution.
pub mod app_dirs;
/// Crash-safe file replacement.
pub mod atomic_file;
/// TOML settings.
pub mod config;
/// Delimited numeric datasets.
pub mod dataset;
/// Logging setup.
pub mod logging;
/// Logistic regression training, selection and prediction.
pub mod ml;
