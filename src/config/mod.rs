//! TOML settings for the harness.
//!
//! `config.toml` lives in the application directory and supplies the solver
//! constants, the input delimiter, the model output path and an optional fixed
//! hyperparameter pair that skips the grid search. Command-line flags win over
//! anything read here.

mod errors;
mod load;
mod save;
mod types;

pub use errors::ConfigError;
pub use load::{config_path, load_from, load_or_default};
pub use save::{save, save_to_path};
pub use types::{DataSettings, HarnessSettings, ModelSettings, SelectionSettings};

/// File name of the settings file inside the application directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
