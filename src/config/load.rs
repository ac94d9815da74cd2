use std::path::{Path, PathBuf};

use super::{CONFIG_FILE_NAME, ConfigError, HarnessSettings};
use crate::app_dirs;

/// Path of `config.toml` inside the application directory.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load settings from the application directory, falling back to defaults
/// when no file exists yet.
pub fn load_or_default() -> Result<HarnessSettings, ConfigError> {
    let path = config_path()?;
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(HarnessSettings::default());
    }
    load_from(&path)
}

/// Load and normalize settings from an explicit TOML file.
pub fn load_from(path: &Path) -> Result<HarnessSettings, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: HarnessSettings = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(settings.normalized())
}
