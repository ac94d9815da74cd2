use std::path::Path;

use super::{ConfigError, HarnessSettings, config_path};
use crate::atomic_file;

/// Persist settings to `config.toml` in the application directory.
pub fn save(settings: &HarnessSettings) -> Result<(), ConfigError> {
    let path = config_path()?;
    save_to_path(settings, &path)
}

/// Persist settings as pretty TOML, replacing the file atomically.
pub fn save_to_path(settings: &HarnessSettings, path: &Path) -> Result<(), ConfigError> {
    let text = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_file::write(path, text.as_bytes()).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Saved settings to {}", path.display());
    Ok(())
}
