use qegui_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::info;

use super::template::default_settings_toml;

pub fn default_settings_path() -> Result<PathBuf, ConfigError> {
    crate::paths::settings_file()
}

/// Write the commented default settings file, creating parent directories.
pub fn create_default_settings(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::PathError(format!(
                "failed to create settings directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, default_settings_toml()).map_err(|e| {
        ConfigError::PathError(format!(
            "failed to write default settings to {}: {e}",
            path.display()
        ))
    })?;

    info!(path = %path.display(), "Created default settings");
    Ok(())
}
