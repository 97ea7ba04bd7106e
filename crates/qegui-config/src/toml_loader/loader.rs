//! Read host settings from a path or the platform default.

use crate::schema::HostSettings;
use crate::validation;
use qegui_common::ConfigError;
use std::path::Path;
use tracing::{info, warn};

use super::paths::{create_default_settings, default_settings_path};

/// Load settings from a specific TOML file.
///
/// Missing fields take their defaults. Validation problems are logged; the
/// parsed settings are still returned so the caller decides what to do.
pub fn load_from_path(path: &Path) -> Result<HostSettings, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "failed to read {}: {e}",
                path.display()
            )))
        }
    };

    let settings: HostSettings = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&settings) {
        warn!(path = %path.display(), "Settings validation warning: {e}");
    }

    info!(path = %path.display(), "Loaded host settings");
    Ok(settings)
}

/// Load settings from `settings_file()`, creating a commented default file
/// when none exists.
pub fn load_default() -> Result<HostSettings, ConfigError> {
    let path = default_settings_path()?;

    match load_from_path(&path) {
        Ok(settings) => Ok(settings),
        Err(ConfigError::FileNotFound(_)) => {
            info!(path = %path.display(), "No settings found, creating default");
            create_default_settings(&path)?;
            Ok(HostSettings::default())
        }
        Err(e) => Err(e),
    }
}
