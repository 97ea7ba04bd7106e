use std::path::PathBuf;

use qegui_common::ConfigError;

pub(super) const DIR_NAME: &str = "qegui";

/// Platform configuration directory for QEGui.
///
/// - Linux: `$XDG_CONFIG_HOME/qegui` (defaults to `~/.config/qegui`)
/// - macOS: `~/Library/Application Support/qegui`
/// - Windows: `%APPDATA%\qegui`
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    Ok(dirs::config_dir()
        .ok_or_else(|| ConfigError::PathError("could not determine config directory".into()))?
        .join(DIR_NAME))
}

/// Platform data directory for QEGui.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    Ok(dirs::data_dir()
        .ok_or_else(|| ConfigError::PathError("could not determine data directory".into()))?
        .join(DIR_NAME))
}

/// Host settings file, `config_dir()/settings.toml`.
pub fn settings_file() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("settings.toml"))
}

/// Log directory, `data_dir()/logs`.
pub fn log_dir() -> Result<PathBuf, ConfigError> {
    Ok(data_dir()?.join("logs"))
}

/// Crash report directory, `log_dir()/crash-reports`.
pub fn crash_report_dir() -> Result<PathBuf, ConfigError> {
    Ok(log_dir()?.join("crash-reports"))
}

/// Directory for the instance channel endpoint.
///
/// `$XDG_RUNTIME_DIR` where the platform has one, the temp dir otherwise.
pub fn runtime_dir() -> PathBuf {
    dirs::runtime_dir().unwrap_or_else(std::env::temp_dir)
}
