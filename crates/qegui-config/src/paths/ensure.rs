use std::fs;

use qegui_common::ConfigError;

use super::resolve::{config_dir, crash_report_dir, data_dir, log_dir};

/// Creates all QEGui directories if they do not already exist.
pub fn ensure_dirs() -> Result<(), ConfigError> {
    for dir in [config_dir()?, data_dir()?, log_dir()?, crash_report_dir()?] {
        fs::create_dir_all(&dir)
            .map_err(|e| ConfigError::PathError(format!("{}: {e}", dir.display())))?;
    }
    Ok(())
}
