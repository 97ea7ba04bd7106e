//! Process-variable name lists (known PVs, out-of-service PVs).
//!
//! One name per line. Blank lines and lines starting with `#` are skipped.

use std::path::Path;

use qegui_common::ConfigError;

pub fn read_name_list(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(path.to_path_buf())
        } else {
            ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
        }
    })?;

    let names: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    tracing::debug!(path = %path.display(), count = names.len(), "Read PV name list");
    Ok(names)
}
