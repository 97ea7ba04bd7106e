//! Named-configuration store backed by a single JSON file.
//!
//! Writes go to a `.tmp` sibling first and are renamed into place so a crash
//! mid-write never leaves a truncated file behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use qegui_common::StoreError;
use serde::{Deserialize, Serialize};

use crate::element::Configuration;
use crate::names::{is_reserved, DEFAULT_NAME, ROOT_NAME};

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    root: String,
    #[serde(default)]
    configurations: BTreeMap<String, Configuration>,
}

/// Configuration names offered to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigNames {
    /// User-chosen names, sorted, excluding `Default` and reserved names.
    pub user: Vec<String>,
    /// Whether a `Default` configuration exists.
    pub has_default: bool,
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    configurations: BTreeMap<String, Configuration>,
}

impl ConfigStore {
    /// A store for `path` with nothing in it. Nothing is read or written.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            configurations: BTreeMap::new(),
        }
    }

    /// Read the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No configuration file yet");
                return Ok(Self::empty(path));
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let file: StoreFile = serde_json::from_str(&content)
            .map_err(|e| StoreError::Parse(format!("{}: {e}", path.display())))?;
        if file.root != ROOT_NAME {
            return Err(StoreError::Parse(format!(
                "{}: root is '{}', expected '{ROOT_NAME}'",
                path.display(),
                file.root
            )));
        }

        tracing::debug!(
            path = %path.display(),
            count = file.configurations.len(),
            "Opened configuration file"
        );
        Ok(Self {
            path,
            configurations: file.configurations,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_configuration_present(&self, name: &str) -> bool {
        self.configurations.contains_key(name)
    }

    pub fn configuration(&self, name: &str) -> Option<&Configuration> {
        self.configurations.get(name)
    }

    /// Store `config` under `name`, replacing what was there. Call
    /// [`persist`](Self::persist) to write it out.
    pub fn put_configuration(&mut self, name: impl Into<String>, config: Configuration) {
        self.configurations.insert(name.into(), config);
    }

    pub fn config_names(&self) -> ConfigNames {
        let user = self
            .configurations
            .keys()
            .filter(|n| n.as_str() != DEFAULT_NAME && !is_reserved(n))
            .cloned()
            .collect();
        ConfigNames {
            user,
            has_default: self.configurations.contains_key(DEFAULT_NAME),
        }
    }

    /// Remove the named configurations. Returns how many existed.
    pub fn delete_configs<S: AsRef<str>>(&mut self, names: &[S]) -> usize {
        names
            .iter()
            .filter(|n| self.configurations.remove(n.as_ref()).is_some())
            .count()
    }

    /// Write the whole store to its file atomically.
    pub fn persist(&self) -> Result<(), StoreError> {
        let file = StoreFile {
            root: ROOT_NAME.to_string(),
            configurations: self.configurations.clone(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| StoreError::Parse(format!("failed to serialize configurations: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            tracing::warn!("atomic rename failed ({e}), falling back to direct write");
            std::fs::write(&self.path, &json).map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
        }

        tracing::debug!(path = %self.path.display(), "Configuration file saved");
        Ok(())
    }
}
