//! Host settings types.
//!
//! Every section uses `#[serde(default)]`, so a partial `settings.toml`
//! only overrides what it names.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What to do when an autosaved configuration is found at startup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecoverPolicy {
    /// Ask the user through the window host.
    #[default]
    Ask,
    Always,
    Never,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AutosaveSettings {
    pub interval_secs: u32,
    pub recover: RecoverPolicy,
}

impl Default for AutosaveSettings {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            recover: RecoverPolicy::Ask,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InstanceSettings {
    pub connect_timeout_ms: u32,
    pub handoff_timeout_ms: u32,
    /// Directory holding the instance socket. Runtime dir when unset.
    pub channel_dir: Option<PathBuf>,
}

impl Default for InstanceSettings {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 1000,
            handoff_timeout_ms: 10_000,
            channel_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SettleSettings {
    pub poll_interval_ms: u32,
    pub max_retries: u32,
    pub horizontal_margin: i32,
    pub vertical_margin: i32,
}

impl Default for SettleSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10,
            max_retries: 1000,
            horizontal_margin: 100,
            vertical_margin: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HostWindowSettings {
    /// Title-bar height the headless host reports once a window is decorated.
    pub decoration_offset: i32,
}

impl Default for HostWindowSettings {
    fn default() -> Self {
        Self {
            decoration_offset: 24,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "qegui=info".into(),
        }
    }
}

/// Top-level host settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HostSettings {
    pub autosave: AutosaveSettings,
    pub instance: InstanceSettings,
    pub settle: SettleSettings,
    pub host: HostWindowSettings,
    pub logging: LoggingSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let s = HostSettings::default();
        assert_eq!(s.autosave.interval_secs, 30);
        assert_eq!(s.autosave.recover, RecoverPolicy::Ask);
        assert_eq!(s.instance.connect_timeout_ms, 1000);
        assert_eq!(s.instance.handoff_timeout_ms, 10_000);
        assert!(s.instance.channel_dir.is_none());
        assert_eq!(s.settle.poll_interval_ms, 10);
        assert_eq!(s.settle.max_retries, 1000);
        assert_eq!(s.settle.horizontal_margin, 100);
        assert_eq!(s.settle.vertical_margin, 50);
        assert_eq!(s.logging.level, "qegui=info");
    }

    #[test]
    fn recover_policy_parses_lowercase() {
        let s: HostSettings = toml::from_str("[autosave]\nrecover = \"never\"\n").unwrap();
        assert_eq!(s.autosave.recover, RecoverPolicy::Never);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let s: HostSettings =
            toml::from_str("[instance]\nchannel_dir = \"/run/qegui\"\n").unwrap();
        assert_eq!(s.instance.channel_dir, Some(PathBuf::from("/run/qegui")));
        assert_eq!(s.instance.connect_timeout_ms, 1000);
    }
}
