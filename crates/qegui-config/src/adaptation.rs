//! Adaptation parameters: site-level defaults supplied outside the command line.
//!
//! Keys are lower-case names such as `adjust_scale` or `disable_menu`. The
//! environment source looks them up as `QEGUI_ADJUST_SCALE`,
//! `QEGUI_DISABLE_MENU`, and so on.

use std::collections::HashMap;

/// Source of adaptation parameters consulted before command-line overrides.
pub trait AdaptationSource {
    /// Raw value for `key`, if the source defines it.
    fn get(&self, key: &str) -> Option<String>;

    fn get_string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Parsed float for `key`. Unparseable values are logged and ignored.
    fn get_f64(&self, key: &str) -> Option<f64> {
        let raw = self.get(key)?;
        match raw.trim().parse::<f64>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(key, value = %raw, "Ignoring non-numeric adaptation parameter");
                None
            }
        }
    }

    /// Boolean for `key`. A missing key is false.
    fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| parse_bool(&v).unwrap_or(true))
            .unwrap_or(false)
    }
}

/// Recognise the usual spellings of a boolean. `None` for anything else.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Reads adaptation parameters from prefixed environment variables.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
}

impl EnvSource {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn variable_name(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key.to_ascii_uppercase())
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new("QEGUI_")
    }
}

impl AdaptationSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(self.variable_name(key)).ok()
    }
}

impl AdaptationSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}
