//! Macro substitution lists such as `SECTOR=3, DEV="ION, 1"`.
//!
//! A name given more than once keeps its first value. The same rule applies
//! whether the list came from the command line, a handed-off parameter set,
//! or a saved configuration.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroSubstitutions {
    pairs: Vec<(String, String)>,
}

impl MacroSubstitutions {
    /// Parse a comma separated `NAME=VALUE` list. Values may be double
    /// quoted to contain commas. Parts without `=` or with an empty name are
    /// ignored.
    pub fn parse(text: &str) -> Self {
        let mut subs = Self::default();
        for part in split_unquoted(text) {
            let Some((name, value)) = part.split_once('=') else {
                if !part.trim().is_empty() {
                    tracing::debug!(part = %part.trim(), "Ignoring macro without a value");
                }
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            subs.insert(name, unquote(value.trim()));
        }
        subs
    }

    /// Add `name`, unless it is already present.
    pub fn insert(&mut self, name: &str, value: &str) -> bool {
        if self.get(name).is_some() {
            return false;
        }
        self.pairs.push((name.to_string(), value.to_string()));
        true
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl fmt::Display for MacroSubstitutions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if value.contains(',') || value.contains('=') {
                write!(f, "{name}=\"{value}\"")?;
            } else {
                write!(f, "{name}={value}")?;
            }
        }
        Ok(())
    }
}

fn split_unquoted(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    for (i, c) in text.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
