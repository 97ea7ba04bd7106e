use std::fmt;
use std::path::{Path, PathBuf};

/// Well-known channel name, one per (application, OS user).
///
/// Including the user keeps two people on one machine from sharing an
/// instance, and from tripping over each other's stale endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelName {
    name: String,
}

impl ChannelName {
    pub fn new(app: &str, user: &str) -> Self {
        Self {
            name: format!("{app}Instance_{user}"),
        }
    }

    /// Channel for this application and the user running the process.
    pub fn for_current_user() -> Self {
        #[cfg(windows)]
        const USER_VAR: &str = "USERNAME";
        #[cfg(not(windows))]
        const USER_VAR: &str = "USER";

        let user = std::env::var(USER_VAR).unwrap_or_default();
        Self::new(qegui_common::APP_NAME, &user)
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Endpoint location inside `dir`.
    pub fn socket_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.name)
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
