//! Platform directories used by the host.

mod ensure;
mod resolve;

pub use ensure::ensure_dirs;
pub use resolve::{
    config_dir, crash_report_dir, data_dir, log_dir, runtime_dir, settings_file,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dir_ends_with_qegui() {
        let path = config_dir().unwrap();
        assert!(
            path.ends_with("qegui"),
            "config_dir should end with 'qegui', got: {path:?}"
        );
    }

    #[test]
    fn settings_file_has_correct_name() {
        let path = settings_file().unwrap();
        assert_eq!(path.file_name().unwrap().to_str().unwrap(), "settings.toml");
        assert!(path.parent().unwrap().ends_with("qegui"));
    }

    #[test]
    fn crash_report_dir_is_under_log_dir() {
        let crash = crash_report_dir().unwrap();
        let logs = log_dir().unwrap();
        assert!(crash.starts_with(&logs));
        assert!(crash.ends_with("crash-reports"));
    }

    #[test]
    fn runtime_dir_always_resolves() {
        let dir = runtime_dir();
        assert!(!dir.as_os_str().is_empty());
    }
}
