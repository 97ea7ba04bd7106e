use super::*;
use crate::schema::*;

#[test]
fn default_settings_validate() {
    let settings = HostSettings::default();
    assert!(validate(&settings).is_ok());
}

#[test]
fn catches_autosave_interval_too_short() {
    let mut settings = HostSettings::default();
    settings.autosave.interval_secs = 1;
    let err = validate(&settings).unwrap_err().to_string();
    assert!(err.contains("autosave.interval_secs"));
}

#[test]
fn catches_zero_connect_timeout() {
    let mut settings = HostSettings::default();
    settings.instance.connect_timeout_ms = 0;
    let err = validate(&settings).unwrap_err().to_string();
    assert!(err.contains("instance.connect_timeout_ms"));
}

#[test]
fn catches_negative_margin() {
    let mut settings = HostSettings::default();
    settings.settle.vertical_margin = -5;
    let err = validate(&settings).unwrap_err().to_string();
    assert!(err.contains("settle.vertical_margin"));
}

#[test]
fn catches_empty_log_level() {
    let mut settings = HostSettings::default();
    settings.logging.level = "  ".into();
    let err = validate(&settings).unwrap_err().to_string();
    assert!(err.contains("logging.level"));
}

#[test]
fn collects_every_error() {
    let mut settings = HostSettings::default();
    settings.settle.max_retries = 0;
    settings.settle.poll_interval_ms = 5000;
    settings.host.decoration_offset = 500;
    let err = validate(&settings).unwrap_err().to_string();
    assert!(err.contains("settle.max_retries"));
    assert!(err.contains("settle.poll_interval_ms"));
    assert!(err.contains("host.decoration_offset"));
    assert_eq!(err.matches("; ").count(), 2);
}
