//! Host settings validation.
//!
//! Checks every numeric range and collects all problems into a single
//! `ConfigError`.

mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::HostSettings;
use helpers::{validate_range, validate_range_i32};
use qegui_common::ConfigError;

/// Run all validations on the settings, collecting all errors.
pub fn validate(settings: &HostSettings) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_range(
        &mut errors,
        "autosave.interval_secs",
        settings.autosave.interval_secs,
        5,
        86_400,
    );

    let instance = &settings.instance;
    validate_range(
        &mut errors,
        "instance.connect_timeout_ms",
        instance.connect_timeout_ms,
        50,
        60_000,
    );
    validate_range(
        &mut errors,
        "instance.handoff_timeout_ms",
        instance.handoff_timeout_ms,
        100,
        600_000,
    );

    let settle = &settings.settle;
    validate_range(
        &mut errors,
        "settle.poll_interval_ms",
        settle.poll_interval_ms,
        1,
        1000,
    );
    validate_range(
        &mut errors,
        "settle.max_retries",
        settle.max_retries,
        1,
        100_000,
    );
    validate_range_i32(
        &mut errors,
        "settle.horizontal_margin",
        settle.horizontal_margin,
        0,
        1000,
    );
    validate_range_i32(
        &mut errors,
        "settle.vertical_margin",
        settle.vertical_margin,
        0,
        1000,
    );

    validate_range_i32(
        &mut errors,
        "host.decoration_offset",
        settings.host.decoration_offset,
        0,
        200,
    );

    if settings.logging.level.trim().is_empty() {
        errors.push("logging.level must not be empty".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
