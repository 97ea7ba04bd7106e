/// Default settings file content. Every value is commented out so the
/// built-in defaults stay in charge until the user edits a line.
pub(crate) fn default_settings_toml() -> &'static str {
    r#"# QEGui host settings
# Only override what you want to change -- missing fields use defaults.

[autosave]
# interval_secs = 30        # 5-86400, how often the AutoSave configuration is written
# recover = "ask"           # ask, always, never: what to do with a leftover AutoSave

[instance]
# connect_timeout_ms = 1000 # 50-60000, wait for a running instance to answer
# handoff_timeout_ms = 10000 # 100-600000, wait for parameters to be written
# channel_dir = "/run/user/1000"  # where the instance socket lives

[settle]
# poll_interval_ms = 10     # 1-1000
# max_retries = 1000        # 1-100000, polls before a window geometry is abandoned
# horizontal_margin = 100   # 0-1000, pixels a window must keep on screen
# vertical_margin = 50      # 0-1000

[host]
# decoration_offset = 24    # 0-200

[logging]
# level = "qegui=info"
"#
}
