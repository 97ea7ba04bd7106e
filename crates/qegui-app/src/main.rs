mod cli;
mod crash_report;
mod runtime;

use qegui_config::{EnvSource, HostSettings, StartupParams};
use tracing_subscriber::EnvFilter;

fn main() {
    // Install panic hook for crash reports
    crash_report::install_panic_hook();

    // Parse CLI arguments; clap exits non-zero on malformed arguments
    let args = cli::parse();
    let log_override = args.log_level.clone();
    let settings_path = args.settings.clone();

    // Load settings first: they carry the default log level
    let (settings, load_error) = match qegui_config::load_settings(settings_path.as_deref()) {
        Ok(s) => (s, None),
        Err(e) => (HostSettings::default(), Some(e)),
    };

    // Initialize logging
    let log_directive = log_override
        .as_deref()
        .unwrap_or(settings.logging.level.as_str());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "qegui=info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("QEGui v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(e) = load_error {
        tracing::warn!("Settings load failed, using defaults: {e}");
    }

    // Ensure platform directories exist
    if let Err(e) = qegui_config::paths::ensure_dirs() {
        tracing::warn!("Failed to create directories: {e}");
    }

    let params = StartupParams::resolve(args.into_overrides(), &EnvSource::default());

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {e}");
            std::process::exit(1);
        }
    };

    let exit = rt.block_on(runtime::run(params, settings));
    tracing::info!(?exit, "Shutdown complete");
}
