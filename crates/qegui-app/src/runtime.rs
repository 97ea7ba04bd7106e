//! The host's event loop.

use std::path::Path;
use std::time::Duration;

use qegui_common::Rect;
use qegui_config::schema::HostSettings;
use qegui_config::{pv_list, StartupParams};
use qegui_instance::{ArbiterConfig, ChannelName, InstanceArbiter, Role};
use qegui_persist::ConfigStore;
use qegui_session::{
    AutoSaver, HeadlessHost, SessionManager, SessionOptions, SettleConfig, WindowHost,
};
use tokio::sync::mpsc;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tracing::{info, warn};

/// Desktop reported by the headless host.
const HEADLESS_SCREEN: Rect = Rect {
    x: 0,
    y: 0,
    width: 1920,
    height: 1080,
};

/// Why `run` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Parameters were given to the running instance.
    HandedOff,
    Shutdown,
}

pub async fn run(params: StartupParams, settings: HostSettings) -> Exit {
    let mut arbiter = InstanceArbiter::probe(
        ChannelName::for_current_user(),
        ArbiterConfig::from_settings(&settings.instance),
    )
    .await;

    if params.single_app {
        match arbiter.handball(&params).await {
            Ok(true) => {
                info!(channel = %arbiter.channel(), "Request handed to running instance");
                return Exit::HandedOff;
            }
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Handoff failed, starting a new instance"),
        }
    }
    if arbiter.role() == Role::Client {
        info!("Another instance is running; continuing without the instance channel");
    }

    let (handoff_tx, mut handoff_rx) = mpsc::channel::<StartupParams>(8);
    let _owner = arbiter.listen(handoff_tx);

    let settle = SettleConfig::from_settings(&settings.settle);
    let mut session = SessionManager::new(
        HeadlessHost::new(HEADLESS_SCREEN, settings.host.decoration_offset),
        SessionOptions {
            settle,
            recover: settings.autosave.recover,
        },
    );
    session.apply_scaling(params.adjust_scale, params.font_scale);
    load_pv_lists(session.host_mut(), &params);

    let mut store = open_store(Path::new(&params.configuration_file));
    session.launch(&params, &store);

    let period = Duration::from_secs(u64::from(settings.autosave.interval_secs));
    let mut autosave = AutoSaver::new(period);
    autosave.start(params.disable_autosave);

    let mut settle_tick = interval(settle.poll_interval);
    settle_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut autosave_tick = interval_at(Instant::now() + period, period);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(windows = session.window_count(), "Entering event loop");
    loop {
        tokio::select! {
            Some(handed) = handoff_rx.recv() => {
                launch_handed_off(&mut session, &handed, &store);
            }

            _ = settle_tick.tick(), if session.has_pending_geometry() => {
                session.tick_settlers();
            }

            _ = autosave_tick.tick(), if autosave.is_running() => {
                if let Err(e) = autosave.save(&mut session, &mut store) {
                    warn!(error = %e, "Auto-save failed");
                }
            }

            result = &mut shutdown => {
                if let Err(e) = result {
                    warn!(error = %e, "Failed to listen for shutdown signal");
                }
                break;
            }
        }
    }

    info!("Shutting down");
    if let Err(e) = autosave.stop(&mut session, &mut store) {
        warn!(error = %e, "Failed to save configuration on exit");
    }
    Exit::Shutdown
}

/// Act on a request from another instance. Scaling stays as this process
/// set it at startup.
fn launch_handed_off<H: WindowHost>(
    session: &mut SessionManager<H>,
    handed: &StartupParams,
    store: &ConfigStore,
) {
    info!(files = handed.filenames.len(), restore = handed.restore, "Launching handed-off request");
    if Path::new(&handed.configuration_file) == store.path() {
        session.launch(handed, store);
    } else {
        let other = open_store(Path::new(&handed.configuration_file));
        session.launch(handed, &other);
    }
}

/// Open the configuration store, starting empty if it cannot be read.
fn open_store(path: &Path) -> ConfigStore {
    ConfigStore::open(path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "Configuration file unreadable, starting empty");
        ConfigStore::empty(path)
    })
}

/// Hand the known and out-of-service PV lists to the host. A list that
/// cannot be read is passed on empty.
fn load_pv_lists(host: &mut impl WindowHost, params: &StartupParams) {
    let read = |kind: &str, path: Option<&Path>| {
        let Some(path) = path else {
            return Vec::new();
        };
        match pv_list::read_name_list(path) {
            Ok(names) => {
                info!(kind, count = names.len(), path = %path.display(), "PV list loaded");
                names
            }
            Err(e) => {
                warn!(kind, error = %e, "PV list not loaded");
                Vec::new()
            }
        }
    };
    let known = read("known", params.known_pv_path());
    let out_of_service = read("out-of-service", params.oos_pv_path());
    host.set_pv_lists(known, out_of_service);
}
