//! Periodic crash-recovery saves.
//!
//! While running, the session is saved under `AutoSave` on every interval.
//! A clean stop saves under `ExitSave` and deletes `AutoSave`, so an
//! `AutoSave` found at startup means the previous run did not stop cleanly.

use std::time::Duration;

use chrono::{DateTime, Local};
use qegui_common::StoreError;
use qegui_persist::{ConfigStore, AUTOSAVE_NAME, EXIT_SAVE_NAME};
use tracing::{debug, info};

use crate::host::WindowHost;
use crate::orchestrator::SessionManager;

pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub struct AutoSaver {
    interval: Duration,
    running: bool,
    last_saved: Option<DateTime<Local>>,
}

impl AutoSaver {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            running: false,
            last_saved: None,
        }
    }

    /// Start unless autosave was disabled for this run.
    pub fn start(&mut self, disabled: bool) {
        if disabled {
            info!("Configuration auto-save disabled");
            return;
        }
        self.running = true;
        info!(interval_secs = self.interval.as_secs(), "Configuration auto-save started");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_saved(&self) -> Option<DateTime<Local>> {
        self.last_saved
    }

    /// Save under `AutoSave`. Does nothing when not running.
    pub fn save<H: WindowHost>(
        &mut self,
        session: &mut SessionManager<H>,
        store: &mut ConfigStore,
    ) -> Result<(), StoreError> {
        if !self.running {
            return Ok(());
        }
        session.save(store, AUTOSAVE_NAME)?;
        self.last_saved = Some(Local::now());
        debug!("Auto-saved configuration");
        Ok(())
    }

    /// Save under `ExitSave`, then remove `AutoSave` to mark a clean exit.
    pub fn stop<H: WindowHost>(
        &mut self,
        session: &mut SessionManager<H>,
        store: &mut ConfigStore,
    ) -> Result<(), StoreError> {
        if !self.running {
            return Ok(());
        }
        self.running = false;
        session.save(store, EXIT_SAVE_NAME)?;
        store.delete_configs(&[AUTOSAVE_NAME]);
        store.persist()?;
        info!("Configuration auto-save stopped");
        Ok(())
    }

    pub fn status(&self) -> String {
        if !self.running {
            return "Configuration auto-save is not running.".to_string();
        }
        match self.last_saved {
            Some(at) => format!(
                "Configuration auto-save is running. Last saved at {}",
                at.format("%H:%M:%S%.3f %d/%m/%Y")
            ),
            None => {
                "Configuration auto-save is running. No configuration has been saved yet."
                    .to_string()
            }
        }
    }
}

impl Default for AutoSaver {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessHost;
    use crate::orchestrator::SessionOptions;
    use qegui_common::Rect;
    use qegui_config::StartupParams;

    fn session_and_store() -> (tempfile::TempDir, SessionManager<HeadlessHost>, ConfigStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::empty(dir.path().join("QEGuiConfig.json"));
        let mut session = SessionManager::new(
            HeadlessHost::new(Rect::new(0, 0, 1280, 1024), 24),
            SessionOptions::default(),
        );
        session.launch(&StartupParams::default(), &store);
        (dir, session, store)
    }

    #[test]
    fn stop_leaves_exit_save_only() {
        let (_dir, mut session, mut store) = session_and_store();
        let mut saver = AutoSaver::default();
        saver.start(false);

        saver.save(&mut session, &mut store).unwrap();
        assert!(store.is_configuration_present(AUTOSAVE_NAME));

        saver.stop(&mut session, &mut store).unwrap();
        assert!(!saver.is_running());

        let on_disk = ConfigStore::open(store.path()).unwrap();
        assert!(on_disk.is_configuration_present(EXIT_SAVE_NAME));
        assert!(!on_disk.is_configuration_present(AUTOSAVE_NAME));
    }

    #[test]
    fn disabled_saver_writes_nothing() {
        let (_dir, mut session, mut store) = session_and_store();
        let mut saver = AutoSaver::default();
        saver.start(true);

        saver.save(&mut session, &mut store).unwrap();
        saver.stop(&mut session, &mut store).unwrap();
        assert!(store.configuration(AUTOSAVE_NAME).is_none());
        assert!(store.configuration(EXIT_SAVE_NAME).is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn status_reports_last_save() {
        let (_dir, mut session, mut store) = session_and_store();
        let mut saver = AutoSaver::new(Duration::from_secs(60));
        assert_eq!(saver.status(), "Configuration auto-save is not running.");

        saver.start(false);
        assert!(saver.status().ends_with("No configuration has been saved yet."));

        saver.save(&mut session, &mut store).unwrap();
        let status = saver.status();
        assert!(status.starts_with("Configuration auto-save is running. Last saved at "));
        let stamp = saver.last_saved().unwrap().format("%d/%m/%Y").to_string();
        assert!(status.ends_with(&stamp));
    }
}
