//! Saving and restoring the whole window tree.
//!
//! A save or restore runs as a sequence of phases. Each phase is delivered,
//! in order, to the application record (the `QEGui` root), to every live
//! window in window-list order, and then to every registered
//! [`RestoreParticipant`] in registration order.
//!
//! - `Save` writes the current tree.
//! - `RestoreApplication` closes the current windows and recreates the saved
//!   ones with their panels.
//! - `RestoreFramework` runs once every window and panel exists, for
//!   participants that need to find each other.

use qegui_common::{StoreError, UserLevel, APP_NAME};
use qegui_config::{clamp_scale, RecoverPolicy, StartupParams};
use qegui_persist::{
    validate_user_config_name, Configuration, ConfigStore, Element, AUTOSAVE_NAME, ROOT_NAME,
};
use tracing::{debug, info, warn};

use crate::host::{PanelRequest, WindowHost};
use crate::macros::MacroSubstitutions;
use crate::model::{PanelNode, Presentation, WindowSessionNode};
use crate::settler::{GeometrySettler, SettleConfig};
use crate::window::{restore_id, LivePanel, MainWindow};

/// Value under the `QEGui` root holding the number of saved windows.
const MAIN_WINDOWS_KEY: &str = "MainWindows";
const USER_LEVEL_KEY: &str = "UserLevel";

pub const RESTORE_WARNING_TITLE: &str = "Configuration Restore";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestorePhase {
    Save,
    RestoreApplication,
    RestoreFramework,
}

/// Anything outside the window tree with state of its own to persist.
pub trait RestoreParticipant {
    /// Add this participant's roots to a configuration being saved.
    fn save(&mut self, config: &mut Configuration);

    /// Called for each restore phase, after the windows have handled it.
    fn restore(&mut self, phase: RestorePhase, config: &Configuration);
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub settle: SettleConfig,
    pub recover: RecoverPolicy,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            settle: SettleConfig::default(),
            recover: RecoverPolicy::Ask,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreOutcome {
    pub windows_created: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOutcome {
    /// Configuration that was restored, if any.
    pub restored: Option<String>,
    /// Windows that exist once the launch finished.
    pub windows: usize,
}

/// Title and customisation given to windows that have nothing better.
#[derive(Debug, Clone, Default)]
struct WindowDefaults {
    title: String,
    customisation_name: String,
}

pub struct SessionManager<H: WindowHost> {
    host: H,
    windows: Vec<MainWindow>,
    participants: Vec<Box<dyn RestoreParticipant>>,
    options: SessionOptions,
    defaults: WindowDefaults,
}

impl<H: WindowHost> SessionManager<H> {
    pub fn new(host: H, options: SessionOptions) -> Self {
        Self {
            host,
            windows: Vec::new(),
            participants: Vec::new(),
            options,
            defaults: WindowDefaults {
                title: APP_NAME.to_string(),
                customisation_name: String::new(),
            },
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn windows(&self) -> &[MainWindow] {
        &self.windows
    }

    pub fn window_count(&self) -> usize {
        self.windows.iter().filter(|w| !w.being_deleted).count()
    }

    /// Participants receive phases in the order they were registered.
    pub fn register_participant(&mut self, participant: Box<dyn RestoreParticipant>) {
        self.participants.push(participant);
    }

    /// Apply widget and font scaling, percent. Out-of-range values are
    /// clamped before the host sees them.
    pub fn apply_scaling(&mut self, adjust: f64, font: f64) {
        self.host.apply_scaling(clamp_scale(adjust), clamp_scale(font));
    }

    // ===== Save =====

    /// Save the current window tree into `store` under `name` and write the
    /// store to disk.
    pub fn save(&mut self, store: &mut ConfigStore, name: &str) -> Result<(), StoreError> {
        self.identify();

        let mut config = Configuration::new();
        let live: Vec<&MainWindow> = self.windows.iter().filter(|w| !w.being_deleted).collect();

        let mut app = Element::new(ROOT_NAME);
        app.add_value(MAIN_WINDOWS_KEY, live.len());
        app.add_value(USER_LEVEL_KEY, self.host.user_level());
        config.add_named_configuration(app);

        for (ordinal, window) in live.iter().enumerate() {
            let node = self.window_node(window);
            config.add_named_configuration(node.to_element(ordinal));
        }

        for participant in &mut self.participants {
            participant.save(&mut config);
        }

        store.put_configuration(name, config);
        store.persist()?;
        info!(name, windows = live.len(), "Configuration saved");
        Ok(())
    }

    /// Save under a name the user chose. Reserved and empty names are
    /// refused before anything is written.
    pub fn save_as(&mut self, store: &mut ConfigStore, name: &str) -> Result<(), StoreError> {
        validate_user_config_name(name)?;
        self.save(store, name.trim())
    }

    /// Number windows by position and panels by window and position.
    fn identify(&mut self) {
        for (w, window) in self.windows.iter_mut().filter(|w| !w.being_deleted).enumerate() {
            window.unique_id = w as u32;
            for (p, panel) in window.panels.iter_mut().enumerate() {
                panel.restore_id = restore_id(w, p);
            }
        }
    }

    fn window_node(&self, window: &MainWindow) -> WindowSessionNode {
        let central = window.central_panels().count();
        let current = self.host.current_panel(window.id);

        let panels = window
            .panels
            .iter()
            .map(|panel| {
                let docking = if panel.docked {
                    self.host.dock_attributes(window.id, panel.id)
                } else {
                    None
                };
                let presentation = if docking.is_some() {
                    Presentation::Dock
                } else if central > 1 {
                    Presentation::Tab
                } else {
                    Presentation::Central
                };
                PanelNode {
                    file: panel.file.clone(),
                    restore_id: panel.restore_id.clone(),
                    macros: panel.macros.to_string(),
                    customisation_name: panel.customisation_name.clone(),
                    path_list: panel.path_list.clone(),
                    title: panel.title.clone(),
                    presentation: Some(presentation),
                    docking,
                    scroll: self.host.scroll_offset(panel.id),
                    active: docking.is_none() && current == Some(panel.id),
                }
            })
            .collect();

        WindowSessionNode {
            unique_id: window.unique_id,
            title: self.host.title(window.id),
            geometry: self.host.geometry(window.id),
            state: Some(self.host.window_state(window.id)),
            panels,
        }
    }

    // ===== Restore =====

    /// Replace the current windows with those saved under `name`.
    ///
    /// A missing or empty configuration leaves the current windows alone and
    /// creates nothing.
    pub fn restore(&mut self, store: &ConfigStore, name: &str) -> RestoreOutcome {
        let Some(config) = store.configuration(name).filter(|c| !c.is_empty()) else {
            debug!(name, "Nothing to restore");
            return RestoreOutcome::default();
        };

        for window in &mut self.windows {
            window.being_deleted = true;
            self.host.close_window(window.id);
        }

        let windows_created = self.restore_application(config);
        for participant in &mut self.participants {
            participant.restore(RestorePhase::RestoreApplication, config);
        }

        // Windows have nothing left to do in the framework phase.
        for participant in &mut self.participants {
            participant.restore(RestorePhase::RestoreFramework, config);
        }

        self.windows.retain(|w| !w.being_deleted);
        info!(name, windows = windows_created, "Configuration restored");
        RestoreOutcome { windows_created }
    }

    fn restore_application(&mut self, config: &Configuration) -> usize {
        let Some(app) = config.named_configuration(ROOT_NAME) else {
            return 0;
        };
        if let Some(level) = app.value::<UserLevel>(USER_LEVEL_KEY) {
            self.host.set_user_level(level);
        }
        let count: usize = app.value(MAIN_WINDOWS_KEY).unwrap_or(0);

        let first_new = self.windows.len();
        for ordinal in 0..count {
            let id = self
                .host
                .create_window(&self.defaults.title, &self.defaults.customisation_name);
            self.windows.push(MainWindow::new(id, ordinal as u32));
        }

        for index in first_new..self.windows.len() {
            let ordinal = index - first_new;
            let Some(root) = config.named_configuration(&WindowSessionNode::root_name(ordinal))
            else {
                debug!(ordinal, "No saved state for window");
                continue;
            };
            let node = WindowSessionNode::from_element(root);
            self.restore_window(index, ordinal, &node);
        }
        count
    }

    fn restore_window(&mut self, index: usize, ordinal: usize, node: &WindowSessionNode) {
        let settle = self.options.settle;
        let window = &mut self.windows[index];
        let host = &mut self.host;
        window.unique_id = node.unique_id;

        if let Some(state) = node.state {
            host.set_window_state(window.id, state);
        }
        let id = window.id;
        window.settler = node
            .geometry
            .map(|rect| GeometrySettler::new(id, rect, settle));

        let mut active = None;
        for (position, saved) in node.panels.iter().enumerate() {
            let restore_id = if saved.restore_id.is_empty() {
                restore_id(ordinal, position)
            } else {
                saved.restore_id.clone()
            };
            let presentation = saved.presentation.unwrap_or(if position == 0 {
                Presentation::Central
            } else {
                Presentation::Tab
            });
            let docked = presentation == Presentation::Dock;
            let request = PanelRequest {
                file: saved.file.clone(),
                restore_id: Some(restore_id.clone()),
                title: saved.title.clone(),
                customisation_name: saved.customisation_name.clone(),
                macros: MacroSubstitutions::parse(&saved.macros),
                path_list: saved.path_list.clone(),
                docked,
            };

            let Some(panel) = host.create_panel(window.id, &request) else {
                warn!(window = %window.id, file = %saved.file, "Could not recreate panel, skipping");
                continue;
            };

            match presentation {
                Presentation::Central if !window.tab_mode => {
                    if let Some(replaced) = host.show_central(window.id, panel) {
                        window.panels.retain(|p| p.id != replaced);
                    }
                }
                Presentation::Central | Presentation::Tab => {
                    if !window.tab_mode {
                        host.enter_tab_mode(window.id);
                        window.tab_mode = true;
                    }
                    host.add_tab(window.id, panel);
                }
                Presentation::Dock => {
                    host.add_dock(window.id, panel, &saved.docking.unwrap_or_default());
                }
            }

            if !docked {
                if saved.active {
                    active = Some(panel);
                }
                if let Some(offset) = saved.scroll {
                    match window.settler.as_mut() {
                        Some(settler) => settler.queue_scroll(panel, offset),
                        None => host.set_scroll_offset(panel, offset),
                    }
                }
            }

            window.panels.push(LivePanel {
                id: panel,
                file: request.file,
                restore_id,
                macros: request.macros,
                customisation_name: request.customisation_name,
                path_list: request.path_list,
                title: request.title,
                docked,
            });
        }

        if let Some(panel) = active {
            host.raise_panel(window.id, panel);
        }
        if !node.title.is_empty() {
            host.set_title(window.id, &node.title);
        }
    }

    // ===== Geometry =====

    /// Poll every pending geometry settler once. Returns how many are still
    /// waiting.
    pub fn tick_settlers(&mut self) -> usize {
        let mut pending = 0;
        for window in &mut self.windows {
            let Some(settler) = window.settler.as_mut() else {
                continue;
            };
            if settler.tick(&mut self.host).is_finished() {
                window.settler = None;
            } else {
                pending += 1;
            }
        }
        pending
    }

    pub fn has_pending_geometry(&self) -> bool {
        self.windows.iter().any(|w| w.settler.is_some())
    }

    // ===== Launch =====

    /// Act on one set of startup parameters, from this process or handed
    /// off by another.
    ///
    /// An autosaved configuration means the last run did not exit cleanly,
    /// so recovering it takes priority over a requested restore. Files are
    /// opened when nothing was restored or the restore produced no windows.
    pub fn launch(&mut self, params: &StartupParams, store: &ConfigStore) -> LaunchOutcome {
        self.defaults = WindowDefaults {
            title: params.title_or_default().to_string(),
            customisation_name: params.default_customisation_name.clone(),
        };

        let mut target = None;
        if !params.disable_autosave && store.is_configuration_present(AUTOSAVE_NAME) {
            let recover = match self.options.recover {
                RecoverPolicy::Always => true,
                RecoverPolicy::Never => false,
                RecoverPolicy::Ask => self.host.confirm_autosave_recovery(),
            };
            if recover {
                info!("Recovering autosaved configuration");
                target = Some(AUTOSAVE_NAME.to_string());
            }
        }
        if target.is_none() && params.restore {
            target = Some(params.configuration_name.clone());
        }

        if let Some(name) = &target {
            let outcome = self.restore(store, name);
            if outcome.windows_created == 0 {
                let message = format!(
                    "Configuration restoration did not create any windows.\n\
                     Looked for configuration named '{name}'."
                );
                self.host.warn_user(RESTORE_WARNING_TITLE, &message);
            }
        }

        if target.is_none() || self.window_count() == 0 {
            self.open_files(params);
        }

        LaunchOutcome {
            restored: target,
            windows: self.window_count(),
        }
    }

    fn open_files(&mut self, params: &StartupParams) {
        let title = params.title_or_default().to_string();
        let macros = MacroSubstitutions::parse(&params.substitutions);

        if params.filenames.is_empty() {
            let id = self
                .host
                .create_window(&title, &params.default_customisation_name);
            let unique_id = self.windows.len() as u32;
            self.windows.push(MainWindow::new(id, unique_id));
            return;
        }

        for file in &params.filenames {
            let id = self
                .host
                .create_window(&title, &params.startup_customisation_name);
            let index = self.windows.len();
            let mut window = MainWindow::new(id, index as u32);
            let restore_id = restore_id(index, 0);
            let request = PanelRequest {
                file: file.clone(),
                restore_id: Some(restore_id.clone()),
                title: String::new(),
                customisation_name: params.startup_customisation_name.clone(),
                macros: macros.clone(),
                path_list: params.path_list.clone(),
                docked: false,
            };
            match self.host.create_panel(id, &request) {
                Some(panel) => {
                    self.host.show_central(id, panel);
                    window.panels.push(LivePanel {
                        id: panel,
                        file: request.file,
                        restore_id,
                        macros: request.macros,
                        customisation_name: request.customisation_name,
                        path_list: request.path_list,
                        title: request.title,
                        docked: false,
                    });
                }
                None => warn!(window = %id, file = %file, "Could not open file"),
            }
            self.windows.push(window);
        }
    }
}

#[cfg(test)]
mod tests;
