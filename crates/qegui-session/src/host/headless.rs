//! In-memory window host.
//!
//! Keeps the window/panel tree that a toolkit would otherwise own. Used by
//! the `qegui` binary when no display toolkit is attached, and by tests to
//! inspect what a restore produced.

use std::collections::{BTreeMap, HashSet};

use qegui_common::{PanelId, Point, Rect, UserLevel, WindowId, WindowState};

use super::{GeometryProbe, PanelRequest, WindowHost};
use crate::model::DockAttributes;

const DEFAULT_WINDOW: Rect = Rect {
    x: 100,
    y: 100,
    width: 640,
    height: 480,
};

#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    pub title: String,
    pub customisation_name: String,
    /// Content rectangle.
    pub rect: Rect,
    pub state: WindowState,
    pub central: Option<PanelId>,
    pub tab_mode: bool,
    pub tabs: Vec<PanelId>,
    pub current_tab: Option<PanelId>,
    pub docks: Vec<(PanelId, DockAttributes)>,
}

#[derive(Debug, Clone)]
pub struct HeadlessPanel {
    pub window: WindowId,
    pub request: PanelRequest,
    pub scroll: Point,
}

#[derive(Debug)]
pub struct HeadlessHost {
    screen: Rect,
    decoration_offset: i32,
    recover_autosave: bool,
    next_window: u32,
    next_panel: u32,
    windows: BTreeMap<WindowId, HeadlessWindow>,
    panels: BTreeMap<PanelId, HeadlessPanel>,
    refused_files: HashSet<String>,
    warnings: Vec<(String, String)>,
    scaling: (f64, f64),
    user_level: UserLevel,
    known_pvs: Vec<String>,
    out_of_service_pvs: Vec<String>,
}

impl HeadlessHost {
    /// `decoration_offset` is the title-bar height reported once a window
    /// exists. Zero models a window manager that never decorates.
    pub fn new(screen: Rect, decoration_offset: i32) -> Self {
        Self {
            screen,
            decoration_offset,
            recover_autosave: false,
            next_window: 0,
            next_panel: 0,
            windows: BTreeMap::new(),
            panels: BTreeMap::new(),
            refused_files: HashSet::new(),
            warnings: Vec::new(),
            scaling: (100.0, 100.0),
            user_level: UserLevel::default(),
            known_pvs: Vec::new(),
            out_of_service_pvs: Vec::new(),
        }
    }

    /// Answer given when asked about recovering an autosaved configuration.
    pub fn set_recover_autosave(&mut self, recover: bool) {
        self.recover_autosave = recover;
    }

    /// Make `create_panel` fail for `file`.
    pub fn refuse_file(&mut self, file: impl Into<String>) {
        self.refused_files.insert(file.into());
    }

    pub fn window_ids(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    pub fn window(&self, window: WindowId) -> Option<&HeadlessWindow> {
        self.windows.get(&window)
    }

    pub fn panel(&self, panel: PanelId) -> Option<&HeadlessPanel> {
        self.panels.get(&panel)
    }

    pub fn tab_count(&self, window: WindowId) -> usize {
        self.windows.get(&window).map_or(0, |w| w.tabs.len())
    }

    pub fn warnings(&self) -> &[(String, String)] {
        &self.warnings
    }

    pub fn scaling(&self) -> (f64, f64) {
        self.scaling
    }

    pub fn known_pvs(&self) -> &[String] {
        &self.known_pvs
    }

    pub fn out_of_service_pvs(&self) -> &[String] {
        &self.out_of_service_pvs
    }

    pub fn set_scroll(&mut self, panel: PanelId, offset: Point) {
        if let Some(p) = self.panels.get_mut(&panel) {
            p.scroll = offset;
        }
    }

    fn frame_of(&self, rect: Rect) -> Rect {
        Rect::new(
            rect.x,
            rect.y - self.decoration_offset,
            rect.width,
            rect.height + self.decoration_offset,
        )
    }

    fn is_docked(&self, window: WindowId, panel: PanelId) -> bool {
        self.windows
            .get(&window)
            .is_some_and(|w| w.docks.iter().any(|(p, _)| *p == panel))
    }
}

impl GeometryProbe for HeadlessHost {
    fn geometry(&self, window: WindowId) -> Option<Rect> {
        self.windows.get(&window).map(|w| w.rect)
    }

    fn frame_geometry(&self, window: WindowId) -> Option<Rect> {
        self.windows.get(&window).map(|w| self.frame_of(w.rect))
    }

    fn set_geometry(&mut self, window: WindowId, rect: Rect) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.rect = rect;
        }
    }

    fn screen_geometry(&self) -> Rect {
        self.screen
    }

    fn set_scroll_offset(&mut self, panel: PanelId, offset: Point) {
        self.set_scroll(panel, offset);
    }
}

impl WindowHost for HeadlessHost {
    fn create_window(&mut self, title: &str, customisation_name: &str) -> WindowId {
        let id = WindowId(self.next_window);
        self.next_window += 1;
        self.windows.insert(
            id,
            HeadlessWindow {
                title: title.to_string(),
                customisation_name: customisation_name.to_string(),
                rect: DEFAULT_WINDOW,
                state: WindowState::NORMAL,
                central: None,
                tab_mode: false,
                tabs: Vec::new(),
                current_tab: None,
                docks: Vec::new(),
            },
        );
        tracing::debug!(window = %id, title, "Headless window created");
        id
    }

    fn close_window(&mut self, window: WindowId) {
        self.windows.remove(&window);
        self.panels.retain(|_, p| p.window != window);
    }

    fn window_state(&self, window: WindowId) -> WindowState {
        self.windows.get(&window).map_or(WindowState::NORMAL, |w| w.state)
    }

    fn set_window_state(&mut self, window: WindowId, state: WindowState) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.state = state;
        }
    }

    fn title(&self, window: WindowId) -> String {
        self.windows
            .get(&window)
            .map(|w| w.title.clone())
            .unwrap_or_default()
    }

    fn set_title(&mut self, window: WindowId, title: &str) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.title = title.to_string();
        }
    }

    fn create_panel(&mut self, window: WindowId, request: &PanelRequest) -> Option<PanelId> {
        if !self.windows.contains_key(&window) || self.refused_files.contains(&request.file) {
            return None;
        }
        let id = PanelId(self.next_panel);
        self.next_panel += 1;
        self.panels.insert(
            id,
            HeadlessPanel {
                window,
                request: request.clone(),
                scroll: Point::default(),
            },
        );
        Some(id)
    }

    fn show_central(&mut self, window: WindowId, panel: PanelId) -> Option<PanelId> {
        let w = self.windows.get_mut(&window)?;
        let replaced = w.central.replace(panel);
        if let Some(old) = replaced {
            self.panels.remove(&old);
        }
        replaced
    }

    fn enter_tab_mode(&mut self, window: WindowId) {
        if let Some(w) = self.windows.get_mut(&window) {
            if w.tab_mode {
                return;
            }
            w.tab_mode = true;
            if let Some(central) = w.central.take() {
                w.tabs.push(central);
                w.current_tab = Some(central);
            }
        }
    }

    fn add_tab(&mut self, window: WindowId, panel: PanelId) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.tabs.push(panel);
            w.current_tab = Some(panel);
        }
    }

    fn add_dock(&mut self, window: WindowId, panel: PanelId, attributes: &DockAttributes) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.docks.push((panel, *attributes));
        }
    }

    fn dock_attributes(&self, window: WindowId, panel: PanelId) -> Option<DockAttributes> {
        self.windows
            .get(&window)?
            .docks
            .iter()
            .find(|(p, _)| *p == panel)
            .map(|(_, a)| *a)
    }

    fn current_panel(&self, window: WindowId) -> Option<PanelId> {
        let w = self.windows.get(&window)?;
        if w.tab_mode {
            w.current_tab
        } else {
            w.central
        }
    }

    fn raise_panel(&mut self, window: WindowId, panel: PanelId) {
        if let Some(w) = self.windows.get_mut(&window) {
            if w.tabs.contains(&panel) {
                w.current_tab = Some(panel);
            }
        }
    }

    fn scroll_offset(&self, panel: PanelId) -> Option<Point> {
        let p = self.panels.get(&panel)?;
        // Docked panels are not placed in a managed scroll area.
        (!self.is_docked(p.window, panel)).then_some(p.scroll)
    }

    fn apply_scaling(&mut self, adjust: f64, font: f64) {
        self.scaling = (adjust, font);
    }

    fn user_level(&self) -> UserLevel {
        self.user_level
    }

    fn set_user_level(&mut self, level: UserLevel) {
        self.user_level = level;
    }

    fn set_pv_lists(&mut self, known: Vec<String>, out_of_service: Vec<String>) {
        self.known_pvs = known;
        self.out_of_service_pvs = out_of_service;
    }

    fn warn_user(&mut self, title: &str, message: &str) {
        tracing::warn!(title, "{message}");
        self.warnings.push((title.to_string(), message.to_string()));
    }

    fn confirm_autosave_recovery(&mut self) -> bool {
        if !self.recover_autosave {
            tracing::warn!("Autosaved configuration found; no interactive user, not recovering it");
        }
        self.recover_autosave
    }
}
