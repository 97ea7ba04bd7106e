use qegui_common::{PanelId, WindowId};

use crate::macros::MacroSubstitutions;
use crate::settler::GeometrySettler;

/// A top-level window the session manager is tracking.
#[derive(Debug)]
pub struct MainWindow {
    pub id: WindowId,
    /// Position in the window list when last saved or restored.
    pub unique_id: u32,
    pub panels: Vec<LivePanel>,
    pub tab_mode: bool,
    /// Closed by a restore; ignores every later phase.
    pub being_deleted: bool,
    pub settler: Option<GeometrySettler>,
}

impl MainWindow {
    pub fn new(id: WindowId, unique_id: u32) -> Self {
        Self {
            id,
            unique_id,
            panels: Vec::new(),
            tab_mode: false,
            being_deleted: false,
            settler: None,
        }
    }

    /// Panels shown in the central area, as a single panel or as tabs.
    pub fn central_panels(&self) -> impl Iterator<Item = &LivePanel> {
        self.panels.iter().filter(|p| !p.docked)
    }

    pub fn panel(&self, id: PanelId) -> Option<&LivePanel> {
        self.panels.iter().find(|p| p.id == id)
    }
}

/// A display panel living in a window.
#[derive(Debug, Clone, PartialEq)]
pub struct LivePanel {
    pub id: PanelId,
    pub file: String,
    pub restore_id: String,
    pub macros: MacroSubstitutions,
    pub customisation_name: String,
    pub path_list: Vec<String>,
    pub title: String,
    pub docked: bool,
}

/// Identifier a panel's own widgets save their state under.
pub fn restore_id(window: usize, panel: usize) -> String {
    format!("QEGui_window_{window}_form_{panel}")
}
