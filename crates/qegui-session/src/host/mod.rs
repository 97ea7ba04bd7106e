//! The narrow interface between session logic and a windowing toolkit.
//!
//! Everything the orchestrator and the geometry settler do to real windows
//! goes through these traits. [`HeadlessHost`] implements them in memory.

pub mod headless;

pub use headless::HeadlessHost;

use qegui_common::{PanelId, Point, Rect, UserLevel, WindowId, WindowState};

use crate::macros::MacroSubstitutions;
use crate::model::DockAttributes;

/// Geometry queries the settler polls while a window manager catches up.
pub trait GeometryProbe {
    /// Content geometry, excluding decorations. `None` once the window is gone.
    fn geometry(&self, window: WindowId) -> Option<Rect>;

    /// Geometry including decorations. Equal in origin to `geometry` until
    /// the window manager has decorated the window.
    fn frame_geometry(&self, window: WindowId) -> Option<Rect>;

    fn set_geometry(&mut self, window: WindowId, rect: Rect);

    /// Geometry of the whole desktop.
    fn screen_geometry(&self) -> Rect;

    fn set_scroll_offset(&mut self, panel: PanelId, offset: Point);
}

/// What a panel is created from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelRequest {
    pub file: String,
    /// Identifier the panel's widgets save their own state under.
    pub restore_id: Option<String>,
    pub title: String,
    pub customisation_name: String,
    pub macros: MacroSubstitutions,
    pub path_list: Vec<String>,
    /// Created to live in a dock rather than the central area.
    pub docked: bool,
}

pub trait WindowHost: GeometryProbe {
    /// Create and show a top-level window.
    fn create_window(&mut self, title: &str, customisation_name: &str) -> WindowId;
    fn close_window(&mut self, window: WindowId);

    fn window_state(&self, window: WindowId) -> WindowState;
    fn set_window_state(&mut self, window: WindowId, state: WindowState);
    fn title(&self, window: WindowId) -> String;
    fn set_title(&mut self, window: WindowId, title: &str);

    /// Build a display panel. `None` if it could not be created, for
    /// example when the file does not exist.
    fn create_panel(&mut self, window: WindowId, request: &PanelRequest) -> Option<PanelId>;

    /// Show `panel` alone in the central area. Returns the panel it replaced.
    fn show_central(&mut self, window: WindowId, panel: PanelId) -> Option<PanelId>;
    /// Switch the central area to tabs, moving any central panel to the first tab.
    fn enter_tab_mode(&mut self, window: WindowId);
    fn add_tab(&mut self, window: WindowId, panel: PanelId);
    fn add_dock(&mut self, window: WindowId, panel: PanelId, attributes: &DockAttributes);
    /// Current docking state, `None` if the panel is not docked.
    fn dock_attributes(&self, window: WindowId, panel: PanelId) -> Option<DockAttributes>;

    /// Panel the user is looking at in the central area.
    fn current_panel(&self, window: WindowId) -> Option<PanelId>;
    fn raise_panel(&mut self, window: WindowId, panel: PanelId);
    /// Scroll position, `None` if the host does not manage the panel's scrolling.
    fn scroll_offset(&self, panel: PanelId) -> Option<Point>;

    /// Apply widget and font scaling, in percent.
    fn apply_scaling(&mut self, adjust: f64, font: f64);

    fn user_level(&self) -> UserLevel;
    fn set_user_level(&mut self, level: UserLevel);

    /// PV names offered for completion, and PVs to flag as out of service.
    fn set_pv_lists(&mut self, known: Vec<String>, out_of_service: Vec<String>);

    fn warn_user(&mut self, title: &str, message: &str);
    /// Ask whether to recover the configuration left by an unclean exit.
    fn confirm_autosave_recovery(&mut self) -> bool;
}
