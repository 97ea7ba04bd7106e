//! Session restoration for QEGui.
//!
//! The [`SessionManager`] saves the window tree into a
//! [`ConfigStore`](qegui_persist::ConfigStore) and recreates it later,
//! including tabbed and docked panels, macro context and window chrome.
//! Window geometry is applied by a [`GeometrySettler`] once the window
//! manager has caught up. All toolkit access goes through [`WindowHost`].

pub mod autosave;
pub mod host;
pub mod macros;
pub mod model;
pub mod orchestrator;
pub mod settler;
pub mod window;

pub use autosave::AutoSaver;
pub use host::{GeometryProbe, HeadlessHost, PanelRequest, WindowHost};
pub use macros::MacroSubstitutions;
pub use model::{DockArea, DockAttributes, PanelNode, Presentation, WindowSessionNode};
pub use orchestrator::{
    LaunchOutcome, RestoreOutcome, RestoreParticipant, RestorePhase, SessionManager,
    SessionOptions,
};
pub use settler::{clamp_to_screen, GeometrySettler, SettleConfig, SettleState};
pub use window::{LivePanel, MainWindow};
