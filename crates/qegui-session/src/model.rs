//! Saved-session records and their persistence-tree form.
//!
//! A window is stored as
//!
//! ```text
//! QEGuiMainWindow_<n>
//!   Identity  [id]           Title
//!   Geometry  [X Y Width Height]
//!   State     [Flags]
//!   Gui       [Name ID CurrentGui]  MacroSubstitutions CustomisationName Title Presentation
//!     PathListItem [Order]   Path
//!     Scroll       [X Y]
//!     Docking      [AllowedAreas Area Features Floating X Y Width Height Hidden Tabbed]
//! ```
//!
//! Reading is lenient: anything missing or unparseable falls back to the
//! defaults below.

use std::fmt;
use std::str::FromStr;

use qegui_common::{Point, Rect, WindowState};
use qegui_persist::Element;

/// How a panel is shown inside its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Alone in the central area.
    Central,
    /// One tab of the central tab set.
    Tab,
    Dock,
}

impl Presentation {
    pub fn as_str(self) -> &'static str {
        match self {
            Presentation::Central => "Central",
            Presentation::Tab => "Tab",
            Presentation::Dock => "Dock",
        }
    }
}

impl fmt::Display for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Presentation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Central" => Ok(Presentation::Central),
            "Tab" => Ok(Presentation::Tab),
            "Dock" => Ok(Presentation::Dock),
            other => Err(format!("unknown presentation '{other}'")),
        }
    }
}

/// Dock area, stored with the toolkit's numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockArea {
    Left = 0x1,
    Right = 0x2,
    Top = 0x4,
    Bottom = 0x8,
}

impl DockArea {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0x1 => Some(DockArea::Left),
            0x2 => Some(DockArea::Right),
            0x4 => Some(DockArea::Top),
            0x8 => Some(DockArea::Bottom),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Every dock area.
pub const ALL_DOCK_AREAS: u32 = 0xf;
/// Closable, movable and floatable.
pub const ALL_DOCK_FEATURES: u32 = 0x7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockAttributes {
    pub allowed_areas: u32,
    pub area: DockArea,
    pub features: u32,
    pub floating: bool,
    pub rect: Rect,
    pub hidden: bool,
    /// Stacked with other docks in the same area.
    pub tabbed: bool,
}

impl Default for DockAttributes {
    fn default() -> Self {
        Self {
            allowed_areas: ALL_DOCK_AREAS,
            area: DockArea::Bottom,
            features: ALL_DOCK_FEATURES,
            floating: false,
            rect: Rect::new(0, 0, 100, 100),
            hidden: false,
            tabbed: false,
        }
    }
}

impl DockAttributes {
    fn to_element(self) -> Element {
        let mut e = Element::new("Docking");
        e.add_attribute("AllowedAreas", self.allowed_areas)
            .add_attribute("Area", self.area.code())
            .add_attribute("Features", self.features)
            .add_attribute("Floating", self.floating)
            .add_attribute("X", self.rect.x)
            .add_attribute("Y", self.rect.y)
            .add_attribute("Width", self.rect.width)
            .add_attribute("Height", self.rect.height)
            .add_attribute("Hidden", self.hidden);
        if self.tabbed {
            e.add_attribute("Tabbed", true);
        }
        e
    }

    fn from_element(e: &Element) -> Self {
        let d = Self::default();
        Self {
            allowed_areas: e.attribute("AllowedAreas").unwrap_or(d.allowed_areas),
            area: e
                .attribute("Area")
                .and_then(DockArea::from_code)
                .unwrap_or(d.area),
            features: e.attribute("Features").unwrap_or(d.features),
            floating: e.attribute("Floating").unwrap_or(d.floating),
            rect: Rect::new(
                e.attribute("X").unwrap_or(d.rect.x),
                e.attribute("Y").unwrap_or(d.rect.y),
                e.attribute("Width").unwrap_or(d.rect.width),
                e.attribute("Height").unwrap_or(d.rect.height),
            ),
            hidden: e.attribute("Hidden").unwrap_or(d.hidden),
            tabbed: e.attribute("Tabbed").unwrap_or(d.tabbed),
        }
    }
}

/// One saved panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelNode {
    pub file: String,
    pub restore_id: String,
    /// Already deduplicated substitution text.
    pub macros: String,
    pub customisation_name: String,
    pub path_list: Vec<String>,
    pub title: String,
    pub presentation: Option<Presentation>,
    pub docking: Option<DockAttributes>,
    pub scroll: Option<Point>,
    pub active: bool,
}

impl PanelNode {
    pub fn to_element(&self) -> Element {
        let mut e = Element::new("Gui");
        e.add_attribute("Name", &self.file)
            .add_attribute("ID", &self.restore_id);
        if self.active {
            e.add_attribute("CurrentGui", true);
        }
        if !self.macros.is_empty() {
            e.add_value("MacroSubstitutions", &self.macros);
        }
        if !self.customisation_name.is_empty() {
            e.add_value("CustomisationName", &self.customisation_name);
        }
        for (order, path) in self.path_list.iter().enumerate() {
            let mut item = Element::new("PathListItem");
            item.add_attribute("Order", order).add_value("Path", path);
            e.add_element(item);
        }
        if let Some(scroll) = self.scroll {
            let mut s = Element::new("Scroll");
            s.add_attribute("X", scroll.x).add_attribute("Y", scroll.y);
            e.add_element(s);
        }
        e.add_value("Title", &self.title);
        if let Some(presentation) = self.presentation {
            e.add_value("Presentation", presentation);
        }
        if let Some(docking) = self.docking {
            e.add_element(docking.to_element());
        }
        e
    }

    /// `None` when the element names no file to open.
    pub fn from_element(e: &Element) -> Option<Self> {
        let file = e.attribute_str("Name")?.to_string();

        let mut ordered: Vec<(usize, String)> = e
            .elements("PathListItem")
            .filter_map(|item| {
                let order = item.attribute::<usize>("Order")?;
                let path = item.value_str("Path")?;
                Some((order, path.to_string()))
            })
            .collect();
        ordered.sort_by_key(|(order, _)| *order);

        let scroll = e
            .element("Scroll")
            .and_then(|s| Some(Point::new(s.attribute("X")?, s.attribute("Y")?)));

        Some(Self {
            file,
            restore_id: e.attribute_str("ID").unwrap_or_default().to_string(),
            macros: e.value_str("MacroSubstitutions").unwrap_or_default().to_string(),
            customisation_name: e
                .value_str("CustomisationName")
                .unwrap_or_default()
                .to_string(),
            path_list: ordered.into_iter().map(|(_, p)| p).collect(),
            title: e.value_str("Title").unwrap_or_default().to_string(),
            presentation: e.value("Presentation"),
            docking: e.element("Docking").map(DockAttributes::from_element),
            scroll,
            active: e.attribute("CurrentGui").unwrap_or(false),
        })
    }
}

/// One saved top-level window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowSessionNode {
    pub unique_id: u32,
    pub title: String,
    pub geometry: Option<Rect>,
    pub state: Option<WindowState>,
    pub panels: Vec<PanelNode>,
}

impl WindowSessionNode {
    /// Root element name for the window at `ordinal` in the window list.
    pub fn root_name(ordinal: usize) -> String {
        format!("QEGuiMainWindow_{ordinal}")
    }

    pub fn to_element(&self, ordinal: usize) -> Element {
        let mut root = Element::new(Self::root_name(ordinal));

        let mut identity = Element::new("Identity");
        identity
            .add_attribute("id", self.unique_id)
            .add_value("Title", &self.title);
        root.add_element(identity);

        if let Some(r) = self.geometry {
            let mut geo = Element::new("Geometry");
            geo.add_attribute("X", r.x)
                .add_attribute("Y", r.y)
                .add_attribute("Width", r.width)
                .add_attribute("Height", r.height);
            root.add_element(geo);
        }

        if let Some(state) = self.state {
            let mut s = Element::new("State");
            s.add_attribute("Flags", state.bits());
            root.add_element(s);
        }

        for panel in &self.panels {
            root.add_element(panel.to_element());
        }
        root
    }

    pub fn from_element(root: &Element) -> Self {
        let identity = root.element("Identity");
        let geometry = root.element("Geometry").and_then(|g| {
            Some(Rect::new(
                g.attribute("X")?,
                g.attribute("Y")?,
                g.attribute("Width")?,
                g.attribute("Height")?,
            ))
        });

        Self {
            unique_id: identity.and_then(|i| i.attribute("id")).unwrap_or(0),
            title: identity
                .and_then(|i| i.value_str("Title"))
                .unwrap_or_default()
                .to_string(),
            geometry,
            state: root
                .element("State")
                .and_then(|s| s.attribute("Flags"))
                .map(WindowState),
            panels: root
                .elements("Gui")
                .filter_map(PanelNode::from_element)
                .collect(),
        }
    }
}
