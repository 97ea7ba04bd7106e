use serde::{Deserialize, Serialize};
use std::fmt;

/// Window-system rectangle in integer pixels. `right()` and `bottom()` are
/// inclusive, matching how window managers report frame edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    /// Move horizontally so the right edge lands on `right`, keeping the size.
    pub fn move_right(&mut self, right: i32) {
        self.x = right - self.width + 1;
    }

    pub fn move_left(&mut self, left: i32) {
        self.x = left;
    }

    pub fn move_top(&mut self, top: i32) {
        self.y = top;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// Toolkit window-state flags, persisted as a plain integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowState(pub u32);

impl WindowState {
    pub const NORMAL: WindowState = WindowState(0x00);
    pub const MINIMIZED: WindowState = WindowState(0x01);
    pub const MAXIMIZED: WindowState = WindowState(0x02);
    pub const FULL_SCREEN: WindowState = WindowState(0x04);
    pub const ACTIVE: WindowState = WindowState(0x08);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: WindowState) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for WindowState {
    type Output = WindowState;

    fn bitor(self, rhs: Self) -> Self::Output {
        WindowState(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PanelId(pub u32);

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panel-{}", self.0)
    }
}

/// Access level the host runs at. Saved names match the widget toolkit's
/// enumerator names so configurations stay interchangeable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserLevel {
    #[default]
    User,
    Scientist,
    Engineer,
}

impl UserLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            UserLevel::User => "USERLEVEL_USER",
            UserLevel::Scientist => "USERLEVEL_SCIENTIST",
            UserLevel::Engineer => "USERLEVEL_ENGINEER",
        }
    }
}

impl fmt::Display for UserLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USERLEVEL_USER" => Ok(UserLevel::User),
            "USERLEVEL_SCIENTIST" => Ok(UserLevel::Scientist),
            "USERLEVEL_ENGINEER" => Ok(UserLevel::Engineer),
            other => Err(format!("unknown user level '{other}'")),
        }
    }
}

/// Version triple carried at the head of every handed-off parameter payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtocolVersion {
    pub major: u8,
    pub minor: u8,
    pub release: u8,
}

impl ProtocolVersion {
    pub const fn new(major: u8, minor: u8, release: u8) -> Self {
        Self {
            major,
            minor,
            release,
        }
    }

    pub fn to_bytes(self) -> [u8; 3] {
        [self.major, self.minor, self.release]
    }

    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.release)
    }
}
