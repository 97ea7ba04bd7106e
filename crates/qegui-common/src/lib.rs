pub mod errors;
pub mod id;
pub mod types;

pub use errors::{ChannelError, ConfigError, DecodeError, EncodeError, StoreError};
pub use id::new_correlation_id;
pub use types::{PanelId, Point, ProtocolVersion, Rect, Size, UserLevel, WindowId, WindowState};

/// Application name used for the instance channel and persistence keys.
pub const APP_NAME: &str = "QEGui";
