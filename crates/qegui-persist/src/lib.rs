//! Hierarchical key/value persistence for saved window configurations.
//!
//! A [`ConfigStore`] is one JSON file holding any number of named
//! configurations. Each [`Configuration`] is a set of named root
//! [`Element`]s (`QEGui`, `QEGuiMainWindow_0`, ...), and each element has
//! attributes, values and child elements.

pub mod element;
pub mod names;
pub mod store;

pub use element::{Configuration, Element, Node};
pub use names::{
    is_reserved, validate_user_config_name, AUTOSAVE_NAME, DEFAULT_NAME, EXIT_SAVE_NAME, ROOT_NAME,
};
pub use store::{ConfigNames, ConfigStore};
