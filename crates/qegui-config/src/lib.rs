//! QEGui configuration.
//!
//! Two kinds of configuration live here:
//!
//! - [`StartupParams`]: what one invocation of `qegui` asks for (files to
//!   open, scaling, restore name, ...). Resolved from command-line overrides
//!   and `QEGUI_*` adaptation variables, and handed between processes.
//! - [`HostSettings`]: how the host itself behaves (autosave interval,
//!   channel timeouts, geometry settling). Loaded from `settings.toml`, with
//!   defaults for anything missing.

pub mod adaptation;
pub mod params;
pub mod paths;
pub mod pv_list;
pub mod scale;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use adaptation::{AdaptationSource, EnvSource};
pub use params::{ParamOverrides, StartupParams, DEFAULT_CONFIGURATION_FILE};
pub use scale::{clamp_scale, SCALE_DEFAULT, SCALE_MAX, SCALE_MIN};
pub use schema::{HostSettings, RecoverPolicy};

use qegui_common::ConfigError;
use std::path::Path;

/// Load host settings from `path`, or from the platform default location when
/// no path is given. The default file is created from a commented template if
/// it does not exist yet.
pub fn load_settings(path: Option<&Path>) -> Result<HostSettings, ConfigError> {
    let settings = match path {
        Some(p) => toml_loader::load_from_path(p)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&settings)?;
    Ok(settings)
}
