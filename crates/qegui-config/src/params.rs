//! Startup parameters: the intent of one `qegui` invocation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::adaptation::{parse_bool, AdaptationSource};
use crate::scale::SCALE_DEFAULT;

/// Configuration file used when none is given.
pub const DEFAULT_CONFIGURATION_FILE: &str = "QEGuiConfig.json";

/// Configuration name restored by `-r` without a name.
pub const DEFAULT_CONFIGURATION_NAME: &str = "Default";

/// Separator between entries of a search-path list.
#[cfg(windows)]
pub const PATH_LIST_SEPARATOR: char = ';';
#[cfg(not(windows))]
pub const PATH_LIST_SEPARATOR: char = ':';

/// Everything a process asks the running instance to do.
///
/// String fields use the empty string for "not given"; the PV list files have
/// `Option` accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupParams {
    /// Widget adjust scale, percent.
    pub adjust_scale: f64,
    /// Font scale, percent.
    pub font_scale: f64,
    pub enable_edit: bool,
    pub disable_menu: bool,
    pub disable_status: bool,
    pub disable_autosave: bool,
    pub single_app: bool,
    pub restore: bool,
    pub filenames: Vec<String>,
    pub path_list: Vec<String>,
    pub substitutions: String,
    pub configuration_file: String,
    pub configuration_name: String,
    pub customisation_file: String,
    pub startup_customisation_name: String,
    pub default_customisation_name: String,
    pub application_title: String,
    pub known_pv_file: String,
    pub oos_pv_file: String,
}

impl Default for StartupParams {
    fn default() -> Self {
        Self {
            adjust_scale: SCALE_DEFAULT,
            font_scale: SCALE_DEFAULT,
            enable_edit: false,
            disable_menu: false,
            disable_status: false,
            disable_autosave: false,
            single_app: false,
            restore: false,
            filenames: Vec::new(),
            path_list: Vec::new(),
            substitutions: String::new(),
            configuration_file: DEFAULT_CONFIGURATION_FILE.to_string(),
            configuration_name: DEFAULT_CONFIGURATION_NAME.to_string(),
            customisation_file: String::new(),
            startup_customisation_name: String::new(),
            default_customisation_name: String::new(),
            application_title: String::new(),
            known_pv_file: String::new(),
            oos_pv_file: String::new(),
        }
    }
}

/// Values given on the command line. `None` / `false` means "not given".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamOverrides {
    pub adjust_scale: Option<f64>,
    pub font_scale: Option<f64>,
    pub single_app: bool,
    pub enable_edit: bool,
    pub disable_menu: bool,
    pub disable_status: bool,
    pub disable_autosave: bool,
    /// `Some(None)` for a bare `-r`, `Some(Some(name))` for `-r name`.
    pub restore: Option<Option<String>>,
    pub configuration_file: Option<String>,
    /// Search paths joined with [`PATH_LIST_SEPARATOR`].
    pub path_list: Option<String>,
    pub macros: Option<String>,
    pub customisation_file: Option<String>,
    pub customisation_name: Option<String>,
    pub default_customisation_name: Option<String>,
    pub title: Option<String>,
    pub known_pvs: Option<String>,
    pub oos_pvs: Option<String>,
    pub filenames: Vec<String>,
}

impl StartupParams {
    /// Build the parameter set: command-line override, then adaptation
    /// source, then default. Boolean flags are set if either side sets them.
    pub fn resolve(overrides: ParamOverrides, source: &impl AdaptationSource) -> Self {
        let defaults = Self::default();

        let pick = |cli: Option<String>, key: &str, default: &str| {
            cli.unwrap_or_else(|| source.get_string(key, default))
        };

        let adjust_scale = overrides
            .adjust_scale
            .or_else(|| source.get_f64("adjust_scale"))
            .unwrap_or(defaults.adjust_scale);
        let font_scale = overrides
            .font_scale
            .or_else(|| source.get_f64("font_scale"))
            .unwrap_or(defaults.font_scale);

        // QEGUI_RESTORE is either a flag or the name of the configuration.
        let (env_restore, env_restore_name) = match source.get("restore") {
            Some(raw) => match parse_bool(&raw) {
                Some(flag) => (flag, None),
                None => (true, Some(raw.trim().to_string())),
            },
            None => (false, None),
        };
        let (cli_restore, cli_restore_name) = match overrides.restore {
            Some(name) => (true, name),
            None => (false, None),
        };
        let configuration_name = cli_restore_name
            .or(env_restore_name)
            .unwrap_or(defaults.configuration_name);

        let path_list = split_path_list(&pick(overrides.path_list, "path", ""));

        Self {
            adjust_scale,
            font_scale,
            enable_edit: overrides.enable_edit || source.get_bool("edit"),
            disable_menu: overrides.disable_menu || source.get_bool("disable_menu"),
            disable_status: overrides.disable_status || source.get_bool("disable_status"),
            disable_autosave: overrides.disable_autosave || source.get_bool("disable_autosave"),
            single_app: overrides.single_app || source.get_bool("single"),
            restore: cli_restore || env_restore,
            filenames: overrides.filenames,
            path_list,
            substitutions: pick(overrides.macros, "macros", ""),
            configuration_file: pick(
                overrides.configuration_file,
                "configuration",
                &defaults.configuration_file,
            ),
            configuration_name,
            customisation_file: pick(overrides.customisation_file, "customisation_file", ""),
            startup_customisation_name: pick(
                overrides.customisation_name,
                "customisation_name",
                "",
            ),
            default_customisation_name: pick(
                overrides.default_customisation_name,
                "default_customisation_name",
                "",
            ),
            application_title: pick(overrides.title, "title", ""),
            known_pv_file: pick(overrides.known_pvs, "known_pvs", ""),
            oos_pv_file: pick(overrides.oos_pvs, "oos_pvs", ""),
        }
    }

    pub fn known_pv_path(&self) -> Option<&Path> {
        non_empty_path(&self.known_pv_file)
    }

    pub fn oos_pv_path(&self) -> Option<&Path> {
        non_empty_path(&self.oos_pv_file)
    }

    /// Title for new windows, falling back to the application name.
    pub fn title_or_default(&self) -> &str {
        if self.application_title.is_empty() {
            qegui_common::APP_NAME
        } else {
            &self.application_title
        }
    }
}

fn non_empty_path(value: &str) -> Option<&Path> {
    (!value.is_empty()).then(|| Path::new(value))
}

/// Split a separator-joined search-path list. Empty input gives no paths.
pub fn split_path_list(joined: &str) -> Vec<String> {
    if joined.is_empty() {
        return Vec::new();
    }
    joined.split(PATH_LIST_SEPARATOR).map(str::to_string).collect()
}
