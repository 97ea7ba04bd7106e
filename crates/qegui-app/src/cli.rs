use std::path::PathBuf;

use clap::Parser;
use qegui_config::ParamOverrides;

/// QEGui: display host for control-system screens.
///
/// Options not given here fall back to `QEGUI_*` environment variables.
#[derive(Parser, Debug)]
#[command(name = "qegui", version, about)]
pub struct Args {
    /// Widget scale, percent (40 to 400).
    #[arg(short = 'a', long = "adjust-scale", value_name = "PERCENT")]
    pub adjust_scale: Option<f64>,

    /// Font scale, percent (40 to 400).
    #[arg(short = 'f', long = "font-scale", value_name = "PERCENT")]
    pub font_scale: Option<f64>,

    /// Hand the request to an already running QEGui if there is one.
    #[arg(short = 's', long = "single")]
    pub single: bool,

    /// Allow screens to be opened in the designer.
    #[arg(short = 'e', long = "edit")]
    pub edit: bool,

    #[arg(short = 'b', long = "disable-menu")]
    pub disable_menu: bool,

    #[arg(short = 'u', long = "disable-status")]
    pub disable_status: bool,

    #[arg(short = 'o', long = "disable-autosave")]
    pub disable_autosave: bool,

    /// Restore a saved configuration, `Default` when no name is given.
    #[arg(short = 'r', long = "restore", value_name = "NAME", num_args = 0..=1)]
    pub restore: Option<Option<String>>,

    /// File holding saved configurations.
    #[arg(short = 'c', long = "configuration", value_name = "FILE")]
    pub configuration: Option<String>,

    /// Search paths for screen files, separated like PATH.
    #[arg(short = 'p', long = "path", value_name = "PATHS")]
    pub path: Option<String>,

    /// Macro substitutions, e.g. `SECTOR=3,DEV=ION1`.
    #[arg(short = 'm', long = "macros")]
    pub macros: Option<String>,

    #[arg(short = 'w', long = "customisation-file", value_name = "FILE")]
    pub customisation_file: Option<String>,

    /// Window customisation for the windows opened at startup.
    #[arg(short = 'n', long = "customisation-name", value_name = "NAME")]
    pub customisation_name: Option<String>,

    /// Window customisation for every other window.
    #[arg(short = 'd', long = "default-customisation-name", value_name = "NAME")]
    pub default_customisation_name: Option<String>,

    /// Application title.
    #[arg(short = 't', long = "title")]
    pub title: Option<String>,

    /// File listing the PV names expected to exist.
    #[arg(long, value_name = "FILE")]
    pub known_pvs: Option<String>,

    /// File listing PV names that are out of service.
    #[arg(long, value_name = "FILE")]
    pub oos_pvs: Option<String>,

    /// Host settings file override.
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Screen files to open, one window each.
    pub files: Vec<String>,
}

impl Args {
    pub fn into_overrides(self) -> ParamOverrides {
        ParamOverrides {
            adjust_scale: self.adjust_scale,
            font_scale: self.font_scale,
            single_app: self.single,
            enable_edit: self.edit,
            disable_menu: self.disable_menu,
            disable_status: self.disable_status,
            disable_autosave: self.disable_autosave,
            restore: self.restore,
            configuration_file: self.configuration,
            path_list: self.path,
            macros: self.macros,
            customisation_file: self.customisation_file,
            customisation_name: self.customisation_name,
            default_customisation_name: self.default_customisation_name,
            title: self.title,
            known_pvs: self.known_pvs,
            oos_pvs: self.oos_pvs,
            filenames: self.files,
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_flags_map_to_overrides() {
        let args = Args::try_parse_from([
            "qegui", "-s", "-o", "-a", "150", "-m", "SECTOR=3", "-t", "Linac", "a.ui", "b.ui",
        ])
        .unwrap();
        let o = args.into_overrides();
        assert!(o.single_app && o.disable_autosave);
        assert!(!o.enable_edit);
        assert_eq!(o.adjust_scale, Some(150.0));
        assert_eq!(o.macros.as_deref(), Some("SECTOR=3"));
        assert_eq!(o.title.as_deref(), Some("Linac"));
        assert_eq!(o.filenames, vec!["a.ui", "b.ui"]);
        assert_eq!(o.restore, None);
    }

    #[test]
    fn restore_name_is_optional() {
        let bare = Args::try_parse_from(["qegui", "-r"]).unwrap();
        assert_eq!(bare.restore, Some(None));

        let named = Args::try_parse_from(["qegui", "a.ui", "-r", "Nightshift"]).unwrap();
        assert_eq!(named.restore, Some(Some("Nightshift".to_string())));
        assert_eq!(named.files, vec!["a.ui"]);
    }

    #[test]
    fn bad_scale_is_rejected() {
        assert!(Args::try_parse_from(["qegui", "-a", "big"]).is_err());
    }

    #[test]
    fn long_only_options() {
        let args = Args::try_parse_from([
            "qegui",
            "--known-pvs",
            "known.txt",
            "--settings",
            "/tmp/s.toml",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.known_pvs.as_deref(), Some("known.txt"));
        assert_eq!(args.settings, Some(PathBuf::from("/tmp/s.toml")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }
}
