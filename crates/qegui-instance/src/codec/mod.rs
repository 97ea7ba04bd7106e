//! Binary form of [`StartupParams`] passed between processes.
//!
//! ```text
//! version major, minor, release      3 x u8
//! adjust scale, font scale           2 x f64 little-endian
//! edit, no menu, no status,
//! no autosave, single, restore       6 x u8, zero is false
//! file count, files                  u8 then NUL-terminated UTF-8
//! path count, paths                  u8 then NUL-terminated UTF-8
//! macros, configuration name, configuration file,
//! known-PV file, out-of-service-PV file,
//! customisation file, customisation name,
//! default customisation name, title  NUL-terminated UTF-8 each
//! ```
//!
//! Any change to the layout needs a version bump: a payload is only accepted
//! when its version triple matches the receiver's exactly.

mod reader;


use qegui_common::{DecodeError, EncodeError, ProtocolVersion};
use qegui_config::{clamp_scale, StartupParams};

use reader::Reader;

const fn parse_component(s: &str) -> u8 {
    let bytes = s.as_bytes();
    let mut value: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        value = value * 10 + (bytes[i] - b'0') as u32;
        i += 1;
    }
    if value > u8::MAX as u32 {
        u8::MAX
    } else {
        value as u8
    }
}

/// Version stamped on every payload this build produces.
pub const PROTOCOL_VERSION: ProtocolVersion = ProtocolVersion::new(
    parse_component(env!("CARGO_PKG_VERSION_MAJOR")),
    parse_component(env!("CARGO_PKG_VERSION_MINOR")),
    parse_component(env!("CARGO_PKG_VERSION_PATCH")),
);

pub fn encode(params: &StartupParams) -> Result<Vec<u8>, EncodeError> {
    encode_with(params, PROTOCOL_VERSION)
}

pub fn encode_with(
    params: &StartupParams,
    version: ProtocolVersion,
) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::with_capacity(128);
    out.extend_from_slice(&version.to_bytes());
    out.extend_from_slice(&params.adjust_scale.to_le_bytes());
    out.extend_from_slice(&params.font_scale.to_le_bytes());

    for flag in [
        params.enable_edit,
        params.disable_menu,
        params.disable_status,
        params.disable_autosave,
        params.single_app,
        params.restore,
    ] {
        out.push(u8::from(flag));
    }

    put_list(&mut out, "files", &params.filenames)?;
    put_list(&mut out, "paths", &params.path_list)?;

    for (field, value) in [
        ("macro substitutions", &params.substitutions),
        ("configuration name", &params.configuration_name),
        ("configuration file", &params.configuration_file),
        ("known PV file", &params.known_pv_file),
        ("out-of-service PV file", &params.oos_pv_file),
        ("customisation file", &params.customisation_file),
        ("customisation name", &params.startup_customisation_name),
        ("default customisation name", &params.default_customisation_name),
        ("title", &params.application_title),
    ] {
        put_str(&mut out, field, value)?;
    }

    Ok(out)
}

fn put_list(out: &mut Vec<u8>, field: &'static str, items: &[String]) -> Result<(), EncodeError> {
    let count = u8::try_from(items.len()).map_err(|_| EncodeError::TooManyEntries {
        field,
        count: items.len(),
    })?;
    out.push(count);
    for item in items {
        put_str(out, field, item)?;
    }
    Ok(())
}

fn put_str(out: &mut Vec<u8>, field: &'static str, value: &str) -> Result<(), EncodeError> {
    if value.as_bytes().contains(&0) {
        return Err(EncodeError::InteriorNul { field });
    }
    out.extend_from_slice(value.as_bytes());
    out.push(0);
    Ok(())
}

pub fn decode(bytes: &[u8]) -> Result<StartupParams, DecodeError> {
    decode_with(bytes, PROTOCOL_VERSION)
}

/// Decode a payload produced by a sender running `expected`.
///
/// Nothing is returned unless the whole payload decodes. Scales are clamped
/// to the accepted range. Bytes after the last field are ignored.
pub fn decode_with(bytes: &[u8], expected: ProtocolVersion) -> Result<StartupParams, DecodeError> {
    let [major, minor, release, rest @ ..] = bytes else {
        return Err(DecodeError::TooShort { len: bytes.len() });
    };
    let received = ProtocolVersion::new(*major, *minor, *release);
    if received != expected {
        return Err(DecodeError::VersionMismatch { expected, received });
    }

    let mut r = Reader::new(rest);
    let adjust_scale = clamp_scale(r.f64("adjust scale")?);
    let font_scale = clamp_scale(r.f64("font scale")?);

    let enable_edit = r.flag("enable edit")?;
    let disable_menu = r.flag("disable menu")?;
    let disable_status = r.flag("disable status")?;
    let disable_autosave = r.flag("disable autosave")?;
    let single_app = r.flag("single app")?;
    let restore = r.flag("restore")?;

    let filenames = r.list("files")?;
    let path_list = r.list("paths")?;

    Ok(StartupParams {
        adjust_scale,
        font_scale,
        enable_edit,
        disable_menu,
        disable_status,
        disable_autosave,
        single_app,
        restore,
        filenames,
        path_list,
        substitutions: r.string("macro substitutions")?,
        configuration_name: r.string("configuration name")?,
        configuration_file: r.string("configuration file")?,
        known_pv_file: r.string("known PV file")?,
        oos_pv_file: r.string("out-of-service PV file")?,
        customisation_file: r.string("customisation file")?,
        startup_customisation_name: r.string("customisation name")?,
        default_customisation_name: r.string("default customisation name")?,
        application_title: r.string("title")?,
    })
}
