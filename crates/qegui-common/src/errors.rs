use std::path::PathBuf;

use crate::types::ProtocolVersion;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("path error: {0}")]
    PathError(String),
}

/// Failures reading or writing the named-configuration store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration file parse error: {0}")]
    Parse(String),

    #[error("configuration name '{0}' is reserved")]
    ReservedName(String),

    #[error("configuration name must not be empty")]
    EmptyName,
}

/// Failures on the local instance channel.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("failed to bind instance channel {name}: {source}")]
    Bind {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write to instance channel: {0}")]
    Write(#[source] std::io::Error),

    #[error("timed out after {0} ms handing parameters to the running instance")]
    WriteTimeout(u64),

    #[error("could not encode startup parameters: {0}")]
    Encode(#[from] EncodeError),

    #[error("instance channel not supported: {0}")]
    NotSupported(String),
}

/// Reasons a received startup-parameter payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("payload too short ({len} bytes) to contain a version")]
    TooShort { len: usize },

    #[error("payload from version {received} ignored by version {expected}")]
    VersionMismatch {
        expected: ProtocolVersion,
        received: ProtocolVersion,
    },

    #[error("payload truncated while reading {field}")]
    Truncated { field: &'static str },

    #[error("payload field {field} is not valid UTF-8")]
    InvalidText { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("{field} has {count} entries, at most 255 fit the wire format")]
    TooManyEntries { field: &'static str, count: usize },

    #[error("{field} contains an interior NUL byte")]
    InteriorNul { field: &'static str },
}
