use std::path::PathBuf;

use thiserror::Error;

/// Failure of one of the record collaborator calls.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read records from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse record on line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    TomlDecode {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid fallback_color: {0}")]
    InvalidColor(#[from] ColorParseError),

    #[error(
        "no records file selected: pass --records <path>, set PLAYTIME_RECORDS, or set records_path in the config"
    )]
    NoRecordsPath,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected #rrggbb, got {0:?}")]
pub struct ColorParseError(pub String);
