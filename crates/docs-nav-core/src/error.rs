use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavError {
    #[error("Docs directory not found: {path}")]
    ContentRootNotFound { path: PathBuf },

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("Invalid exclude pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Failed to snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to restore {path}: {source}")]
    Restore {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Build command `{command}` failed: {status}")]
    BuildCommandFailed { command: String, status: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NavError>;

impl NavError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigParse { .. } | Self::ConfigKeyNotFound { .. } => 2,
            Self::InvalidPattern { .. } => 2,
            Self::ContentRootNotFound { .. } => 3,
            Self::BuildCommandFailed { .. } => 4,
            Self::Restore { .. } => 5,
            _ => 1,
        }
    }
}
