//! Error types for configuration loading and parsing.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Unknown file type: {0}")]
    UnknownFileType(String),
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("Failed to expand glob: {0}")]
    Glob(#[from] glob::GlobError),
    #[error("No files matched: {0}")]
    NoFilesMatched(String),
}
