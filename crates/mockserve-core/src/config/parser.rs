//! Configuration file parsing (YAML/JSON/JSONC) and glob-based loading.

use crate::config::error::ConfigError;
use crate::config::settings::MockConfig;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;

/// Config file type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFileType {
    Yaml,
    Json,
    Jsonc,
    Unknown,
}

/// Get config file type from path extension
pub fn get_file_type(path: &str) -> ConfigFileType {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "yaml" | "yml" => ConfigFileType::Yaml,
        "json" => ConfigFileType::Json,
        "jsonc" => ConfigFileType::Jsonc,
        _ => ConfigFileType::Unknown,
    }
}

/// Strip `//` and `/* */` comments from JSONC content, leaving string literals untouched.
pub fn strip_json_comments(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                result.push(c);
            }
            ('/', Some('/')) => {
                // Keep the line break so line numbers in parse errors stay right
                for next in chars.by_ref() {
                    if next == '\n' || next == '\r' {
                        result.push(next);
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => result.push(c),
        }
    }

    result
}

/// Parse JSON content
pub fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    serde_json::from_str(content).map_err(ConfigError::from)
}

/// Parse JSONC content (JSON with comments)
pub fn parse_jsonc<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let stripped = strip_json_comments(content);
    serde_json::from_str(&stripped).map_err(ConfigError::from)
}

/// Parse YAML content
pub fn parse_yaml<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    serde_yaml::from_str(content).map_err(ConfigError::from)
}

/// Parse config content based on file type
pub fn parse_config<T: DeserializeOwned>(content: &str, path: &str) -> Result<T, ConfigError> {
    match get_file_type(path) {
        ConfigFileType::Yaml => parse_yaml(content),
        ConfigFileType::Json => parse_json(content),
        ConfigFileType::Jsonc => parse_jsonc(content),
        ConfigFileType::Unknown => Err(ConfigError::UnknownFileType(path.to_string())),
    }
}

/// Read and parse one config file.
pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, &path.to_string_lossy())
}

/// Load raw route or collection definitions from every file matching `pattern`.
///
/// Files are read in path order. A file holding a list contributes each item, any other
/// document contributes itself. Shape checks are left to the validator.
pub fn load_definitions(pattern: &str) -> Result<Vec<Value>, ConfigError> {
    let mut paths = glob::glob(pattern)?.collect::<Result<Vec<_>, _>>()?;
    if paths.is_empty() {
        return Err(ConfigError::NoFilesMatched(pattern.to_owned()));
    }
    paths.sort();

    let mut definitions = Vec::new();
    for path in paths {
        tracing::debug!(path = %path.display(), "loading definitions");
        match load_file::<Value>(&path)? {
            Value::Array(items) => definitions.extend(items),
            other => definitions.push(other),
        }
    }

    Ok(definitions)
}

/// Load server settings from a config file.
pub fn load_settings(path: &Path) -> Result<MockConfig, ConfigError> {
    load_file(path)
}
