//! URL pattern matching with path parameters.

use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("unclosed parameter in url pattern: {0}")]
    UnclosedParam(String),
    #[error("empty parameter name in url pattern: {0}")]
    EmptyParamName(String),
    #[error("invalid url pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// Compiled route URL pattern.
///
/// Accepts express-style `:name` segments and brace-style `{name}` segments. Patterns
/// without parameters are compared as plain strings. Matching ignores letter case; captured
/// parameter values keep the case of the request.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    source: String,
    matcher: Matcher,
}

#[derive(Debug, Clone)]
enum Matcher {
    Exact(String),
    Params {
        regex: Regex,
        param_names: Vec<String>,
    },
}

impl UrlPattern {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let normalized = normalize_url(pattern);
        let mut param_names = Vec::new();
        let mut regex_str = String::new();
        let mut chars = normalized.chars().peekable();
        let mut segment_start = false;

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(PatternError::UnclosedParam(pattern.to_owned()));
                    }
                    push_param(pattern, name, &mut param_names, &mut regex_str)?;
                }
                ':' if segment_start => {
                    let mut name = String::new();
                    while let Some(&next) = chars.peek() {
                        if !(next.is_ascii_alphanumeric() || next == '_') {
                            break;
                        }
                        name.push(next);
                        chars.next();
                    }
                    push_param(pattern, name, &mut param_names, &mut regex_str)?;
                }
                other => {
                    let mut buf = [0u8; 4];
                    regex_str.push_str(&regex::escape(other.encode_utf8(&mut buf)));
                }
            }
            segment_start = c == '/';
        }

        if param_names.is_empty() {
            return Ok(Self::exact(pattern));
        }

        let regex = Regex::new(&format!("(?i)^{regex_str}$"))?;
        Ok(Self {
            source: pattern.to_owned(),
            matcher: Matcher::Params { regex, param_names },
        })
    }

    /// Pattern matching one literal path.
    pub fn exact(path: &str) -> Self {
        Self {
            source: path.to_owned(),
            matcher: Matcher::Exact(normalize_url(path)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Matches a request URL, ignoring its query string and a trailing slash.
    /// Returns the decoded path parameters on success.
    pub fn matches(&self, url: &str) -> Option<HashMap<String, String>> {
        let url = normalize_url(url);
        match &self.matcher {
            Matcher::Exact(path) => path.eq_ignore_ascii_case(&url).then(HashMap::new),
            Matcher::Params { regex, param_names } => {
                let caps = regex.captures(&url)?;
                let params = param_names
                    .iter()
                    .enumerate()
                    .filter_map(|(i, name)| {
                        caps.get(i + 1).map(|m| {
                            let value = urlencoding::decode(m.as_str())
                                .map(|v| v.into_owned())
                                .unwrap_or_else(|_| m.as_str().to_owned());
                            (name.clone(), value)
                        })
                    })
                    .collect();
                Some(params)
            }
        }
    }
}

fn push_param(
    pattern: &str,
    name: String,
    param_names: &mut Vec<String>,
    regex_str: &mut String,
) -> Result<(), PatternError> {
    if name.is_empty() {
        return Err(PatternError::EmptyParamName(pattern.to_owned()));
    }
    param_names.push(name);
    regex_str.push_str("([^/]+)");
    Ok(())
}

fn normalize_url(url: &str) -> String {
    let without_query = url.split('?').next().unwrap_or("");
    let trimmed = without_query.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".into()
    } else {
        trimmed.into()
    }
}
