//! Core route types.

use crate::matching::{PatternError, UrlPattern};
use crate::types::variant::Variant;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// HTTP method a route can be served on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported HTTP method: {0}")]
pub struct UnsupportedMethod(pub String);

impl FromStr for HttpMethod {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(UnsupportedMethod(other.to_owned())),
        }
    }
}

/// Mock route definition with its compiled URL pattern.
#[derive(Debug, Clone)]
pub struct Route {
    /// Unique identifier for this route
    pub id: String,
    /// URL pattern (supports `:param` and `{param}` placeholders)
    pub url: String,
    pub method: HttpMethod,
    /// Response variants, in declaration order
    pub variants: Vec<Variant>,
    pattern: UrlPattern,
}

impl Route {
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        method: HttpMethod,
    ) -> Result<Self, PatternError> {
        let url = url.into();
        let pattern = UrlPattern::parse(&url)?;
        Ok(Self {
            id: id.into(),
            url,
            method,
            variants: Vec::new(),
            pattern,
        })
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variants.push(variant);
        self
    }

    pub fn pattern(&self) -> &UrlPattern {
        &self.pattern
    }

    pub fn variant(&self, variant_id: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }
}

/// Parsed route reference in format `route_id:variant_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteReference {
    pub route_id: String,
    pub variant_id: String,
}

impl RouteReference {
    /// Splits on the first `:`. Both halves must be non-empty.
    pub fn parse(s: &str) -> Option<Self> {
        let (route_id, variant_id) = s.split_once(':')?;
        if route_id.is_empty() || variant_id.is_empty() {
            return None;
        }

        Some(Self {
            route_id: route_id.to_owned(),
            variant_id: variant_id.to_owned(),
        })
    }

    /// Composite key addressing a route variant from collections.
    pub fn key(route_id: &str, variant_id: &str) -> String {
        format!("{route_id}:{variant_id}")
    }
}

impl fmt::Display for RouteReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.route_id, self.variant_id)
    }
}
