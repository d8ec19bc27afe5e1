//! Incoming request as seen by the dispatch engine.

use crate::types::route::HttpMethod;
use serde_json::Value;
use std::collections::HashMap;

/// HTTP request handed to the dispatch table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockRequest {
    /// `None` when the transport received a method no route can be declared with
    pub method: Option<HttpMethod>,
    /// Request URL (path + query string)
    pub url: String,
    /// Path parameters, filled in once a route matches
    pub params: HashMap<String, String>,
    /// Decoded query parameters
    pub query: HashMap<String, String>,
    /// Request headers, names lower-cased
    pub headers: HashMap<String, String>,
    /// Parsed request body
    pub body: Option<Value>,
}

impl MockRequest {
    pub fn new(method: Option<HttpMethod>, url: impl Into<String>) -> Self {
        let url = url.into();
        let query = url
            .split_once('?')
            .map(|(_, query)| parse_query_string(query))
            .unwrap_or_default();
        Self {
            method,
            url,
            query,
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_lowercase(), value.into());
        self
    }

    /// URL without its query string.
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or_default()
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }
}

/// Parse query string into HashMap with URL decoding.
///
/// Repeated keys are joined with commas.
pub fn parse_query_string(query_str: &str) -> HashMap<String, String> {
    let mut result: HashMap<String, String> = HashMap::new();

    for pair in query_str.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode(key);
        let value = decode(value);

        if let Some(existing) = result.get_mut(&key) {
            existing.push(',');
            existing.push_str(&value);
        } else {
            result.insert(key, value);
        }
    }

    result
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn h(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[rstest]
    #[case("", &[])]
    #[case("page=1", &[("page", "1")])]
    #[case("page=1&limit=10", &[("page", "1"), ("limit", "10")])]
    #[case("key=value%20with%20spaces", &[("key", "value with spaces")])]
    #[case("key%20name=value", &[("key name", "value")])]
    #[case("page=1&page=2", &[("page", "1,2")])]
    #[case("page=1&&limit=10", &[("page", "1"), ("limit", "10")])]
    #[case("&page=1&limit=10&", &[("page", "1"), ("limit", "10")])]
    #[case("page=&limit=10", &[("page", ""), ("limit", "10")])]
    #[case("page&limit=10", &[("page", ""), ("limit", "10")])]
    #[case("expr=a=b", &[("expr", "a=b")])]
    fn test_parse_query_string(#[case] query_str: &str, #[case] expected: &[(&str, &str)]) {
        assert_eq!(parse_query_string(query_str), h(expected));
    }

    #[rstest]
    fn test_new_parses_query_from_url() {
        let request = MockRequest::new(Some(HttpMethod::Get), "/api/users?page=2&sort=name");
        assert_eq!(request.path(), "/api/users");
        assert_eq!(request.query, h(&[("page", "2"), ("sort", "name")]));
        assert!(request.params.is_empty());
    }

    #[rstest]
    fn test_header_lookup_is_case_insensitive() {
        let request = MockRequest::new(Some(HttpMethod::Get), "/")
            .with_header("Authorization", "Bearer token");
        assert_eq!(request.header("authorization"), Some("Bearer token"));
        assert_eq!(request.header("AUTHORIZATION"), Some("Bearer token"));
        assert_eq!(request.header("accept"), None);
    }
}
