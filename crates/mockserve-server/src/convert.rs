//! Conversion between axum requests/responses and the engine's model.

use axum::body::{to_bytes, Body as HttpBody, Bytes};
use axum::extract::Request;
use axum::http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use axum::http::{Method, StatusCode};
use axum::response::Response;
use mockserve_core::http::parse_query_string;
use mockserve_core::types::route::HttpMethod;
use mockserve_core::{Body, MockRequest, MockResponse};
use serde_json::{Map, Value};

/// Request bodies larger than this are treated as absent.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

const JSON_CONTENT_TYPE: &str = "application/json";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Convert an incoming request. HEAD requests are matched as GET.
pub async fn into_mock_request(request: Request) -> MockRequest {
    let (parts, body) = request.into_parts();

    let method = if parts.method == Method::HEAD {
        Some(HttpMethod::Get)
    } else {
        parts.method.as_str().parse::<HttpMethod>().ok()
    };
    let url = parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path().to_owned(), |pq| pq.as_str().to_owned());

    let mut mock = MockRequest::new(method, url);
    for (name, value) in &parts.headers {
        let Ok(value) = value.to_str() else {
            continue;
        };
        mock.headers
            .entry(name.as_str().to_owned())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_owned());
    }

    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(%err, "request body discarded");
            Bytes::new()
        }
    };
    mock.body = parse_body(mock.header("content-type"), &bytes);
    mock
}

/// Parse a request body according to its content type.
///
/// JSON bodies become their value, url-encoded forms a flat object of strings; anything else,
/// including malformed input, is absent.
pub fn parse_body(content_type: Option<&str>, bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }

    let mime = content_type?
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == JSON_CONTENT_TYPE || mime.ends_with("+json") {
        return serde_json::from_slice(bytes).ok();
    }

    if mime == "application/x-www-form-urlencoded" {
        let form = std::str::from_utf8(bytes).ok()?.replace('+', " ");
        let fields: Map<String, Value> = parse_query_string(&form)
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        return Some(Value::Object(fields));
    }

    None
}

pub fn into_http_response(response: MockResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or_else(|_| {
        tracing::warn!(status = response.status, "invalid status code, sending 500");
        StatusCode::INTERNAL_SERVER_ERROR
    });

    let (content_type, body) = match response.body {
        Body::Empty => (None, HttpBody::empty()),
        Body::Json(value) => (Some(JSON_CONTENT_TYPE), HttpBody::from(value.to_string())),
        Body::Text(text) => (Some(TEXT_CONTENT_TYPE), HttpBody::from(text)),
    };

    let mut http = Response::new(body);
    *http.status_mut() = status;

    let headers = http.headers_mut();
    if let Some(content_type) = content_type {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    for (name, value) in response.headers {
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "skipping invalid response header"),
        }
    }

    http
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Some("application/json"), br#"{"collection":"base"}"#.as_slice(), Some(json!({"collection": "base"})))]
    #[case(Some("application/json; charset=utf-8"), b"[1,2]".as_slice(), Some(json!([1, 2])))]
    #[case(Some("application/vnd.api+json"), b"true".as_slice(), Some(json!(true)))]
    #[case(Some("application/json"), b"{broken".as_slice(), None)]
    #[case(Some("application/x-www-form-urlencoded"), b"collection=errors&note=a+b%21".as_slice(), Some(json!({"collection": "errors", "note": "a b!"})))]
    #[case(Some("text/plain"), b"collection=errors".as_slice(), None)]
    #[case(None, b"{}".as_slice(), None)]
    #[case(Some("application/json"), b"".as_slice(), None)]
    fn test_parse_body(
        #[case] content_type: Option<&str>,
        #[case] bytes: &[u8],
        #[case] expected: Option<Value>,
    ) {
        assert_eq!(parse_body(content_type, bytes), expected);
    }

    #[tokio::test]
    async fn test_into_mock_request() {
        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/api/users/7?expand=roles&expand=teams")
            .header("Content-Type", "application/json")
            .header("X-Trace", "abc")
            .body(HttpBody::from(r#"{"name":"Ann"}"#))
            .unwrap();

        let mock = into_mock_request(request).await;
        assert_eq!(mock.method, Some(HttpMethod::Post));
        assert_eq!(mock.url, "/api/users/7?expand=roles&expand=teams");
        assert_eq!(mock.path(), "/api/users/7");
        assert_eq!(mock.query["expand"], "roles,teams");
        assert_eq!(mock.header("x-trace"), Some("abc"));
        assert_eq!(mock.body, Some(json!({"name": "Ann"})));
    }

    #[tokio::test]
    async fn test_into_mock_request_unsupported_method() {
        let request = http::Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/users")
            .body(HttpBody::empty())
            .unwrap();

        let mock = into_mock_request(request).await;
        assert_eq!(mock.method, None);
        assert_eq!(mock.body, None);
    }

    #[tokio::test]
    async fn test_into_mock_request_head_matches_as_get() {
        let request = http::Request::builder()
            .method(Method::HEAD)
            .uri("/api/users")
            .body(HttpBody::empty())
            .unwrap();

        let mock = into_mock_request(request).await;
        assert_eq!(mock.method, Some(HttpMethod::Get));
    }

    #[rstest]
    fn test_into_http_response_json() {
        let mut response = MockResponse::default();
        response
            .set_status(201)
            .set_header("X-Mock", "users")
            .set_json(json!([]));

        let http = into_http_response(response);
        assert_eq!(http.status(), StatusCode::CREATED);
        assert_eq!(http.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(http.headers()["x-mock"], "users");
    }

    #[rstest]
    fn test_into_http_response_user_content_type_wins() {
        let mut response = MockResponse::text(200, "<ok/>");
        response.set_header("Content-Type", "application/xml");

        let http = into_http_response(response);
        assert_eq!(http.headers()[CONTENT_TYPE], "application/xml");
    }

    #[rstest]
    #[case(MockResponse::text(404, "Not Found"), StatusCode::NOT_FOUND, Some(TEXT_CONTENT_TYPE))]
    #[case(MockResponse { status: 204, ..Default::default() }, StatusCode::NO_CONTENT, None)]
    #[case(MockResponse { status: 1000, ..Default::default() }, StatusCode::INTERNAL_SERVER_ERROR, None)]
    fn test_into_http_response_status_and_type(
        #[case] response: MockResponse,
        #[case] status: StatusCode,
        #[case] content_type: Option<&str>,
    ) {
        let http = into_http_response(response);
        assert_eq!(http.status(), status);
        assert_eq!(
            http.headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            content_type
        );
    }
}
