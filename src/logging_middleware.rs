// src/logging_middleware.rs
//! Middleware for logging request and response bodies in debug mode

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{debug, Level};

/// Bodies larger than this are not buffered for logging
const MAX_LOGGED_BODY_BYTES: usize = 64 * 1024;

/// Log JSON request and response bodies at DEBUG.
///
/// Multipart uploads and large bodies pass through untouched.
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    if !tracing::enabled!(Level::DEBUG) || !is_loggable(request.headers()) {
        return Ok(next.run(request).await);
    }

    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_LOGGED_BODY_BYTES)
        .await
        .map_err(|_| StatusCode::PAYLOAD_TOO_LARGE)?;

    if let Some(body) = render_body(&bytes) {
        debug!(method = %parts.method, uri = %parts.uri, request_body = %body, "📥 Request");
    }

    let response = next.run(Request::from_parts(parts, Body::from(bytes))).await;

    if !is_loggable(response.headers()) {
        return Ok(response);
    }

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if let Some(body) = render_body(&bytes) {
        debug!(status = %parts.status, response_body = %body, "📤 Response");
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}

fn is_loggable(headers: &HeaderMap) -> bool {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if content_type.starts_with("multipart/") {
        return false;
    }

    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .map_or(true, |len| len <= MAX_LOGGED_BODY_BYTES)
}

/// Pretty JSON when possible, raw UTF-8 otherwise
fn render_body(bytes: &Bytes) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }
    let text = std::str::from_utf8(bytes).ok()?;
    Some(
        serde_json::from_str::<serde_json::Value>(text)
            .ok()
            .and_then(|json| serde_json::to_string_pretty(&json).ok())
            .unwrap_or_else(|| text.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_multipart_is_not_logged() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=x"),
        );
        assert!(!is_loggable(&headers));
    }

    #[test]
    fn test_large_body_is_not_logged() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("10000000"));
        assert!(!is_loggable(&headers));

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("120"));
        assert!(is_loggable(&headers));
    }

    #[test]
    fn test_render_body() {
        assert_eq!(render_body(&Bytes::new()), None);
        assert_eq!(
            render_body(&Bytes::from_static(br#"{"a":1}"#)).unwrap(),
            "{\n  \"a\": 1\n}"
        );
        assert_eq!(render_body(&Bytes::from_static(b"plain")).unwrap(), "plain");
        assert_eq!(render_body(&Bytes::from_static(&[0xff, 0xfe])), None);
    }
}
