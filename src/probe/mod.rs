//! HTTP probe execution.
//!
//! One probe is one request/response exchange against a single target. Every
//! probe is bounded by a fixed 5 second timeout; expiry surfaces as a
//! transport error, never as a status code.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Request};
use thiserror::Error;

/// Fixed per-request timeout bounding every probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Sentinel status recorded when a probe produced no HTTP response.
pub const NO_RESPONSE_STATUS: i32 = -1;

/// Probe error types.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("can't build request {method} {url}: {reason}")]
    Request {
        method: String,
        url: String,
        reason: String,
    },
}

fn request_error(method: &str, url: &str, reason: impl ToString) -> ProbeError {
    ProbeError::Request {
        method: method.to_string(),
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

/// Build the shared probe client with the fixed timeout applied.
pub fn new_client() -> Result<Client, ProbeError> {
    Client::builder()
        .timeout(PROBE_TIMEOUT)
        .build()
        .map_err(|e| ProbeError::Network(e.to_string()))
}

/// Construct a probe request.
///
/// Domain-level default headers are attached first, then the target's content
/// type if non-empty. Insertion is last-wins: a target content type replaces a
/// `Content-Type` supplied by the domain headers.
pub fn build_request(
    client: &Client,
    method: &str,
    url: &str,
    content_type: Option<&str>,
    body: Option<&str>,
    headers: &HashMap<String, String>,
) -> Result<Request, ProbeError> {
    let parsed_method =
        Method::from_bytes(method.as_bytes()).map_err(|e| request_error(method, url, e))?;

    let mut header_map = HeaderMap::new();
    for (name, value) in headers {
        let name: reqwest::header::HeaderName = name
            .parse()
            .map_err(|e| request_error(method, url, format!("header {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| request_error(method, url, format!("header {name}: {e}")))?;
        header_map.insert(name, value);
    }

    if let Some(ct) = content_type.filter(|ct| !ct.is_empty()) {
        let value = HeaderValue::from_str(ct)
            .map_err(|e| request_error(method, url, format!("content type: {e}")))?;
        header_map.insert(CONTENT_TYPE, value);
    }

    let mut builder = client.request(parsed_method, url).headers(header_map);
    if let Some(body) = body {
        builder = builder.body(body.to_string());
    }

    builder.build().map_err(|e| request_error(method, url, e))
}

/// Execute one probe and return the HTTP status code.
///
/// Timeouts and connection failures come back as errors; the caller records
/// them as a [`NO_RESPONSE_STATUS`] result and logs them, never panics.
pub async fn probe(
    client: &Client,
    method: &str,
    url: &str,
    content_type: Option<&str>,
    body: Option<&str>,
    headers: &HashMap<String, String>,
) -> Result<u16, ProbeError> {
    let request = build_request(client, method, url, content_type, body, headers)?;

    let response = client.execute(request).await.map_err(|e| {
        if e.is_timeout() {
            ProbeError::Timeout(PROBE_TIMEOUT)
        } else {
            ProbeError::Network(e.to_string())
        }
    })?;

    Ok(response.status().as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        new_client().unwrap()
    }

    #[test]
    fn test_content_type_wins_over_domain_header() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "text/html".to_string());
        headers.insert("X-Token".to_string(), "abc".to_string());

        let req = build_request(
            &client(),
            "POST",
            "https://example.com/submit",
            Some("application/json"),
            Some("{}"),
            &headers,
        )
        .unwrap();

        assert_eq!(req.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(req.headers()["X-Token"], "abc");
        assert!(req.body().is_some());
    }

    #[test]
    fn test_domain_content_type_kept_without_target_override() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "text/html".to_string());

        let req = build_request(
            &client(),
            "GET",
            "https://example.com/health",
            None,
            None,
            &headers,
        )
        .unwrap();

        assert_eq!(req.headers()[CONTENT_TYPE], "text/html");
        assert!(req.body().is_none());
    }

    #[test]
    fn test_empty_content_type_not_attached() {
        let req = build_request(
            &client(),
            "GET",
            "https://example.com/health",
            Some(""),
            None,
            &HashMap::new(),
        )
        .unwrap();

        assert!(req.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_invalid_method_is_a_request_error() {
        let err = build_request(
            &client(),
            "GE T",
            "https://example.com/",
            None,
            None,
            &HashMap::new(),
        )
        .unwrap_err();

        assert!(matches!(err, ProbeError::Request { .. }));
    }

    #[test]
    fn test_invalid_url_is_a_request_error() {
        let err = build_request(&client(), "GET", "not a url", None, None, &HashMap::new())
            .unwrap_err();

        assert!(matches!(err, ProbeError::Request { .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_a_network_error() {
        // Grab a port the OS considers free, then release it so nothing is
        // listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let url = format!("http://127.0.0.1:{port}/health");
        let err = probe(&client(), "GET", &url, None, None, &HashMap::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ProbeError::Network(_)));
    }
}
