//! Forwarding proxy with rewritten CORS and caching headers.
//!
//! [`forward`] relays one request to an arbitrary `http(s)` URL and returns
//! the upstream body under a fixed header policy:
//!
//! - only headers on [`ALLOWED_UPSTREAM_HEADERS`] are copied from upstream
//! - `X-Powered-By` is never emitted
//! - `Content-Type`, `Access-Control-Allow-Origin`,
//!   `Access-Control-Allow-Headers` and `Cache-Control` are always set
//!
//! The response status is always 200, whatever the upstream answered.
//! Inbound request headers are not forwarded.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_install_proxy::proxy::{forward, ForwardRequest};
//!
//! let response = forward(&client, ForwardRequest {
//!     method: Method::GET,
//!     target: Some("https://cdn.example.com/widget.js".to_string()),
//!     body: Vec::new(),
//! }).await?;
//! ```

mod error;

pub use error::{ProxyError, COULD_NOT_GET_RESOURCE};

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONTENT_TYPE,
};
use reqwest::{Method, StatusCode};

use crate::clients::HttpClient;

/// Upstream headers copied onto the proxied response (lowercase).
pub const ALLOWED_UPSTREAM_HEADERS: &[&str] = &["access-control-allow-methods"];

/// Headers never emitted on a proxied response.
pub const STRIPPED_HEADERS: &[&str] = &["x-powered-by"];

const PROXY_CONTENT_TYPE: &str = "application/javascript";
const PROXY_CACHE_CONTROL: &str = "public, max-age=86400";

/// A request to relay.
#[derive(Clone, Debug)]
pub struct ForwardRequest {
    /// Method to use upstream; same as the inbound request.
    pub method: Method,
    /// The `url` query parameter, if present.
    pub target: Option<String>,
    /// Inbound body; omitted upstream when empty.
    pub body: Vec<u8>,
}

/// The rewritten response.
#[derive(Clone, Debug)]
pub struct ForwardResponse {
    /// Always `200 OK`.
    pub status: StatusCode,
    /// Headers after the policy has been applied.
    pub headers: HeaderMap,
    /// Upstream body, unchanged.
    pub body: Vec<u8>,
}

/// Relays `request` to its target and rewrites the response headers.
///
/// # Errors
///
/// - [`ProxyError::MissingTarget`] if no target URL was given
/// - [`ProxyError::UnsupportedTarget`] if it is not an `http(s)` URL
/// - [`ProxyError::TargetUnreachable`] on network failure, timeout or a
///   body that cannot be read
pub async fn forward(
    client: &HttpClient,
    request: ForwardRequest,
) -> Result<ForwardResponse, ProxyError> {
    let target = request
        .target
        .filter(|t| !t.trim().is_empty())
        .ok_or(ProxyError::MissingTarget)?;

    tracing::debug!(method = %request.method, target = %target, "Forwarding request");

    let response = client.send(request.method, &target, request.body).await?;
    let upstream_status = response.status();
    let headers = rewrite_headers(response.headers());
    let body = response
        .bytes()
        .await
        .map_err(|e| ProxyError::TargetUnreachable(e.into()))?
        .to_vec();

    tracing::debug!(
        target = %target,
        upstream_status = upstream_status.as_u16(),
        bytes = body.len(),
        "Forwarded request"
    );

    Ok(ForwardResponse {
        status: StatusCode::OK,
        headers,
        body,
    })
}

/// Applies the proxy header policy to a set of upstream headers.
#[must_use]
pub fn rewrite_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for name in ALLOWED_UPSTREAM_HEADERS {
        let name = HeaderName::from_static(*name);
        for value in upstream.get_all(&name) {
            headers.append(name.clone(), value.clone());
        }
    }
    for name in STRIPPED_HEADERS {
        headers.remove(*name);
    }

    headers.insert(CONTENT_TYPE, HeaderValue::from_static(PROXY_CONTENT_TYPE));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(PROXY_CACHE_CONTROL));

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpError;
    use std::time::Duration;
    use wiremock::matchers::{body_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> HttpClient {
        HttpClient::with_timeout(Duration::from_secs(5), None).unwrap()
    }

    fn get(target: Option<String>) -> ForwardRequest {
        ForwardRequest {
            method: Method::GET,
            target,
            body: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_forward_rewrites_headers_and_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data.js"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/plain")
                    .insert_header("x-powered-by", "Express")
                    .insert_header("set-cookie", "upstream=1")
                    .insert_header("access-control-allow-methods", "GET, POST")
                    .set_body_string("console.log(1)"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = forward(&client(), get(Some(format!("{}/data.js", server.uri()))))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, b"console.log(1)");
        assert_eq!(response.headers[CONTENT_TYPE], "application/javascript");
        assert_eq!(response.headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response.headers[ACCESS_CONTROL_ALLOW_HEADERS], "*");
        assert_eq!(response.headers[CACHE_CONTROL], "public, max-age=86400");
        assert_eq!(response.headers["access-control-allow-methods"], "GET, POST");
        assert!(response.headers.get("x-powered-by").is_none());
        assert!(response.headers.get("set-cookie").is_none());
    }

    #[tokio::test]
    async fn test_forward_preserves_method_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/echo"))
            .and(body_string("payload"))
            .respond_with(ResponseTemplate::new(201).set_body_string("stored"))
            .expect(1)
            .mount(&server)
            .await;

        let response = forward(
            &client(),
            ForwardRequest {
                method: Method::PUT,
                target: Some(format!("{}/echo", server.uri())),
                body: b"payload".to_vec(),
            },
        )
        .await
        .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, b"stored");
    }

    #[tokio::test]
    async fn test_forward_answers_ok_for_upstream_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
            .mount(&server)
            .await;

        let response = forward(&client(), get(Some(server.uri()))).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, b"nope");
    }

    #[tokio::test]
    async fn test_forward_requires_target() {
        for target in [None, Some(String::new()), Some("  ".to_string())] {
            let result = forward(&client(), get(target)).await;
            assert!(matches!(result, Err(ProxyError::MissingTarget)));
        }
    }

    #[tokio::test]
    async fn test_forward_rejects_non_http_targets() {
        for target in ["file:///etc/passwd", "ftp://example.com/x", "not a url"] {
            let result = forward(&client(), get(Some(target.to_string()))).await;
            assert!(matches!(result, Err(ProxyError::UnsupportedTarget(_))));
        }
    }

    #[tokio::test]
    async fn test_forward_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;
        let client = HttpClient::with_timeout(Duration::from_millis(50), None).unwrap();

        let result = forward(&client, get(Some(server.uri()))).await;

        assert!(matches!(
            result,
            Err(ProxyError::TargetUnreachable(HttpError::Timeout))
        ));
    }

    #[test]
    fn test_rewrite_headers_keeps_every_allowed_value() {
        let mut upstream = HeaderMap::new();
        upstream.append("access-control-allow-methods", HeaderValue::from_static("GET"));
        upstream.append("access-control-allow-methods", HeaderValue::from_static("POST"));
        upstream.insert("x-powered-by", HeaderValue::from_static("PHP"));
        upstream.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));

        let headers = rewrite_headers(&upstream);

        let methods: Vec<_> = headers.get_all("access-control-allow-methods").iter().collect();
        assert_eq!(methods, ["GET", "POST"]);
        assert_eq!(headers[CONTENT_TYPE], "application/javascript");
        assert!(!headers.contains_key("x-powered-by"));
    }
}
