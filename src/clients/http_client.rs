//! Outbound HTTP client.
//!
//! [`HttpClient`] wraps a pooled `reqwest::Client` configured with a bounded
//! timeout and a descriptive `User-Agent`. It is cheap to clone and shared by
//! all request handlers.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::Method;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::clients::errors::HttpError;
use crate::config::ShopifyConfig;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for the code exchange, the shop profile request and the
/// forwarding proxy.
///
/// No retries are performed: every call issues exactly one request.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a client using the timeout and user agent prefix from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the TLS backend cannot be initialised.
    pub fn new(config: &ShopifyConfig) -> Result<Self, HttpError> {
        Self::with_timeout(config.upstream_timeout(), config.user_agent_prefix())
    }

    /// Creates a client with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the TLS backend cannot be initialised.
    pub fn with_timeout(
        timeout: Duration,
        user_agent_prefix: Option<&str>,
    ) -> Result<Self, HttpError> {
        let user_agent_prefix = user_agent_prefix.map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}shopify-install-proxy v{SDK_VERSION}");

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(HttpError::Network)?;

        Ok(Self { client })
    }

    /// POSTs `body` as JSON and decodes a JSON response.
    ///
    /// # Errors
    ///
    /// Returns an [`HttpError`] on network failure, timeout, non-2xx status
    /// or an undecodable body.
    pub async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R, HttpError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = parse_http_url(url)?;
        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        decode_json(response).await
    }

    /// GETs `url` with extra headers and returns the JSON body unchanged.
    ///
    /// The body is checked to be well-formed JSON but is not re-encoded, so
    /// key order and number text are those the server sent.
    ///
    /// # Errors
    ///
    /// Returns an [`HttpError`] on network failure, timeout, non-2xx status
    /// or a body that is not JSON.
    pub async fn get_raw_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>, HttpError> {
        let url = parse_http_url(url)?;
        let mut header_map = HeaderMap::new();
        header_map.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| HttpError::Decode(format!("invalid header name: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| HttpError::Decode(format!("invalid header value: {e}")))?;
            header_map.insert(name, value);
        }

        let response = self.client.get(url).headers(header_map).send().await?;
        let body = success_body(response).await?;
        serde_json::from_slice::<IgnoredAny>(&body).map_err(|e| HttpError::Decode(e.to_string()))?;
        Ok(body)
    }

    /// Sends a request with the given method and body and returns the raw
    /// response, whatever its status.
    ///
    /// No headers besides the client defaults are sent. An empty body is
    /// omitted entirely.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidUrl`] for non-`http(s)` targets, otherwise
    /// an [`HttpError`] on network failure or timeout.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        body: Vec<u8>,
    ) -> Result<reqwest::Response, HttpError> {
        let url = parse_http_url(url)?;
        let mut request = self.client.request(method, url);
        if !body.is_empty() {
            request = request.body(body);
        }
        Ok(request.send().await?)
    }
}

/// Parses `raw` as an absolute `http` or `https` URL.
///
/// # Errors
///
/// Returns [`HttpError::InvalidUrl`] otherwise.
pub fn parse_http_url(raw: &str) -> Result<Url, HttpError> {
    let url = Url::parse(raw).map_err(|e| HttpError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(HttpError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

async fn decode_json<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, HttpError> {
    let body = success_body(response).await?;
    serde_json::from_slice(&body).map_err(|e| HttpError::Decode(e.to_string()))
}

async fn success_body(response: reqwest::Response) -> Result<Vec<u8>, HttpError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(HttpError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.bytes().await?.to_vec())
}
