//! Errors for outbound HTTP requests.
//!
//! [`HttpError`] covers every way a single outbound request can fail. The
//! handshake and the forwarding proxy wrap it into their own error types and
//! only ever log its details.
//!
//! # Example
//!
//! ```rust
//! use shopify_install_proxy::clients::HttpError;
//!
//! let error = HttpError::Status { status: 404, body: "Not Found".to_string() };
//! assert!(error.to_string().contains("404"));
//! ```

use thiserror::Error;

/// Error returned by [`HttpClient`](crate::clients::HttpClient).
#[derive(Debug, Error)]
pub enum HttpError {
    /// The URL could not be parsed or does not use `http`/`https`.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Connection, TLS or protocol failure.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("Upstream returned status {status}: {body}")]
    Status {
        /// The HTTP status code returned.
        status: u16,
        /// The response body, for diagnostics.
        body: String,
    },

    /// The response body could not be read or decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for HttpError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Network(error)
        }
    }
}

// Verify HttpError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpError>();
};
