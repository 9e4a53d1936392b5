//! Errors produced by the install handshake.
//!
//! Each variant maps to one terminal outcome of the handshake. The message a
//! browser sees is fixed per variant (see [`OAuthError::public_message`]);
//! the `Display` output carries the internal detail and is only ever logged.
//!
//! # Example
//!
//! ```rust
//! use shopify_install_proxy::auth::oauth::OAuthError;
//!
//! let error = OAuthError::InvalidHmac;
//! assert_eq!(error.to_string(), "HMAC signature validation failed");
//! assert_eq!(error.status_code(), 400);
//! ```

use crate::clients::HttpError;
use thiserror::Error;

/// Message returned when `/shopify` is called without a shop.
pub const MISSING_SHOP_MESSAGE: &str =
    "Missing shop parameter. Please add ?shop=your-development-shop.myshopify.com to your request";

/// Errors that can occur during the install handshake.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// A required query parameter was absent or empty.
    #[error("Missing parameter: {message}")]
    MissingParameter {
        /// The message shown to the caller.
        message: &'static str,
    },

    /// The shop parameter is not a `*.myshopify.com` domain.
    #[error("Invalid shop domain: {shop}")]
    InvalidShop {
        /// The rejected value.
        shop: String,
    },

    /// The callback's `state` does not match the `state` cookie.
    ///
    /// Values are not included.
    #[error("State parameter mismatch (query present: {query_present}, cookie present: {cookie_present})")]
    StateMismatch {
        /// Whether the callback carried a `state` parameter.
        query_present: bool,
        /// Whether the request carried a `state` cookie.
        cookie_present: bool,
    },

    /// HMAC signature validation failed.
    #[error("HMAC signature validation failed")]
    InvalidHmac,

    /// The code exchange or the shop profile request failed.
    #[error("{step} failed: {source}")]
    UpstreamRequestFailed {
        /// Which outbound step failed.
        step: UpstreamStep,
        /// The underlying HTTP failure.
        #[source]
        source: HttpError,
    },
}

/// The outbound calls made by the callback, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpstreamStep {
    /// `POST /admin/oauth/access_token`.
    CodeExchange,
    /// `GET /admin/api/{version}/shop.json`.
    ResourceFetch,
}

impl std::fmt::Display for UpstreamStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CodeExchange => f.write_str("Access token exchange"),
            Self::ResourceFetch => f.write_str("Shop resource fetch"),
        }
    }
}

impl OAuthError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::MissingParameter { .. } | Self::InvalidShop { .. } | Self::InvalidHmac => 400,
            Self::StateMismatch { .. } => 403,
            Self::UpstreamRequestFailed { .. } => 500,
        }
    }

    /// Returns the fixed, caller-facing message for this error.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::MissingParameter { message } => message,
            Self::InvalidShop { .. } => {
                "Invalid shop parameter. Expected your-development-shop.myshopify.com"
            }
            Self::StateMismatch { .. } => "Request origin cannot be verified",
            Self::InvalidHmac => "HMAC validation failed",
            Self::UpstreamRequestFailed { .. } => "Unexpected Error. See server logs for details.",
        }
    }
}

// Verify OAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
};
