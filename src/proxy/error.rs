//! Errors produced by the forwarding proxy.

use crate::clients::HttpError;
use thiserror::Error;

/// Message returned to the caller for every proxy failure.
pub const COULD_NOT_GET_RESOURCE: &str = "Could not get resource";

/// Errors that can occur while forwarding a request.
///
/// Every variant is answered with a 500 and [`COULD_NOT_GET_RESOURCE`]; the
/// `Display` output is for the server log only.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The request carried no `url` parameter.
    #[error("Missing url parameter")]
    MissingTarget,

    /// The target is not an absolute `http` or `https` URL.
    #[error("Unsupported proxy target: {0}")]
    UnsupportedTarget(#[source] HttpError),

    /// The target could not be reached or its body could not be read.
    #[error("Proxy target unreachable: {0}")]
    TargetUnreachable(#[source] HttpError),
}

impl ProxyError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        500
    }

    /// Returns the fixed, caller-facing message for this error.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        COULD_NOT_GET_RESOURCE
    }
}

impl From<HttpError> for ProxyError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::InvalidUrl { .. } => Self::UnsupportedTarget(error),
            other => Self::TargetUnreachable(other),
        }
    }
}
