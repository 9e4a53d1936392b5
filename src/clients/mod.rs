//! Outbound HTTP layer.
//!
//! - [`HttpClient`]: pooled client with a bounded timeout, used for the code
//!   exchange, the shop profile request and the forwarding proxy
//! - [`HttpError`]: every way a single outbound request can fail
//!
//! Nothing in this module retries; a failed request is reported once and the
//! caller decides what to do with it.

mod errors;
mod http_client;

pub use errors::HttpError;
pub use http_client::{parse_http_url, HttpClient, SDK_VERSION};
