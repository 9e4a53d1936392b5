//! Application configuration.
//!
//! [`ShopifyConfig`] holds the app credentials and the handful of settings
//! the install handshake needs. It is built once at startup and shared
//! read-only (behind an `Arc`) with every request handler; nothing mutates it
//! afterwards.
//!
//! # Example
//!
//! ```rust
//! use shopify_install_proxy::{ShopifyConfig, ApiKey, ApiSecretKey, HostUrl};
//!
//! let config = ShopifyConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("my-secret").unwrap())
//!     .host(HostUrl::new("https://myapp.example.com").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.scopes().to_string(), "read_products");
//! ```

mod newtypes;
mod version;

use std::time::Duration;

pub use newtypes::{ApiKey, ApiSecretKey, HostUrl, ShopDomain};
pub use version::ApiVersion;

use crate::auth::AuthScopes;
use crate::error::ConfigError;

/// Default bound on every outbound request.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the install handshake.
///
/// # Key Rotation
///
/// When `old_api_secret_key` is set, callback HMAC validation falls back to
/// it if the primary key does not match, so installs that started before a
/// secret rotation can still complete.
///
/// # Shop Origin Override
///
/// Outbound calls normally go to `https://{shop}`. Setting `shop_origin`
/// sends them to that origin instead, which is how the handshake is
/// exercised against a local mock of the Shopify admin.
#[derive(Clone, Debug)]
pub struct ShopifyConfig {
    api_key: ApiKey,
    api_secret_key: ApiSecretKey,
    old_api_secret_key: Option<ApiSecretKey>,
    scopes: AuthScopes,
    host: HostUrl,
    api_version: ApiVersion,
    shop_origin: Option<HostUrl>,
    upstream_timeout: Duration,
    user_agent_prefix: Option<String>,
}

impl ShopifyConfig {
    /// Creates a new builder for constructing a `ShopifyConfig`.
    #[must_use]
    pub fn builder() -> ShopifyConfigBuilder {
        ShopifyConfigBuilder::new()
    }

    /// Returns the API key (OAuth client id).
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the API secret key (OAuth client secret).
    #[must_use]
    pub const fn api_secret_key(&self) -> &ApiSecretKey {
        &self.api_secret_key
    }

    /// Returns the previous API secret key, if configured.
    #[must_use]
    pub const fn old_api_secret_key(&self) -> Option<&ApiSecretKey> {
        self.old_api_secret_key.as_ref()
    }

    /// Returns the requested OAuth scopes.
    #[must_use]
    pub const fn scopes(&self) -> &AuthScopes {
        &self.scopes
    }

    /// Returns the externally reachable base URL of this service.
    #[must_use]
    pub const fn host(&self) -> &HostUrl {
        &self.host
    }

    /// Returns the Admin API version used for the shop profile request.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the bound applied to every outbound request.
    #[must_use]
    pub const fn upstream_timeout(&self) -> Duration {
        self.upstream_timeout
    }

    /// Returns the user agent prefix for outbound requests, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the origin that admin requests for `shop` are sent to.
    #[must_use]
    pub fn shop_origin(&self, shop: &ShopDomain) -> String {
        self.shop_origin.as_ref().map_or_else(
            || format!("https://{}", shop.as_ref()),
            |origin| origin.as_ref().to_string(),
        )
    }
}

// Verify ShopifyConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ShopifyConfig>();
};

/// Builder for [`ShopifyConfig`].
///
/// `api_key`, `api_secret_key` and `host` are required.
///
/// # Defaults
///
/// - `scopes`: `read_products`
/// - `api_version`: `2020-01`
/// - `upstream_timeout`: 10 seconds
/// - `old_api_secret_key`, `shop_origin`, `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct ShopifyConfigBuilder {
    api_key: Option<ApiKey>,
    api_secret_key: Option<ApiSecretKey>,
    old_api_secret_key: Option<ApiSecretKey>,
    scopes: Option<AuthScopes>,
    host: Option<HostUrl>,
    api_version: Option<ApiVersion>,
    shop_origin: Option<HostUrl>,
    upstream_timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl ShopifyConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the API secret key (required).
    #[must_use]
    pub fn api_secret_key(mut self, key: ApiSecretKey) -> Self {
        self.api_secret_key = Some(key);
        self
    }

    /// Sets the previous API secret key for key rotation.
    #[must_use]
    pub fn old_api_secret_key(mut self, key: ApiSecretKey) -> Self {
        self.old_api_secret_key = Some(key);
        self
    }

    /// Sets the OAuth scopes.
    #[must_use]
    pub fn scopes(mut self, scopes: AuthScopes) -> Self {
        self.scopes = Some(scopes);
        self
    }

    /// Sets the externally reachable base URL (required).
    #[must_use]
    pub fn host(mut self, host: HostUrl) -> Self {
        self.host = Some(host);
        self
    }

    /// Sets the Admin API version.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Redirects all outbound admin requests to `origin`.
    #[must_use]
    pub fn shop_origin(mut self, origin: HostUrl) -> Self {
        self.shop_origin = Some(origin);
        self
    }

    /// Sets the bound applied to every outbound request.
    #[must_use]
    pub const fn upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = Some(timeout);
        self
    }

    /// Sets the user agent prefix for outbound requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ShopifyConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key`,
    /// `api_secret_key` or `host` are not set.
    pub fn build(self) -> Result<ShopifyConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;
        let api_secret_key = self
            .api_secret_key
            .ok_or(ConfigError::MissingRequiredField {
                field: "api_secret_key",
            })?;
        let host = self
            .host
            .ok_or(ConfigError::MissingRequiredField { field: "host" })?;

        Ok(ShopifyConfig {
            api_key,
            api_secret_key,
            old_api_secret_key: self.old_api_secret_key,
            scopes: self.scopes.unwrap_or_default(),
            host,
            api_version: self.api_version.unwrap_or_default(),
            shop_origin: self.shop_origin,
            upstream_timeout: self.upstream_timeout.unwrap_or(DEFAULT_UPSTREAM_TIMEOUT),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
