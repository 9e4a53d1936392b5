//! Validated newtype wrappers for configuration values.
//!
//! Each wrapper validates its contents on construction so that handlers can
//! rely on well-formed credentials and domains without re-checking them.

use crate::error::ConfigError;
use std::fmt;
use url::Url;

/// A validated Shopify API key (the app's OAuth client id).
///
/// # Example
///
/// ```rust
/// use shopify_install_proxy::ApiKey;
///
/// let key = ApiKey::new("my-api-key").unwrap();
/// assert_eq!(key.as_ref(), "my-api-key");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Shopify API secret key (the app's OAuth client secret).
///
/// The `Debug` implementation masks the value so that the configuration can
/// be logged at startup without leaking the secret.
///
/// ```rust
/// use shopify_install_proxy::ApiSecretKey;
///
/// let secret = ApiSecretKey::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "ApiSecretKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiSecretKey(String);

impl ApiSecretKey {
    /// Creates a new validated API secret key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiSecretKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyApiSecretKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiSecretKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiSecretKey(*****)")
    }
}

/// A validated Shopify shop domain.
///
/// Accepts either a bare shop name (`my-store`) or the full
/// `my-store.myshopify.com` form and always stores the full form. Any other
/// host is rejected, which keeps the code exchange (which carries the client
/// secret) pinned to Shopify's own domains.
///
/// ```rust
/// use shopify_install_proxy::ShopDomain;
///
/// let domain = ShopDomain::new("my-store").unwrap();
/// assert_eq!(domain.as_ref(), "my-store.myshopify.com");
///
/// assert!(ShopDomain::new("evil.example.com").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShopDomain {
    full_domain: String,
}

impl ShopDomain {
    const SUFFIX: &'static str = ".myshopify.com";

    /// Creates a new validated shop domain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidShopDomain`] if the domain is invalid.
    pub fn new(domain: impl Into<String>) -> Result<Self, ConfigError> {
        let domain = domain.into().trim().to_lowercase();

        if domain.is_empty() {
            return Err(ConfigError::InvalidShopDomain { domain });
        }

        let (shop_name, full_domain) = match domain.strip_suffix(Self::SUFFIX) {
            Some(shop_name) => (shop_name.to_string(), domain.clone()),
            None if domain.contains('.') => {
                return Err(ConfigError::InvalidShopDomain { domain });
            }
            None => (domain.clone(), format!("{domain}{}", Self::SUFFIX)),
        };

        if !Self::is_valid_shop_name(&shop_name) {
            return Err(ConfigError::InvalidShopDomain {
                domain: full_domain,
            });
        }

        Ok(Self { full_domain })
    }

    // Lowercase letters, digits and hyphens; no leading or trailing hyphen.
    fn is_valid_shop_name(name: &str) -> bool {
        !name.is_empty()
            && !name.starts_with('-')
            && !name.ends_with('-')
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.full_domain
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_domain)
    }
}

/// A validated absolute URL: the externally reachable base of this service,
/// or an origin that outbound shop calls are redirected to.
///
/// Trailing slashes are stripped so that paths can be appended directly.
///
/// ```rust
/// use shopify_install_proxy::HostUrl;
///
/// let url = HostUrl::new("https://myapp.example.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://myapp.example.com");
/// assert_eq!(url.join("/shopify/callback"), "https://myapp.example.com/shopify/callback");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostUrl {
    url: String,
    scheme: String,
}

impl HostUrl {
    /// Creates a new validated host URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHostUrl`] if the value is not an
    /// absolute `http`/`https` URL with a host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = url.into();
        let trimmed = raw.trim().trim_end_matches('/').to_string();
        let invalid = || ConfigError::InvalidHostUrl { url: raw.clone() };

        let parsed = Url::parse(&trimmed).map_err(|_| invalid())?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid());
        }
        if parsed.host_str().is_none() {
            return Err(invalid());
        }

        Ok(Self {
            url: trimmed,
            scheme: parsed.scheme().to_string(),
        })
    }

    /// Returns the lowercase URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Appends an absolute path to this URL.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }
}

impl AsRef<str> for HostUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for HostUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
