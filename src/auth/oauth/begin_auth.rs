//! OAuth authorization URL generation.
//!
//! [`begin_auth`] is the first step of the install handshake. It validates
//! the shop, mints a fresh [`StateParam`] and builds the Shopify authorize
//! URL. It makes no network call; the HTTP layer binds the state to the
//! browser with a cookie and issues the redirect.
//!
//! # Example
//!
//! ```rust
//! use shopify_install_proxy::{ShopifyConfig, ApiKey, ApiSecretKey, HostUrl};
//! use shopify_install_proxy::auth::oauth::begin_auth;
//!
//! let config = ShopifyConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("your-secret").unwrap())
//!     .host(HostUrl::new("https://your-app.com").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let result = begin_auth(&config, Some("example-shop.myshopify.com")).unwrap();
//! assert!(result.auth_url.starts_with("https://example-shop.myshopify.com/admin/oauth/authorize?"));
//! ```

use crate::auth::oauth::error::{OAuthError, MISSING_SHOP_MESSAGE};
use crate::auth::oauth::state::StateParam;
use crate::config::{ShopDomain, ShopifyConfig};

/// Path Shopify redirects back to once the merchant approves the install.
pub const CALLBACK_PATH: &str = "/shopify/callback";

/// Result of initiating the handshake.
#[derive(Clone, Debug)]
pub struct BeginAuthResult {
    /// The Shopify authorize URL to redirect the browser to.
    pub auth_url: String,

    /// The state embedded in `auth_url`; must be stored in the `state`
    /// cookie so the callback can verify it.
    pub state: StateParam,

    /// The validated shop the install is for.
    pub shop: ShopDomain,
}

/// Initiates the install handshake for `shop`.
///
/// The authorize URL carries `client_id`, `scope`, `state` and
/// `redirect_uri` (`{host}/shopify/callback`), each URL-encoded.
///
/// # Errors
///
/// - [`OAuthError::MissingParameter`] if `shop` is `None` or empty
/// - [`OAuthError::InvalidShop`] if `shop` is not a `*.myshopify.com` domain
pub fn begin_auth(config: &ShopifyConfig, shop: Option<&str>) -> Result<BeginAuthResult, OAuthError> {
    let shop = shop
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(OAuthError::MissingParameter {
            message: MISSING_SHOP_MESSAGE,
        })?;
    let shop = ShopDomain::new(shop).map_err(|_| OAuthError::InvalidShop {
        shop: shop.to_string(),
    })?;

    let state = StateParam::new();
    let redirect_uri = config.host().join(CALLBACK_PATH);

    let params = [
        ("client_id", config.api_key().as_ref().to_string()),
        ("scope", config.scopes().to_string()),
        ("state", state.to_string()),
        ("redirect_uri", redirect_uri),
    ];

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let auth_url = format!(
        "https://{}/admin/oauth/authorize?{}",
        shop.as_ref(),
        query_string
    );

    tracing::debug!(shop = %shop, "Built authorization URL");

    Ok(BeginAuthResult {
        auth_url,
        state,
        shop,
    })
}

// Verify BeginAuthResult is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BeginAuthResult>();
};
