//! OAuth 2.0 authorization code grant for installing the app on a shop.
//!
//! The handshake has two legs:
//!
//! 1. **Authorization Initiation** ([`begin_auth`]): validate the shop, mint a
//!    [`StateParam`] and build the authorize URL the browser is redirected to.
//!
//! 2. **Callback Validation** ([`validate_auth_callback`]): check the echoed
//!    state against the cookie, verify the HMAC signature, exchange the code
//!    for an access token and fetch the shop profile with it.
//!
//! # Security Features
//!
//! - **HMAC Validation**: every callback is verified with HMAC-SHA256 over the
//!   canonical query string
//! - **CSRF Protection**: the state parameter binds the callback to the browser
//!   that started the install
//! - **Constant-Time Comparison**: state and digest comparisons use
//!   [`subtle`]
//! - **Key Rotation Support**: a previous client secret can be configured and
//!   is tried when the current one does not verify
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_install_proxy::auth::oauth::{begin_auth, validate_auth_callback, CallbackQuery};
//!
//! // /shopify?shop=example-shop.myshopify.com
//! let result = begin_auth(&config, Some("example-shop.myshopify.com"))?;
//! // Set the `state` cookie to result.state and redirect to result.auth_url.
//!
//! // /shopify/callback?code=...&hmac=...&shop=...&state=...&timestamp=...
//! let query = CallbackQuery::parse(raw_query);
//! let profile = validate_auth_callback(&config, &client, &query, cookie_state).await?;
//! ```

mod begin_auth;
mod callback_query;
mod error;
pub mod hmac;
mod state;
mod validate_callback;

pub use begin_auth::{begin_auth, BeginAuthResult, CALLBACK_PATH};
pub use callback_query::CallbackQuery;
pub use error::{OAuthError, UpstreamStep, MISSING_SHOP_MESSAGE};
pub use state::StateParam;
pub use validate_callback::{
    exchange_code, fetch_shop, validate_auth_callback, AccessToken, ACCESS_TOKEN_HEADER,
};
