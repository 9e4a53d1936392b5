//! OAuth callback validation, code exchange and shop profile fetch.
//!
//! The callback is a linear pipeline; the first failing step ends the
//! request:
//!
//! ```text
//! RECEIVED → STATE_CHECKED → HMAC_VERIFIED → CODE_EXCHANGED → RESOURCE_FETCHED → DONE
//! ```
//!
//! Nothing is retried. A failed exchange or fetch means the merchant has to
//! start the install again from `/shopify`.

use serde::Deserialize;
use std::fmt;

use crate::auth::oauth::error::{OAuthError, UpstreamStep};
use crate::auth::oauth::hmac::validate_hmac;
use crate::auth::oauth::state::StateParam;
use crate::auth::oauth::CallbackQuery;
use crate::clients::HttpClient;
use crate::config::{ShopDomain, ShopifyConfig};

/// Header carrying the access token on Admin API requests.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Request body for the code exchange.
#[derive(serde::Serialize)]
struct TokenExchangeRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}

/// Response body of the code exchange.
#[derive(Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

/// An Admin API access token.
///
/// Lives only for the duration of one callback request. `Debug` is masked so
/// the token cannot end up in logs by accident.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Returns the raw token for use in a request header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(*****)")
    }
}

/// Validates an OAuth callback, exchanges the code and fetches the shop.
///
/// `cookie_state` is the value of the `state` cookie set by `/shopify`.
/// On success the shop profile JSON body is returned byte for byte.
///
/// # Errors
///
/// - [`OAuthError::StateMismatch`]: query `state` and cookie differ or either
///   is missing; no network call has been made
/// - [`OAuthError::MissingParameter`]: `shop`, `hmac` or `code` is missing
/// - [`OAuthError::InvalidHmac`]: the signature does not verify
/// - [`OAuthError::InvalidShop`]: `shop` is not a `*.myshopify.com` domain
/// - [`OAuthError::UpstreamRequestFailed`]: the exchange or the fetch failed
pub async fn validate_auth_callback(
    config: &ShopifyConfig,
    client: &HttpClient,
    query: &CallbackQuery,
    cookie_state: Option<&str>,
) -> Result<Vec<u8>, OAuthError> {
    // RECEIVED → STATE_CHECKED
    check_state(query.state(), cookie_state)?;

    let (Some(shop), Some(_), Some(code)) = (query.shop(), query.hmac(), query.code()) else {
        return Err(OAuthError::MissingParameter {
            message: "Required parameters missing",
        });
    };

    // STATE_CHECKED → HMAC_VERIFIED
    if !validate_hmac(query, config) {
        return Err(OAuthError::InvalidHmac);
    }

    let shop = ShopDomain::new(shop).map_err(|_| OAuthError::InvalidShop {
        shop: shop.to_string(),
    })?;

    // HMAC_VERIFIED → CODE_EXCHANGED
    let token = exchange_code(config, client, &shop, code).await?;

    // CODE_EXCHANGED → RESOURCE_FETCHED
    let profile = fetch_shop(config, client, &shop, &token).await?;

    tracing::info!(shop = %shop, "Install handshake completed");
    Ok(profile)
}

fn check_state(query_state: Option<&str>, cookie_state: Option<&str>) -> Result<(), OAuthError> {
    let cookie_state = cookie_state.filter(|s| !s.is_empty());
    match (query_state, cookie_state) {
        (Some(received), Some(issued)) if StateParam::from_raw(issued).matches(received) => Ok(()),
        (query_state, cookie_state) => Err(OAuthError::StateMismatch {
            query_present: query_state.is_some(),
            cookie_present: cookie_state.is_some(),
        }),
    }
}

/// Exchanges an authorization code for an access token.
///
/// Issues one `POST {origin}/admin/oauth/access_token` with the client id,
/// client secret and code as a JSON body.
///
/// # Errors
///
/// Returns [`OAuthError::UpstreamRequestFailed`] on any failure.
pub async fn exchange_code(
    config: &ShopifyConfig,
    client: &HttpClient,
    shop: &ShopDomain,
    code: &str,
) -> Result<AccessToken, OAuthError> {
    let token_url = format!("{}/admin/oauth/access_token", config.shop_origin(shop));
    tracing::debug!(url = %token_url, "Exchanging authorization code");

    let request_body = TokenExchangeRequest {
        client_id: config.api_key().as_ref(),
        client_secret: config.api_secret_key().as_ref(),
        code,
    };

    let response: AccessTokenResponse = client
        .post_json(&token_url, &request_body)
        .await
        .map_err(|source| OAuthError::UpstreamRequestFailed {
            step: UpstreamStep::CodeExchange,
            source,
        })?;

    Ok(AccessToken(response.access_token))
}

/// Fetches the shop profile with an access token.
///
/// Issues one `GET {origin}/admin/api/{version}/shop.json` authenticated
/// with the `X-Shopify-Access-Token` header. The response body is returned
/// as received once it is known to be JSON.
///
/// # Errors
///
/// Returns [`OAuthError::UpstreamRequestFailed`] on any failure.
pub async fn fetch_shop(
    config: &ShopifyConfig,
    client: &HttpClient,
    shop: &ShopDomain,
    token: &AccessToken,
) -> Result<Vec<u8>, OAuthError> {
    let shop_url = format!(
        "{}{}",
        config.shop_origin(shop),
        config.api_version().shop_resource_path()
    );
    tracing::debug!(url = %shop_url, "Fetching shop resource");

    client
        .get_raw_json(&shop_url, &[(ACCESS_TOKEN_HEADER, token.expose())])
        .await
        .map_err(|source| OAuthError::UpstreamRequestFailed {
            step: UpstreamStep::ResourceFetch,
            source,
        })
}
