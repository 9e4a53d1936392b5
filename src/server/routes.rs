//! Route handlers.

use axum::body::{Body, Bytes};
use axum::extract::{Query, RawQuery, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

use crate::auth::oauth::{begin_auth, validate_auth_callback, CallbackQuery, OAuthError, StateParam};
use crate::proxy::{forward, ForwardRequest, ProxyError};
use crate::server::AppState;

/// Name of the cookie carrying the handshake state.
pub const STATE_COOKIE: &str = "state";

/// Lifetime of the state cookie.
pub const STATE_COOKIE_MAX_AGE: time::Duration = time::Duration::minutes(10);

/// Body of `GET /`.
pub const INDEX_MESSAGE: &str = "Your server is up. Add shop parameter to url to start a install on a shop. eg /shopify?shop=xxx.myshopify.com";

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct InstallParams {
    shop: Option<String>,
}

/// `GET /`
pub async fn index() -> &'static str {
    INDEX_MESSAGE
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /shopify?shop=...`
///
/// Sets the `state` cookie and redirects to the Shopify authorize URL.
pub async fn install(
    State(state): State<AppState>,
    Query(params): Query<InstallParams>,
    jar: CookieJar,
) -> Result<Response, OAuthError> {
    let result = begin_auth(&state.config, params.shop.as_deref())?;
    let secure = state.config.host().scheme() == "https";
    let cookie = state_cookie(&result.state, secure);

    tracing::info!(shop = %result.shop, "Starting install");

    Ok((
        StatusCode::FOUND,
        jar.add(cookie),
        [(header::LOCATION, result.auth_url)],
    )
        .into_response())
}

/// `GET /shopify/callback?...`
///
/// Runs the callback pipeline and returns the shop profile JSON as Shopify
/// sent it. The `state` cookie is cleared once the state check has passed,
/// whatever the later outcome. A mismatched request leaves it in place.
pub async fn callback(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
    jar: CookieJar,
) -> Response {
    let query = CallbackQuery::parse(raw_query.as_deref().unwrap_or_default());
    let cookie_state = jar.get(STATE_COOKIE).map(|cookie| cookie.value());

    let result = validate_auth_callback(&state.config, &state.client, &query, cookie_state).await;

    match result {
        Err(error @ OAuthError::StateMismatch { .. }) => error.into_response(),
        Ok(profile) => (
            clear_state_cookie(jar),
            [(header::CONTENT_TYPE, "application/json")],
            Body::from(profile),
        )
            .into_response(),
        Err(error) => (clear_state_cookie(jar), error).into_response(),
    }
}

fn clear_state_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(STATE_COOKIE).path("/"))
}

/// `ANY /reverse-proxy?url=...`
pub async fn reverse_proxy(
    State(state): State<AppState>,
    method: Method,
    RawQuery(raw_query): RawQuery,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let target = raw_query.as_deref().and_then(|raw| {
        url::form_urlencoded::parse(raw.as_bytes())
            .find(|(key, _)| key == "url")
            .map(|(_, value)| value.into_owned())
    });

    let response = forward(
        &state.client,
        ForwardRequest {
            method,
            target,
            body: body.to_vec(),
        },
    )
    .await?;

    Ok((response.status, response.headers, Body::from(response.body)).into_response())
}

fn state_cookie(state: &StateParam, secure: bool) -> Cookie<'static> {
    Cookie::build((STATE_COOKIE, state.to_string()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(STATE_COOKIE_MAX_AGE)
        .build()
}
