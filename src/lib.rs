//! # Shopify Install Proxy
//!
//! A small web service that installs a Shopify app on a merchant's shop and
//! relays third-party scripts with rewritten CORS and caching headers.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ShopifyConfig`] and [`ShopifyConfigBuilder`]
//! - Validated newtypes for API credentials and domain values
//! - The OAuth 2.0 authorization code handshake via [`auth::oauth`], from the
//!   authorize redirect to the shop profile
//! - A forwarding proxy with a fixed header policy via [`proxy`]
//! - An axum router tying both together via [`server`]
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_install_proxy::{ShopifyConfig, ApiKey, ApiSecretKey, ApiVersion, HostUrl};
//!
//! let config = ShopifyConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("your-api-secret").unwrap())
//!     .host(HostUrl::new("https://your-app.com").unwrap())
//!     .scopes("read_products".parse().unwrap())
//!     .api_version("2020-01".parse::<ApiVersion>().unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Serving
//!
//! ```rust,ignore
//! use shopify_install_proxy::server::{AppState, Server, ServerConfig};
//!
//! let state = AppState::new(config)?;
//! Server::new(state, ServerConfig::default())
//!     .run(shutdown_signal())
//!     .await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration is passed explicitly, never stored globally
//! - **Fail-fast validation**: all newtypes validate on construction
//! - **Thread-safe**: all types are `Send + Sync`
//! - **Nothing persisted**: the access token lives for one callback request

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod proxy;
pub mod server;

// Re-export public types at crate root for convenience
pub use auth::AuthScopes;
pub use config::{
    ApiKey, ApiSecretKey, ApiVersion, HostUrl, ShopDomain, ShopifyConfig, ShopifyConfigBuilder,
};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{HttpClient, HttpError};
