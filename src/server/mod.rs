//! HTTP surface of the install service.
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /` | liveness text |
//! | `GET /health` | JSON status and version |
//! | `GET /shopify?shop=` | start the install handshake |
//! | `GET /shopify/callback` | finish it and return the shop profile |
//! | `ANY /reverse-proxy?url=` | forwarding proxy |
//! | `GET /proxy/*` | static files |
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_install_proxy::server::{AppState, Server, ServerConfig};
//!
//! let state = AppState::new(config)?;
//! Server::new(state, ServerConfig::default())
//!     .run(async { tokio::signal::ctrl_c().await.ok(); })
//!     .await?;
//! ```

mod error;
mod routes;
mod state;

pub use routes::{HealthResponse, INDEX_MESSAGE, STATE_COOKIE};
pub use state::AppState;

use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use axum::routing::{any, get};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::oauth::CALLBACK_PATH;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default directory served under `/proxy`.
pub const DEFAULT_STATIC_DIR: &str = "./static";

/// Listener and static file settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,

    /// Directory served under `/proxy`.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl ServerConfig {
    /// Set the bind address.
    #[must_use]
    pub fn with_bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = addr;
        self
    }

    /// Set the static file directory.
    #[must_use]
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }
}

/// Builds the router with all routes and middleware.
pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/shopify", get(routes::install))
        .route(CALLBACK_PATH, get(routes::callback))
        .route("/reverse-proxy", any(routes::reverse_proxy))
        .nest_service("/proxy", ServeDir::new(static_dir.as_ref()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The install service.
#[derive(Debug)]
pub struct Server {
    state: AppState,
    config: ServerConfig,
}

impl Server {
    /// Create a new server.
    #[must_use]
    pub const fn new(state: AppState, config: ServerConfig) -> Self {
        Self { state, config }
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        router(self.state.clone(), &self.config.static_dir)
    }

    /// Run the server until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the address cannot be bound or the listener
    /// fails.
    pub async fn run<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router();
        let listener = TcpListener::bind(self.config.bind_address).await?;

        tracing::info!(address = %listener.local_addr()?, "Starting server");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
    }

    /// Get the configured bind address.
    #[must_use]
    pub const fn bind_address(&self) -> SocketAddr {
        self.config.bind_address
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiKey, ApiSecretKey, HostUrl, ShopifyConfig};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn create_test_server() -> Server {
        let config = ShopifyConfig::builder()
            .api_key(ApiKey::new("test-api-key").unwrap())
            .api_secret_key(ApiSecretKey::new("test-secret").unwrap())
            .host(HostUrl::new("https://myapp.example.com").unwrap())
            .build()
            .unwrap();
        let static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/static");
        Server::new(
            AppState::new(config).unwrap(),
            ServerConfig::default().with_static_dir(static_dir),
        )
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index() {
        let response = create_test_server()
            .router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, INDEX_MESSAGE);
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = create_test_server()
            .router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let health: HealthResponse = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(health.status, "ok");
    }

    #[tokio::test]
    async fn test_install_redirects_with_found() {
        let response = create_test_server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/shopify?shop=test-shop.myshopify.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("https://test-shop.myshopify.com/admin/oauth/authorize?"));
        assert!(response.headers().contains_key(header::SET_COOKIE));
    }

    #[tokio::test]
    async fn test_static_files_served_under_proxy() {
        let response = create_test_server()
            .router()
            .oneshot(
                Request::builder()
                    .uri("/proxy/loader.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("shopify-install-proxy"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = create_test_server()
            .router()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address.port(), 3000);
        assert!(config.bind_address.ip().is_unspecified());
        assert_eq!(config.static_dir, PathBuf::from("./static"));

        let config = config.with_bind_address("127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.bind_address.port(), 9000);
    }
}
