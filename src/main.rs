//! shopify-install-proxy
//!
//! Main entry point: reads configuration from flags and environment, then
//! serves the install handshake and the forwarding proxy.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::prelude::*;

use shopify_install_proxy::config::DEFAULT_UPSTREAM_TIMEOUT;
use shopify_install_proxy::server::{AppState, Server, ServerConfig, DEFAULT_PORT};
use shopify_install_proxy::{
    ApiKey, ApiSecretKey, ApiVersion, AuthScopes, HostUrl, ShopifyConfig,
};

/// Shopify app install handshake and CORS-rewriting forwarding proxy
#[derive(Parser)]
#[command(name = "shopify-install-proxy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Shopify app API key (OAuth client id)
    #[arg(long, env = "SHOPIFY_API_KEY")]
    api_key: String,

    /// Shopify app API secret (OAuth client secret)
    #[arg(long, env = "SHOPIFY_API_SECRET", hide_env_values = true)]
    api_secret: String,

    /// Previous API secret, accepted during a secret rotation
    #[arg(long, env = "SHOPIFY_API_SECRET_OLD", hide_env_values = true)]
    api_secret_old: Option<String>,

    /// Comma-separated access scopes requested on install
    #[arg(long, env = "SHOPIFY_SCOPES", default_value = AuthScopes::DEFAULT)]
    scopes: String,

    /// Admin API version for the shop profile request
    #[arg(long, env = "SHOPIFY_API_VERSION", default_value = ApiVersion::DEFAULT)]
    api_version: String,

    /// Public base URL of this service; Shopify redirects to {host}/shopify/callback
    #[arg(long, env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to bind to
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    bind_addr: IpAddr,

    /// Directory served under /proxy
    #[arg(long, env = "STATIC_DIR", default_value = "./static")]
    static_dir: PathBuf,

    /// Timeout in seconds for every outbound request
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = DEFAULT_UPSTREAM_TIMEOUT.as_secs())]
    upstream_timeout_secs: u64,

    /// Send admin requests to this origin instead of https://{shop} (testing)
    #[arg(long, env = "SHOP_ORIGIN_OVERRIDE")]
    shop_origin_override: Option<String>,

    /// Prefix for the User-Agent of outbound requests
    #[arg(long, env = "USER_AGENT_PREFIX")]
    user_agent_prefix: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn shopify_config(&self) -> Result<ShopifyConfig> {
        let mut builder = ShopifyConfig::builder()
            .api_key(ApiKey::new(&self.api_key).context("Invalid SHOPIFY_API_KEY")?)
            .api_secret_key(
                ApiSecretKey::new(&self.api_secret).context("Invalid SHOPIFY_API_SECRET")?,
            )
            .scopes(
                self.scopes
                    .parse::<AuthScopes>()
                    .context("Invalid SHOPIFY_SCOPES")?,
            )
            .api_version(
                self.api_version
                    .parse::<ApiVersion>()
                    .context("Invalid SHOPIFY_API_VERSION")?,
            )
            .host(HostUrl::new(&self.host).context("Invalid HOST")?)
            .upstream_timeout(Duration::from_secs(self.upstream_timeout_secs));

        if let Some(old) = &self.api_secret_old {
            builder = builder
                .old_api_secret_key(ApiSecretKey::new(old).context("Invalid SHOPIFY_API_SECRET_OLD")?);
        }
        if let Some(origin) = &self.shop_origin_override {
            builder = builder
                .shop_origin(HostUrl::new(origin).context("Invalid SHOP_ORIGIN_OVERRIDE")?);
        }
        if let Some(prefix) = &self.user_agent_prefix {
            builder = builder.user_agent_prefix(prefix);
        }

        Ok(builder.build()?)
    }

    fn server_config(&self) -> ServerConfig {
        ServerConfig::default()
            .with_bind_address(SocketAddr::new(self.bind_addr, self.port))
            .with_static_dir(&self.static_dir)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "shopify_install_proxy=debug,tower_http=debug,info"
    } else {
        "shopify_install_proxy=info,tower_http=info,warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_filter(filter),
        )
        .init();

    let config = cli.shopify_config()?;
    tracing::info!(
        host = %config.host(),
        api_version = %config.api_version(),
        scopes = %config.scopes(),
        "Loaded configuration"
    );

    let state = AppState::new(config).context("Failed to build HTTP client")?;
    Server::new(state, cli.server_config())
        .run(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
