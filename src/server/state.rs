//! Application state shared across handlers.

use std::sync::Arc;

use crate::clients::{HttpClient, HttpError};
use crate::config::ShopifyConfig;

/// Application state shared across all handlers.
///
/// Both fields are read-only after startup and cheap to clone.
#[derive(Clone, Debug)]
pub struct AppState {
    /// App credentials and handshake settings.
    pub config: Arc<ShopifyConfig>,

    /// Pooled outbound client for the handshake and the proxy.
    pub client: HttpClient,
}

impl AppState {
    /// Creates the state and its outbound client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the outbound client cannot be built.
    pub fn new(config: ShopifyConfig) -> Result<Self, HttpError> {
        let client = HttpClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }
}
