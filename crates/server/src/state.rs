//! Application state shared across handlers.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use secrecy::ExposeSecret;

use crate::config::ServerConfig;
use crate::revenuecat::{RevenueCatClient, RevenueCatError};
use crate::services::CatalogService;
use crate::stripe::{StripeClient, StripeError};

/// Error constructing the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("payment provider client: {0}")]
    Stripe(#[from] StripeError),
    #[error("entitlement provider client: {0}")]
    RevenueCat(#[from] RevenueCatError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the vendor API clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    session_key: Key,
    stripe: StripeClient,
    revenuecat: RevenueCatClient,
    catalog: CatalogService,
}

/// Lets `SignedCookieJar` extract its signing key from the router state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.inner.session_key.clone()
    }
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if either vendor client fails to build.
    pub fn new(config: ServerConfig) -> Result<Self, StateError> {
        // Requires a secret of at least 32 bytes; config validation enforces it.
        let session_key = Key::derive_from(config.session_secret.expose_secret().as_bytes());
        let stripe = StripeClient::new(&config.stripe)?;
        let revenuecat = RevenueCatClient::new(&config.revenuecat)?;
        let catalog = CatalogService::new(stripe.clone(), config.catalog_limit);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                session_key,
                stripe,
                revenuecat,
                catalog,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the payment provider API client.
    #[must_use]
    pub fn stripe(&self) -> &StripeClient {
        &self.inner.stripe
    }

    /// Get a reference to the entitlement provider API client.
    #[must_use]
    pub fn revenuecat(&self) -> &RevenueCatClient {
        &self.inner.revenuecat
    }

    /// Get a reference to the cached product/price catalog.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }
}
