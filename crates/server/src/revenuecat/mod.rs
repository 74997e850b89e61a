//! Entitlement provider REST client (RevenueCat API).
//!
//! # Architecture
//!
//! - JSON REST over `reqwest`, bearer auth with the public API key
//! - `X-Platform: stripe` identifies the payment platform on every call
//! - Base URL comes from configuration so tests can point at a mock server
//!
//! The receipt exchange (`POST /receipts`) is what associates a completed
//! hosted checkout with an app user; offerings drive which prices the
//! checkout page shows.

pub mod types;

pub use types::{
    Entitlement, OfferingsResponse, ReceiptAttributes, ReceiptBody, Subscriber,
    SubscriberResponse,
};

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::RevenueCatConfig;

/// Request timeout for entitlement provider calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when interacting with the entitlement provider API.
#[derive(Debug, Error)]
pub enum RevenueCatError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Entitlement provider API client.
#[derive(Clone)]
pub struct RevenueCatClient {
    client: reqwest::Client,
    base_url: String,
}

impl RevenueCatClient {
    /// Create a new entitlement provider API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &RevenueCatConfig) -> Result<Self, RevenueCatError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.public_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| RevenueCatError::Parse(format!("Invalid API key format: {e}")))?,
        );

        // Receipts posted here always come from the hosted checkout flow.
        headers.insert("X-Platform", HeaderValue::from_static("stripe"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the subscriber record for an app user.
    ///
    /// The provider creates the subscriber on first lookup, so this succeeds
    /// for brand-new anonymous identities too.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    pub async fn get_subscriber(&self, app_user_id: &str) -> Result<Subscriber, RevenueCatError> {
        let response: SubscriberResponse = self
            .get_json(&format!(
                "/subscribers/{}",
                urlencoding::encode(app_user_id)
            ))
            .await?;
        Ok(response.subscriber)
    }

    /// Fetch the offerings configured for an app user.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    pub async fn get_offerings(
        &self,
        app_user_id: &str,
    ) -> Result<OfferingsResponse, RevenueCatError> {
        self.get_json(&format!(
            "/subscribers/{}/offerings",
            urlencoding::encode(app_user_id)
        ))
        .await
    }

    /// Exchange a completed purchase for an entitlement receipt.
    ///
    /// Returns the updated subscriber so callers can render entitlements
    /// without a second lookup.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    pub async fn post_receipt(&self, body: &ReceiptBody) -> Result<Subscriber, RevenueCatError> {
        let url = format!("{}/receipts", self.base_url);

        let response = self.client.post(&url).json(body).send().await?;
        let response: SubscriberResponse = Self::parse_response(response).await?;
        Ok(response.subscriber)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RevenueCatError> {
        let url = format!("{}{path}", self.base_url);
        let response = self.client.get(&url).send().await?;
        Self::parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RevenueCatError> {
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RevenueCatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| RevenueCatError::Parse(e.to_string()))
    }
}
