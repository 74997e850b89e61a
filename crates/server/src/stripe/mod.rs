//! Payment provider REST client (Stripe API).
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`: JSON reads, form-encoded writes
//! - Bearer auth with the secret key set as a default header
//! - Base URL comes from configuration so tests can point at a mock server
//!
//! This server only reads a narrow slice of the vendor objects: price ids,
//! products, recurrence, currency, and the customer/subscription references
//! on checkout sessions.

mod checkout;
pub mod types;

pub use checkout::CheckoutSessionParams;
pub use types::{CheckoutSession, Customer, CustomerDetails, Product};

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use thiserror::Error;

use paywall_core::Price;

use crate::config::StripeConfig;
use types::List;

/// Request timeout for payment provider calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when interacting with the payment provider API.
#[derive(Debug, Error)]
pub enum StripeError {
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

/// Payment provider API client.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    base_url: String,
}

impl StripeClient {
    /// Create a new payment provider API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &StripeConfig) -> Result<Self, StripeError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.secret_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| StripeError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// List products, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    pub async fn list_products(&self, limit: u8) -> Result<Vec<Product>, StripeError> {
        let list: List<Product> = self
            .get_json(&format!("/products?limit={limit}"))
            .await?;
        Ok(list.data)
    }

    /// List prices, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    pub async fn list_prices(&self, limit: u8) -> Result<Vec<Price>, StripeError> {
        let list: List<Price> = self.get_json(&format!("/prices?limit={limit}")).await?;
        Ok(list.data)
    }

    /// List customers, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    pub async fn list_customers(&self, limit: u8) -> Result<Vec<Customer>, StripeError> {
        let list: List<Customer> = self
            .get_json(&format!("/customers?limit={limit}"))
            .await?;
        Ok(list.data)
    }

    /// Retrieve a single customer by id.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    pub async fn retrieve_customer(&self, id: &str) -> Result<Customer, StripeError> {
        self.get_json(&format!("/customers/{}", urlencoding::encode(id)))
            .await
    }

    /// Create a hosted checkout session.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    pub async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> Result<CheckoutSession, StripeError> {
        let url = format!("{}/checkout/sessions", self.base_url);

        let response = self.client.post(&url).form(&params.to_form()).send().await?;
        Self::parse_response(response).await
    }

    /// Retrieve a checkout session after the user returns from hosted checkout.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    pub async fn retrieve_checkout_session(
        &self,
        id: &str,
    ) -> Result<CheckoutSession, StripeError> {
        self.get_json(&format!("/checkout/sessions/{}", urlencoding::encode(id)))
            .await
    }

    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, StripeError> {
        let url = format!("{}{path_and_query}", self.base_url);
        let response = self.client.get(&url).send().await?;
        Self::parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StripeError> {
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| StripeError::Parse(e.to_string()))
    }
}
