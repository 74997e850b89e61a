//! Payment provider API object shapes.
//!
//! Only the fields this server reads are modeled; everything else in the
//! vendor payloads is ignored on deserialization. Prices deserialize directly
//! into [`paywall_core::Price`].

use serde::{Deserialize, Serialize};

/// Wrapper for the provider's list responses.
#[derive(Debug, Deserialize)]
pub struct List<T> {
    pub data: Vec<T>,
}

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

/// A customer record, offered on the configure page for identity selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// A hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Redirect target for the hosted page; present right after creation.
    pub url: Option<String>,
    /// Customer reference, set once checkout completes.
    pub customer: Option<String>,
    pub customer_details: Option<CustomerDetails>,
    /// Subscription created by the checkout, used as the receipt fetch token.
    pub subscription: Option<String>,
}

/// Name and email collected by the hosted checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: Option<String>,
    pub email: Option<String>,
}
