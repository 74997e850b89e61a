//! Entitlement provider API object shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use paywall_core::Offering;

/// Wrapper around subscriber payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriberResponse {
    pub subscriber: Subscriber,
}

/// A subscriber record with its active entitlements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub original_app_user_id: String,
    /// Entitlement identifier -> entitlement, ordered for stable rendering.
    #[serde(default)]
    pub entitlements: BTreeMap<String, Entitlement>,
    pub management_url: Option<String>,
}

impl Subscriber {
    /// Fabricate a subscriber with no entitlements.
    ///
    /// The no-code success path renders this instead of calling the
    /// entitlement provider at all.
    #[must_use]
    pub fn empty(app_user_id: impl Into<String>) -> Self {
        Self {
            original_app_user_id: app_user_id.into(),
            entitlements: BTreeMap::new(),
            management_url: None,
        }
    }
}

/// An active entitlement on a subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    pub product_identifier: String,
    pub expires_date: Option<String>,
    pub purchase_date: Option<String>,
}

/// Response of the offerings endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OfferingsResponse {
    pub current_offering_id: Option<String>,
    #[serde(default)]
    pub offerings: Vec<Offering>,
}

impl OfferingsResponse {
    /// The offering marked current, if any.
    ///
    /// Exactly one offering is current per fetch; reconciliation only ever
    /// considers this one.
    #[must_use]
    pub fn current(&self) -> Option<&Offering> {
        let current_id = self.current_offering_id.as_deref()?;
        self.offerings.iter().find(|o| o.identifier == current_id)
    }
}

/// Body of the receipt exchange request.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptBody {
    pub app_user_id: String,
    /// The subscription id created by hosted checkout.
    pub fetch_token: String,
    pub attributes: ReceiptAttributes,
}

/// Subscriber attributes attached to a receipt.
///
/// Reserved attributes use the provider's `$`-prefixed keys and every value
/// is wrapped in a `{ "value": ... }` object on the wire.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReceiptAttributes {
    #[serde(rename = "$displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<AttributeValue>,
    #[serde(rename = "$email", skip_serializing_if = "Option::is_none")]
    pub email: Option<AttributeValue>,
    #[serde(rename = "stripe_customer_id", skip_serializing_if = "Option::is_none")]
    pub stripe_customer_id: Option<AttributeValue>,
}

impl ReceiptAttributes {
    /// Wrap the display name, email, and payment-provider customer id.
    #[must_use]
    pub fn new(
        display_name: Option<String>,
        email: Option<String>,
        stripe_customer_id: Option<String>,
    ) -> Self {
        Self {
            display_name: display_name.map(AttributeValue::from),
            email: email.map(AttributeValue::from),
            stripe_customer_id: stripe_customer_id.map(AttributeValue::from),
        }
    }
}

/// The provider's attribute value wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeValue {
    pub value: String,
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self { value }
    }
}
