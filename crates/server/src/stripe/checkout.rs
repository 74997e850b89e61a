//! Checkout session request builder.
//!
//! A pure mapping from the selected price and the current session state to
//! the form parameters of the hosted checkout API. Kept free of I/O so the
//! field set can be tested directly.

use paywall_core::{SessionConfig, UserIdentity};

/// Parameters for creating a hosted checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionParams {
    pub price_id: String,
    pub success_url: String,
    pub cancel_url: String,
    /// Known customer to attach, from the session's explicit binding.
    pub customer: Option<String>,
    /// App user id propagated as subscription metadata in no-code mode, so
    /// the entitlement provider can pick the purchase up without a receipt
    /// exchange.
    pub metadata_app_user_id: Option<String>,
}

impl CheckoutSessionParams {
    /// Build checkout parameters for a selected price.
    ///
    /// The success URL carries the provider's session id placeholder so the
    /// success route can look the session back up on return.
    #[must_use]
    pub fn build(
        price_id: impl Into<String>,
        base_url: &str,
        identity: &UserIdentity,
        config: &SessionConfig,
    ) -> Self {
        let base = base_url.trim_end_matches('/');

        Self {
            price_id: price_id.into(),
            success_url: format!("{base}/success?session_id={{CHECKOUT_SESSION_ID}}"),
            cancel_url: format!("{base}/cancel"),
            customer: config.stripe_customer.clone(),
            metadata_app_user_id: config.no_code_mode.then(|| identity.id.clone()),
        }
    }

    /// Flatten into the provider's bracketed form encoding.
    #[must_use]
    pub fn to_form(&self) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("line_items[0][price]", self.price_id.clone()),
            ("line_items[0][quantity]", "1".to_string()),
            ("mode", "subscription".to_string()),
            ("success_url", self.success_url.clone()),
            ("cancel_url", self.cancel_url.clone()),
        ];

        if let Some(customer) = &self.customer {
            form.push(("customer", customer.clone()));
        }

        if let Some(app_user_id) = &self.metadata_app_user_id {
            form.push((
                "subscription_data[metadata][app_user_id]",
                app_user_id.clone(),
            ));
        }

        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> UserIdentity {
        UserIdentity::known("cus_1", Some("jane@example.com".to_string()))
    }

    #[test]
    fn test_build_minimal_params() {
        let params = CheckoutSessionParams::build(
            "price_1",
            "http://localhost:4242",
            &identity(),
            &SessionConfig::default(),
        );

        assert_eq!(
            params.success_url,
            "http://localhost:4242/success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(params.cancel_url, "http://localhost:4242/cancel");
        assert!(params.customer.is_none());
        assert!(params.metadata_app_user_id.is_none());

        let form = params.to_form();
        assert_eq!(form.len(), 5);
        assert!(form.contains(&("line_items[0][price]", "price_1".to_string())));
        assert!(form.contains(&("line_items[0][quantity]", "1".to_string())));
        assert!(form.contains(&("mode", "subscription".to_string())));
    }

    #[test]
    fn test_build_with_customer_binding() {
        let config = SessionConfig {
            stripe_customer: Some("cus_1".to_string()),
            ..SessionConfig::default()
        };
        let params =
            CheckoutSessionParams::build("price_1", "http://localhost:4242/", &identity(), &config);

        assert_eq!(params.customer.as_deref(), Some("cus_1"));
        // Trailing slash on the base must not double up.
        assert_eq!(params.cancel_url, "http://localhost:4242/cancel");
        assert!(params.to_form().contains(&("customer", "cus_1".to_string())));
    }

    #[test]
    fn test_no_code_mode_carries_app_user_id_metadata() {
        let config = SessionConfig {
            no_code_mode: true,
            ..SessionConfig::default()
        };
        let identity = UserIdentity::anonymous();
        let params =
            CheckoutSessionParams::build("price_1", "http://localhost:4242", &identity, &config);

        assert_eq!(params.metadata_app_user_id.as_deref(), Some(identity.id.as_str()));
        assert!(
            params
                .to_form()
                .contains(&("subscription_data[metadata][app_user_id]", identity.id.clone()))
        );
    }
}
