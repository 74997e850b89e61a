//! Checkout page route handler.
//!
//! Lists the purchasable prices. When offering-based filtering is enabled
//! for the session, the price list is reconciled against the entitlement
//! provider's current offering first.

use std::collections::HashSet;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::instrument;

use paywall_core::{Recurring, RecurringInterval, UserIdentity, currency, reconcile};

use crate::error::Result;
use crate::models::session;
use crate::services::CatalogEntry;
use crate::state::AppState;

/// Price display data for templates.
#[derive(Clone)]
pub struct PriceView {
    pub id: String,
    pub product_name: String,
    /// Formatted amount with currency symbol, e.g. `$9.99`.
    pub amount: String,
    /// Billing cadence label, e.g. `per month`.
    pub interval: String,
}

impl From<&CatalogEntry> for PriceView {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            id: entry.price.id.clone(),
            product_name: entry.product.name.clone(),
            amount: format_amount(&entry.price.currency, entry.price.unit_amount),
            interval: interval_label(entry.price.recurring.as_ref()),
        }
    }
}

/// Format a minor-unit amount with its currency symbol.
fn format_amount(currency_code: &str, unit_amount: Option<i64>) -> String {
    let symbol = currency::symbol_or_code(currency_code);
    let cents = unit_amount.unwrap_or_default();
    format!("{symbol}{}.{:02}", cents / 100, cents % 100)
}

/// Human label for a price's billing cadence.
fn interval_label(recurring: Option<&Recurring>) -> String {
    recurring.map_or_else(
        || "one-time".to_string(),
        |r| match (r.interval, r.interval_count) {
            (interval, 1) => format!("per {}", interval_name(interval)),
            (interval, n) => format!("every {n} {}s", interval_name(interval)),
        },
    )
}

const fn interval_name(interval: RecurringInterval) -> &'static str {
    match interval {
        RecurringInterval::Day => "day",
        RecurringInterval::Week => "week",
        RecurringInterval::Month => "month",
        RecurringInterval::Year => "year",
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    /// Prices the current session may purchase.
    pub prices: Vec<PriceView>,
    /// The current session identity.
    pub identity: UserIdentity,
    /// Whether the list was filtered through an offering.
    pub use_offerings: bool,
}

/// Display the checkout page.
#[instrument(skip(state, jar))]
pub async fn checkout_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, CheckoutTemplate)> {
    let (jar, session) = session::resolve(jar, state.config().secure_cookies())?;
    let identity = session.identity;
    let config = session.config;
    let catalog = state.catalog().load().await?;

    let entries = if config.use_offerings {
        let offerings = state.revenuecat().get_offerings(&identity.id).await?;
        offerings.current().map_or_else(Vec::new, |offering| {
            let prices: Vec<_> = catalog.iter().map(|e| e.price.clone()).collect();
            let selected: HashSet<String> = reconcile(&prices, offering)
                .into_iter()
                .map(|p| p.id)
                .collect();

            let mut selectable: Vec<CatalogEntry> = catalog
                .iter()
                .filter(|e| selected.contains(&e.price.id))
                .cloned()
                .collect();
            // Presentation ordering; reconciliation itself is a stable filter.
            selectable.sort_by(|a, b| a.price.product.cmp(&b.price.product));
            selectable
        })
    } else {
        catalog.as_ref().clone()
    };

    Ok((
        jar,
        CheckoutTemplate {
            prices: entries.iter().map(PriceView::from).collect(),
            identity,
            use_offerings: config.use_offerings,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount("usd", Some(999)), "$9.99");
        assert_eq!(format_amount("EUR", Some(4900)), "€49.00");
        assert_eq!(format_amount("xyz", Some(100)), "XYZ1.00");
        assert_eq!(format_amount("usd", None), "$0.00");
    }

    #[test]
    fn test_interval_label() {
        let monthly = Recurring {
            interval: RecurringInterval::Month,
            interval_count: 1,
        };
        let quarterly = Recurring {
            interval: RecurringInterval::Month,
            interval_count: 3,
        };

        assert_eq!(interval_label(Some(&monthly)), "per month");
        assert_eq!(interval_label(Some(&quarterly)), "every 3 months");
        assert_eq!(interval_label(None), "one-time");
    }
}
