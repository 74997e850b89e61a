//! Cached product/price catalog.
//!
//! Products and prices are fetched from the payment provider in parallel,
//! joined by product id, and cached briefly so the checkout page does not
//! hit the vendor on every request.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use paywall_core::Price;

use crate::stripe::{Product, StripeClient, StripeError};

/// How long an assembled catalog stays fresh.
const CATALOG_TTL: Duration = Duration::from_secs(60);

/// Cache key for catalog listings.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum CacheKey {
    Catalog,
}

/// A price with its product resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub price: Price,
    pub product: Product,
}

/// Catalog fetcher with a short-lived in-memory cache.
#[derive(Clone)]
pub struct CatalogService {
    stripe: StripeClient,
    cache: Cache<CacheKey, Arc<Vec<CatalogEntry>>>,
    limit: u8,
}

impl CatalogService {
    /// Create a catalog service over the payment provider client.
    #[must_use]
    pub fn new(stripe: StripeClient, limit: u8) -> Self {
        Self {
            stripe,
            cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(CATALOG_TTL)
                .build(),
            limit,
        }
    }

    /// Load the catalog, serving from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns error if either vendor listing fails.
    pub async fn load(&self) -> Result<Arc<Vec<CatalogEntry>>, StripeError> {
        if let Some(entries) = self.cache.get(&CacheKey::Catalog).await {
            return Ok(entries);
        }

        // Products and prices are independent listings; fetch in parallel.
        let (products, prices) = tokio::try_join!(
            self.stripe.list_products(self.limit),
            self.stripe.list_prices(self.limit),
        )?;

        let entries = Arc::new(attach_products(products, prices));
        self.cache.insert(CacheKey::Catalog, entries.clone()).await;
        Ok(entries)
    }
}

/// Join prices to their products by id.
///
/// Prices whose product is not in the listing are dropped rather than
/// rendered half-resolved or crashed on.
fn attach_products(products: Vec<Product>, prices: Vec<Price>) -> Vec<CatalogEntry> {
    prices
        .into_iter()
        .filter_map(|price| {
            match products.iter().find(|product| product.id == price.product) {
                Some(product) => Some(CatalogEntry {
                    product: product.clone(),
                    price,
                }),
                None => {
                    tracing::warn!(
                        price_id = %price.id,
                        product_id = %price.product,
                        "Dropping price with unresolved product"
                    );
                    None
                }
            }
        })
        .collect()
}
