//! Offerings, packages, and price reconciliation.
//!
//! An offering is a named bundle of abstract packages defined by the
//! entitlement provider; each package names a platform product. Reconciliation
//! computes which concrete prices are selectable under an offering by joining
//! on `<duration tag>/<product id>` composite keys.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::Price;

/// Namespace prefix on the entitlement provider's default package identifiers.
const PACKAGE_NAMESPACE_PREFIX: &str = "$rc_";

/// An abstract subscription tier within an offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Package identifier, e.g. `$rc_monthly` or a custom name.
    pub identifier: String,
    /// Product id on the payments platform this package sells.
    pub platform_product_identifier: String,
}

impl Package {
    /// Package identifier with the offering namespace prefix stripped.
    #[must_use]
    pub fn duration_key(&self) -> &str {
        self.identifier
            .strip_prefix(PACKAGE_NAMESPACE_PREFIX)
            .unwrap_or(&self.identifier)
    }

    /// Composite key used to match this package against prices.
    #[must_use]
    pub fn composite_key(&self) -> String {
        format!("{}/{}", self.duration_key(), self.platform_product_identifier)
    }
}

/// A named bundle of packages presented to an end-user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offering {
    pub identifier: String,
    #[serde(default)]
    pub packages: Vec<Package>,
}

/// Select the prices that correspond to the offering's packages.
///
/// A price matches when its `<duration tag>/<product id>` key appears in the
/// offering's package key set. Prices without a defined duration tag never
/// match. The result is a stable filter of the input: order is preserved and
/// every returned price comes from `prices`.
#[must_use]
pub fn reconcile(prices: &[Price], offering: &Offering) -> Vec<Price> {
    let wanted: HashSet<String> = offering
        .packages
        .iter()
        .map(Package::composite_key)
        .collect();

    prices
        .iter()
        .filter(|price| {
            price
                .duration()
                .is_some_and(|tag| wanted.contains(&format!("{tag}/{}", price.product)))
        })
        .cloned()
        .collect()
}
