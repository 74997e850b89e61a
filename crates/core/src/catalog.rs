//! Price objects and billing-interval classification.
//!
//! [`Price`] mirrors the payment provider's wire shape so the server crate
//! can deserialize API responses straight into it. [`PackageDuration`] is the
//! normalized duration tag used to match prices against offering packages.

use serde::{Deserialize, Serialize};

/// Billing interval of a recurring price.
///
/// `Day` exists because the payment provider can emit it; it never maps to a
/// package duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringInterval {
    Day,
    Week,
    Month,
    Year,
}

/// Recurrence of a price: interval plus how many intervals per billing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurring {
    pub interval: RecurringInterval,
    pub interval_count: u32,
}

/// A purchasable price, as returned by the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub id: String,
    /// Id of the product this price belongs to.
    pub product: String,
    /// ISO 4217 currency code, lowercase on the wire.
    pub currency: String,
    /// Amount in the smallest currency unit (e.g. cents).
    pub unit_amount: Option<i64>,
    pub nickname: Option<String>,
    /// `None` for one-time prices.
    pub recurring: Option<Recurring>,
}

impl Price {
    /// Normalized duration tag for this price, `None` when the
    /// interval/count combination has no defined tag.
    #[must_use]
    pub fn duration(&self) -> Option<PackageDuration> {
        PackageDuration::classify(self.recurring.as_ref())
    }
}

/// Normalized package duration tags.
///
/// These match the package identifiers the entitlement provider uses once
/// the offering namespace prefix is stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageDuration {
    Weekly,
    Monthly,
    Annual,
    ThreeMonth,
    SixMonth,
    Lifetime,
}

impl PackageDuration {
    /// Classify a price's recurrence into a duration tag.
    ///
    /// One-time prices are `Lifetime`. Three- and six-month cycles get their
    /// own tags; every other interval maps directly when billed once per
    /// interval. Combinations outside that set (bi-weekly, biennial,
    /// day-based) have no tag and are rejected rather than matched lossily.
    #[must_use]
    pub fn classify(recurring: Option<&Recurring>) -> Option<Self> {
        let Some(recurring) = recurring else {
            return Some(Self::Lifetime);
        };

        match (recurring.interval, recurring.interval_count) {
            (RecurringInterval::Month, 3) => Some(Self::ThreeMonth),
            (RecurringInterval::Month, 6) => Some(Self::SixMonth),
            (RecurringInterval::Week, 1) => Some(Self::Weekly),
            (RecurringInterval::Month, 1) => Some(Self::Monthly),
            (RecurringInterval::Year, 1) => Some(Self::Annual),
            _ => None,
        }
    }

    /// The tag as it appears in package identifiers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Annual => "annual",
            Self::ThreeMonth => "three_month",
            Self::SixMonth => "six_month",
            Self::Lifetime => "lifetime",
        }
    }
}

impl std::fmt::Display for PackageDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
