//! Offer records produced by site adapters and consumed by aggregation.
//!
//! Missing fields are `None` from the adapter boundary onward. The
//! [`NOT_AVAILABLE`] literal only shows up when a table is rendered or
//! written to a sink.

use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::normalize::normalize_price;

/// Text shown in place of a field no adapter could extract.
pub const NOT_AVAILABLE: &str = "N/A";

/// Storefronts covered by a search, in fixed priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Site {
    Amazon,
    Flipkart,
    Myntra,
}

impl Site {
    /// Every site in invocation order. Ties in best-deal selection go to
    /// the earlier entry.
    pub const ALL: [Site; 3] = [Site::Amazon, Site::Flipkart, Site::Myntra];

    /// Display name, also used as the persisted `Website` column.
    pub fn name(&self) -> &'static str {
        match self {
            Site::Amazon => "Amazon",
            Site::Flipkart => "Flipkart",
            Site::Myntra => "Myntra",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unprocessed result of one adapter call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RawOffer {
    pub site: Site,
    /// Price text as shown on the page, currency symbol and separators included.
    pub price: Option<String>,
    /// Review or rating text, free-form.
    pub review: Option<String>,
}

impl RawOffer {
    pub fn new(site: Site, price: Option<String>, review: Option<String>) -> Self {
        Self { site, price, review }
    }

    /// An offer with nothing extracted, used whenever an adapter fails.
    pub fn unavailable(site: Site) -> Self {
        Self { site, price: None, review: None }
    }

    pub fn is_unavailable(&self) -> bool {
        self.price.is_none() && self.review.is_none()
    }

    pub fn price_text(&self) -> &str {
        self.price.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn review_text(&self) -> &str {
        self.review.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

/// A [`RawOffer`] with its price reduced to a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NormalizedOffer {
    pub site: Site,
    pub raw_price: Option<String>,
    /// Price in the smallest currency unit the page shows. `None` when the
    /// raw text had no digits; a parsed zero stays `Some(0)`.
    pub price_minor: Option<u64>,
    pub review: Option<String>,
}

impl From<RawOffer> for NormalizedOffer {
    fn from(raw: RawOffer) -> Self {
        let price_minor = raw.price.as_deref().and_then(normalize_price);
        Self { site: raw.site, raw_price: raw.price, price_minor, review: raw.review }
    }
}

impl NormalizedOffer {
    pub fn price_text(&self) -> &str {
        self.raw_price.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn review_text(&self) -> &str {
        self.review.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

/// Normalized offers in adapter invocation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct OfferTable {
    rows: Vec<NormalizedOffer>,
}

impl OfferTable {
    pub fn from_raw(offers: impl IntoIterator<Item = RawOffer>) -> Self {
        Self { rows: offers.into_iter().map(NormalizedOffer::from).collect() }
    }

    pub fn rows(&self) -> &[NormalizedOffer] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedOffer> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> IntoIterator for &'a OfferTable {
    type Item = &'a NormalizedOffer;
    type IntoIter = std::slice::Iter<'a, NormalizedOffer>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Outcome of best-deal selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BestDeal {
    Found { site: Site, price_minor: u64 },
    NoValidOffer,
}

impl BestDeal {
    pub fn site(&self) -> Option<Site> {
        match self {
            BestDeal::Found { site, .. } => Some(*site),
            BestDeal::NoValidOffer => None,
        }
    }

    pub fn price_minor(&self) -> Option<u64> {
        match self {
            BestDeal::Found { price_minor, .. } => Some(*price_minor),
            BestDeal::NoValidOffer => None,
        }
    }
}

impl fmt::Display for BestDeal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BestDeal::Found { site, price_minor } => {
                write!(f, "Website with the lowest price: {site} - ₹{price_minor}")
            }
            BestDeal::NoValidOffer => f.write_str("No valid prices found."),
        }
    }
}

/// Everything one search produced.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchReport {
    /// The query as submitted, trimmed.
    pub query: String,
    pub offers: OfferTable,
    pub best_deal: BestDeal,
    pub searched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_order_and_names() {
        let names: Vec<_> = Site::ALL.iter().map(Site::name).collect();
        assert_eq!(names, ["Amazon", "Flipkart", "Myntra"]);
    }

    #[test]
    fn test_unavailable_offer_renders_sentinel() {
        let offer = RawOffer::unavailable(Site::Myntra);
        assert!(offer.is_unavailable());
        assert_eq!(offer.price_text(), "N/A");
        assert_eq!(offer.review_text(), "N/A");
    }

    #[test]
    fn test_normalized_offer_keeps_raw_text() {
        let raw = RawOffer::new(Site::Amazon, Some("₹1,299".into()), Some("4.2 out of 5 stars".into()));
        let normalized = NormalizedOffer::from(raw);
        assert_eq!(normalized.price_minor, Some(1299));
        assert_eq!(normalized.price_text(), "₹1,299");
        assert_eq!(normalized.review_text(), "4.2 out of 5 stars");
    }

    #[test]
    fn test_normalized_offer_zero_is_not_absent() {
        let normalized = NormalizedOffer::from(RawOffer::new(Site::Flipkart, Some("₹0".into()), None));
        assert_eq!(normalized.price_minor, Some(0));

        let missing = NormalizedOffer::from(RawOffer::new(Site::Flipkart, Some("N/A".into()), None));
        assert_eq!(missing.price_minor, None);
    }

    #[test]
    fn test_table_preserves_insertion_order() {
        let table = OfferTable::from_raw([
            RawOffer::unavailable(Site::Myntra),
            RawOffer::unavailable(Site::Amazon),
        ]);
        let sites: Vec<_> = table.iter().map(|o| o.site).collect();
        assert_eq!(sites, [Site::Myntra, Site::Amazon]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_best_deal_display() {
        let found = BestDeal::Found { site: Site::Flipkart, price_minor: 999 };
        assert_eq!(found.to_string(), "Website with the lowest price: Flipkart - ₹999");
        assert_eq!(BestDeal::NoValidOffer.to_string(), "No valid prices found.");
    }

    #[test]
    fn test_best_deal_serialization() {
        let json = serde_json::to_string(&BestDeal::NoValidOffer).unwrap();
        assert_eq!(json, r#"{"status":"no_valid_offer"}"#);

        let json = serde_json::to_string(&BestDeal::Found { site: Site::Amazon, price_minor: 45 }).unwrap();
        assert!(json.contains(r#""status":"found""#));
        assert!(json.contains(r#""site":"Amazon""#));
    }
}
