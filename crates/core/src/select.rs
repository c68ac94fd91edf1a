//! Best-deal selection over a table of offers.

use crate::offer::{BestDeal, OfferTable, RawOffer};

/// Normalize `offers` and pick the cheapest usable one.
///
/// See [`OfferTable::best_deal`] for the selection rule.
pub fn select_best_deal(offers: &[RawOffer]) -> BestDeal {
    OfferTable::from_raw(offers.iter().cloned()).best_deal()
}

impl OfferTable {
    /// Cheapest row with a price greater than zero.
    ///
    /// Rows without a price and rows priced at zero are skipped. Equal
    /// prices resolve to the earliest row.
    pub fn best_deal(&self) -> BestDeal {
        let mut best: Option<BestDeal> = None;
        for offer in self {
            let Some(price) = offer.price_minor.filter(|p| *p > 0) else {
                continue;
            };
            match best {
                Some(BestDeal::Found { price_minor, .. }) if price_minor <= price => {}
                _ => best = Some(BestDeal::Found { site: offer.site, price_minor: price }),
            }
        }
        best.unwrap_or(BestDeal::NoValidOffer)
    }
}
