//! Myntra adapter.
//!
//! After the results marker wait, price and rating are read with a single
//! non-waiting lookup each. Whatever is absent at that instant stays absent.

use dealscout_core::{RawOffer, Site};
use percent_encoding::utf8_percent_encode;
use url::Url;

use super::{AdapterTimeouts, COMPONENT, SiteAdapter};
use crate::locator::{Locator, read_now};
use crate::session::{PageSession, SessionError};

pub(crate) const READY: Locator = Locator::xpath(r#"(//li[contains(@class, "product-base")])[1]"#);
pub(crate) const PRICE: Locator = Locator::xpath(r#"(//span[contains(@class, "product-discountedPrice")])[1]"#);
pub(crate) const RATING: Locator = Locator::xpath(r#"(//div[contains(@class, "product-ratingsContainer")])[1]"#);

pub struct Myntra;

#[async_trait::async_trait]
impl SiteAdapter for Myntra {
    fn site(&self) -> Site {
        Site::Myntra
    }

    /// The query is the path; words are joined with `-`.
    fn search_url(&self, query: &str) -> Result<Url, url::ParseError> {
        let slug = query.split_whitespace().collect::<Vec<_>>().join("-");
        Url::parse(&format!("https://www.myntra.com/{}", utf8_percent_encode(&slug, COMPONENT)))
    }

    fn ready_marker(&self) -> Locator {
        READY
    }

    async fn extract<S: PageSession>(&self, session: &S, _timeouts: &AdapterTimeouts) -> Result<RawOffer, SessionError> {
        let price = read_now(session, &PRICE).await?;
        let rating = read_now(session, &RATING).await?;
        Ok(RawOffer::new(Site::Myntra, price, rating))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{FixturePage, FixtureSession, Lookup};
    use std::time::Duration;

    #[test]
    fn test_search_url_uses_dashes() {
        let url = Myntra.search_url("running shoes").unwrap();
        assert_eq!(url.as_str(), "https://www.myntra.com/running-shoes");
    }

    #[test]
    fn test_search_url_collapses_whitespace_and_escapes() {
        let url = Myntra.search_url("  men's   t shirt ").unwrap();
        assert_eq!(url.as_str(), "https://www.myntra.com/men%27s-t-shirt");
    }

    #[tokio::test]
    async fn test_extract_both_fields() {
        let page = FixturePage::new()
            .element(READY.selector, "")
            .element(PRICE.selector, "Rs. 1499")
            .element(RATING.selector, "4.2 | 3.1k");
        let session = FixtureSession::new([("www.myntra.com", page)]);

        let offer = Myntra.fetch_offer("running shoes", &session, &AdapterTimeouts::default()).await;

        assert_eq!(offer.price.as_deref(), Some("Rs. 1499"));
        assert_eq!(offer.review.as_deref(), Some("4.2 | 3.1k"));
    }

    #[tokio::test]
    async fn test_absent_rating_only_drops_rating() {
        let page = FixturePage::new().element(PRICE.selector, "Rs. 1499");
        let session = FixtureSession::new([("www.myntra.com", page)]);
        let timeouts = AdapterTimeouts { ready: Duration::from_millis(7_000), locator: Duration::from_millis(3_000) };

        let offer = Myntra.fetch_offer("running shoes", &session, &timeouts).await;

        assert_eq!(offer.price.as_deref(), Some("Rs. 1499"));
        assert_eq!(offer.review, None);
        assert_eq!(
            session.lookups(),
            vec![
                Lookup::wait(READY.selector, timeouts.ready),
                Lookup::find(PRICE.selector),
                Lookup::find(RATING.selector),
            ]
        );
    }
}
