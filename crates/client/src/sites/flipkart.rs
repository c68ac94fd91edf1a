//! Flipkart adapter.
//!
//! Flipkart rotates its generated class names, so the price is looked up
//! through a chain of old and new layouts before falling back to any
//! element showing a rupee sign.

use dealscout_core::{RawOffer, Site};
use percent_encoding::utf8_percent_encode;
use url::Url;

use super::{AdapterTimeouts, COMPONENT, SiteAdapter};
use crate::locator::{Locator, resolve_text};
use crate::session::{PageSession, SessionError};

pub(crate) const READY: Locator = Locator::xpath(r#"(//div[contains(@class, "_1AtVbE")])[2]"#);

pub(crate) const PRICE: &[Locator] = &[
    // pre-2024 product cards
    Locator::xpath(r#"(//div[contains(@class, "_30jeq3")])[1]"#),
    Locator::xpath(r#"(//div[contains(@class, "Nx9bqj")])[1]"#),
    Locator::xpath(r#"//*[contains(text(), "₹")][1]"#),
];

pub(crate) const REVIEW: &[Locator] = &[Locator::xpath(r#"(//span[contains(@class, "_2_R_DZ")])[1]"#)];

pub struct Flipkart;

#[async_trait::async_trait]
impl SiteAdapter for Flipkart {
    fn site(&self) -> Site {
        Site::Flipkart
    }

    /// Spaces become `%20`.
    fn search_url(&self, query: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!("https://www.flipkart.com/search?q={}", utf8_percent_encode(query, COMPONENT)))
    }

    fn ready_marker(&self) -> Locator {
        READY
    }

    async fn extract<S: PageSession>(&self, session: &S, timeouts: &AdapterTimeouts) -> Result<RawOffer, SessionError> {
        let price = resolve_text(session, PRICE, timeouts.locator).await?;
        let review = resolve_text(session, REVIEW, timeouts.locator).await?;
        Ok(RawOffer::new(Site::Flipkart, price, review))
    }
}
