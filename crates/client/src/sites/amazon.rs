//! Amazon India adapter.
//!
//! Reads both fields of the first search result with a single in-page
//! script instead of separate element lookups.

use dealscout_core::{RawOffer, Site};
use url::Url;

use super::{AdapterTimeouts, SiteAdapter};
use crate::locator::Locator;
use crate::session::{PageSession, SessionError};

pub(crate) const READY: Locator = Locator::css(r#"[data-component-type="s-search-result"]"#);

const FIRST_RESULT_SCRIPT: &str = r#"(() => {
    const product = document.querySelectorAll('[data-component-type="s-search-result"]')[0];
    if (!product) return { price: null, reviews: null };

    const price = product.querySelector('.a-price-whole');
    const reviews = product.querySelector('.a-row.a-size-small span');

    return {
        price: price ? price.innerText : null,
        reviews: reviews ? reviews.innerText : null,
    };
})()"#;

pub struct Amazon;

#[async_trait::async_trait]
impl SiteAdapter for Amazon {
    fn site(&self) -> Site {
        Site::Amazon
    }

    /// Spaces become `+` (form encoding).
    fn search_url(&self, query: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse("https://www.amazon.in/s")?;
        url.query_pairs_mut().append_pair("k", query);
        Ok(url)
    }

    fn ready_marker(&self) -> Locator {
        READY
    }

    async fn extract<S: PageSession>(&self, session: &S, _timeouts: &AdapterTimeouts) -> Result<RawOffer, SessionError> {
        let result = session.execute(FIRST_RESULT_SCRIPT).await?;
        if !result.is_object() && !result.is_null() {
            return Err(SessionError::Script(format!("unexpected first-result payload: {result}")));
        }

        Ok(RawOffer::new(Site::Amazon, text_field(&result, "price"), text_field(&result, "reviews")))
    }
}

fn text_field(value: &serde_json::Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
