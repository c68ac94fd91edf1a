//! Per-storefront adapters.
//!
//! Each adapter turns a search query into a [`RawOffer`] for one site. The
//! set is closed and chosen at compile time; [`fetch_offer`] dispatches on
//! [`Site`].
//!
//! ### Shared flow
//! - Build the site's search URL (each site encodes spaces differently).
//! - Navigate and wait a bounded time for the site's "results loaded" marker.
//!   A missing marker only lowers the odds of finding fields later.
//! - Run the site-specific extraction.
//! - Contain every session failure as a fully unavailable offer.

pub(crate) mod amazon;
pub(crate) mod flipkart;
pub(crate) mod myntra;

pub use amazon::Amazon;
pub use flipkart::Flipkart;
pub use myntra::Myntra;

use std::time::Duration;

use dealscout_core::{RawOffer, Site};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::locator::Locator;
use crate::session::{PageSession, SessionError};

/// Characters left unescaped in `%XX` encoded query and path components.
pub(crate) const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Bounded waits used by adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterTimeouts {
    /// Wait for the "results loaded" marker.
    pub ready: Duration,
    /// Wait for each individual field locator.
    pub locator: Duration,
}

impl Default for AdapterTimeouts {
    fn default() -> Self {
        Self { ready: Duration::from_secs(10), locator: Duration::from_secs(5) }
    }
}

/// One storefront's page structure.
#[async_trait::async_trait]
pub trait SiteAdapter: Send + Sync {
    fn site(&self) -> Site;

    /// Search results URL for `query`.
    fn search_url(&self, query: &str) -> Result<Url, url::ParseError>;

    /// Element whose presence means search results have rendered.
    fn ready_marker(&self) -> Locator;

    /// Read price and review from the loaded results page.
    async fn extract<S: PageSession>(&self, session: &S, timeouts: &AdapterTimeouts) -> Result<RawOffer, SessionError>;

    /// Run a full search against this site. Never fails; any session error
    /// becomes [`RawOffer::unavailable`].
    async fn fetch_offer<S: PageSession>(&self, query: &str, session: &S, timeouts: &AdapterTimeouts) -> RawOffer {
        let site = self.site();
        match load_and_extract(self, query, session, timeouts).await {
            Ok(offer) => offer,
            Err(e) => {
                tracing::warn!(%site, error = %e, "scraper failed; offer recorded as unavailable");
                RawOffer::unavailable(site)
            }
        }
    }
}

async fn load_and_extract<A, S>(
    adapter: &A, query: &str, session: &S, timeouts: &AdapterTimeouts,
) -> Result<RawOffer, SessionError>
where
    A: SiteAdapter + ?Sized,
    S: PageSession,
{
    let site = adapter.site();
    let url = adapter.search_url(query).map_err(|e| SessionError::Navigation(e.to_string()))?;

    tracing::debug!(%site, %url, "loading search results");
    session.navigate(&url).await?;

    let marker = adapter.ready_marker();
    if session.wait_for(&marker, timeouts.ready).await?.is_none() {
        tracing::debug!(%site, locator = %marker, "results marker did not appear; extracting anyway");
    }

    adapter.extract(session, timeouts).await
}

/// Fetch `site`'s offer for `query` using `session`.
pub async fn fetch_offer<S: PageSession>(site: Site, query: &str, session: &S, timeouts: &AdapterTimeouts) -> RawOffer {
    match site {
        Site::Amazon => Amazon.fetch_offer(query, session, timeouts).await,
        Site::Flipkart => Flipkart.fetch_offer(query, session, timeouts).await,
        Site::Myntra => Myntra.fetch_offer(query, session, timeouts).await,
    }
}
