//! Search orchestration across all storefronts.
//!
//! ### Sequential (default)
//! - One page session, adapters run one after another in [`Site::ALL`] order.
//!
//! ### Parallel
//! - One page session per site, all adapters run concurrently.
//! - Results keep [`Site::ALL`] order regardless of completion order, so
//!   best-deal ties resolve the same way in both modes.
//!
//! ### Containment
//! - Adapters never fail; panics inside an adapter are caught and recorded as
//!   unavailable offers.
//! - Every acquired session is released, including when the search deadline
//!   cancels adapters still in flight.

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use chrono::Utc;
use dealscout_core::{AppConfig, Error, OfferTable, RawOffer, SearchReport, Site};
use futures_util::FutureExt;
use futures_util::future::join_all;
use tokio::time::Instant;

use crate::session::{PageSession, SessionProvider};
use crate::sites::{AdapterTimeouts, fetch_offer};

/// Options for one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOptions {
    pub timeouts: AdapterTimeouts,

    /// Run adapters concurrently with one session each.
    pub parallel: bool,

    /// Cap on the whole search. Adapters unfinished at the cap count as
    /// unavailable.
    pub search_timeout: Option<Duration>,
}

impl From<&AppConfig> for SearchOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            timeouts: AdapterTimeouts { ready: config.ready_timeout(), locator: config.locator_timeout() },
            parallel: config.parallel,
            search_timeout: config.search_timeout(),
        }
    }
}

/// Search every storefront for `query` and pick the best deal.
///
/// # Errors
///
/// - `Error::InvalidInput` if `query` is empty or whitespace. No session is
///   acquired in that case.
/// - `Error::SessionUnavailable` if a page session cannot be acquired.
pub async fn run_search<P: SessionProvider>(
    provider: &P, query: &str, options: &SearchOptions,
) -> Result<SearchReport, Error> {
    let query = query.trim();
    if query.is_empty() {
        return Err(Error::InvalidInput("query cannot be empty".into()));
    }

    tracing::info!(query, parallel = options.parallel, "starting price search");
    let start = Instant::now();
    let deadline = options.search_timeout.map(|timeout| start + timeout);

    let offers = if options.parallel {
        search_parallel(provider, query, options, deadline).await?
    } else {
        search_sequential(provider, query, options, deadline).await?
    };

    let offers = OfferTable::from_raw(offers);
    let best_deal = offers.best_deal();

    tracing::info!(
        query,
        best_deal = %best_deal,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "price search finished"
    );

    Ok(SearchReport { query: query.to_string(), offers, best_deal, searched_at: Utc::now() })
}

async fn search_sequential<P: SessionProvider>(
    provider: &P, query: &str, options: &SearchOptions, deadline: Option<Instant>,
) -> Result<Vec<RawOffer>, Error> {
    let session = acquire(provider).await?;

    let mut offers = Vec::with_capacity(Site::ALL.len());
    for site in Site::ALL {
        offers.push(contained(site, query, &session, &options.timeouts, deadline).await);
    }

    release(session).await;
    Ok(offers)
}

async fn search_parallel<P: SessionProvider>(
    provider: &P, query: &str, options: &SearchOptions, deadline: Option<Instant>,
) -> Result<Vec<RawOffer>, Error> {
    let mut sessions = Vec::with_capacity(Site::ALL.len());
    for _ in Site::ALL {
        match acquire(provider).await {
            Ok(session) => sessions.push(session),
            Err(e) => {
                for session in sessions {
                    release(session).await;
                }
                return Err(e);
            }
        }
    }

    let offers = join_all(
        Site::ALL
            .into_iter()
            .zip(&sessions)
            .map(|(site, session)| contained(site, query, session, &options.timeouts, deadline)),
    )
    .await;

    for session in sessions {
        release(session).await;
    }
    Ok(offers)
}

/// Run one adapter, turning a panic or an expired deadline into an
/// unavailable offer.
async fn contained<S: PageSession>(
    site: Site, query: &str, session: &S, timeouts: &AdapterTimeouts, deadline: Option<Instant>,
) -> RawOffer {
    if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
        tracing::warn!(%site, "search deadline already passed; skipping site");
        return RawOffer::unavailable(site);
    }

    let attempt = AssertUnwindSafe(fetch_offer(site, query, session, timeouts)).catch_unwind();
    let outcome = match deadline {
        Some(deadline) => match tokio::time::timeout_at(deadline, attempt).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(%site, "search deadline reached; offer recorded as unavailable");
                return RawOffer::unavailable(site);
            }
        },
        None => attempt.await,
    };

    outcome.unwrap_or_else(|_| {
        tracing::error!(%site, "scraper panicked; offer recorded as unavailable");
        RawOffer::unavailable(site)
    })
}

async fn acquire<P: SessionProvider>(provider: &P) -> Result<P::Session, Error> {
    provider.acquire().await.map_err(|e| {
        tracing::error!(error = %e, "could not acquire page session");
        Error::from(e)
    })
}

async fn release<S: PageSession>(session: S) {
    if let Err(e) = session.release().await {
        tracing::warn!(error = %e, "failed to release page session");
    }
}
