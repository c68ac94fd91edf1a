//! Deterministic in-memory page sessions for tests.
//!
//! Pages are keyed by host. Element lookups succeed or miss immediately.
//! Every lookup is recorded with the wait it asked for, and the provider
//! counts acquisitions and releases so callers can assert on session
//! lifecycle.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use dealscout_core::Site;
use url::Url;

use crate::locator::Locator;
use crate::session::{PageSession, SessionError, SessionProvider};
use crate::sites::{amazon, flipkart, myntra};

/// Host each adapter navigates to.
pub fn host(site: Site) -> &'static str {
    match site {
        Site::Amazon => "www.amazon.in",
        Site::Flipkart => "www.flipkart.com",
        Site::Myntra => "www.myntra.com",
    }
}

/// Canned contents of one storefront page.
#[derive(Debug, Clone, Default)]
pub struct FixturePage {
    elements: HashMap<String, String>,
    script_result: Option<serde_json::Value>,
    fail_navigation: bool,
    stall: bool,
    panic_on_script: bool,
}

impl FixturePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `text` for any locator whose selector equals `selector`.
    pub fn element(mut self, selector: &str, text: &str) -> Self {
        self.elements.insert(selector.to_string(), text.to_string());
        self
    }

    /// Value returned by in-page scripts.
    pub fn script_result(mut self, value: serde_json::Value) -> Self {
        self.script_result = Some(value);
        self
    }

    /// A loaded results page for `site` with `price` and `review` placed
    /// where that site's adapter reads them.
    pub fn listing(site: Site, price: &str, review: &str) -> Self {
        match site {
            Site::Amazon => Self::new()
                .element(amazon::READY.selector, "")
                .script_result(serde_json::json!({ "price": price, "reviews": review })),
            Site::Flipkart => Self::new()
                .element(flipkart::READY.selector, "")
                .element(flipkart::PRICE[1].selector, price)
                .element(flipkart::REVIEW[0].selector, review),
            Site::Myntra => Self::new()
                .element(myntra::READY.selector, "")
                .element(myntra::PRICE.selector, price)
                .element(myntra::RATING.selector, review),
        }
    }

    /// Navigation to this page fails.
    pub fn failing() -> Self {
        Self { fail_navigation: true, ..Self::default() }
    }

    /// Navigation to this page never completes.
    pub fn stalled() -> Self {
        Self { stall: true, ..Self::default() }
    }

    /// Script execution on this page panics.
    pub fn panicking() -> Self {
        Self { panic_on_script: true, ..Self::default() }
    }
}

/// How an element was looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMethod {
    /// Waited up to the given duration.
    Wait(Duration),
    /// Looked up once without waiting.
    Find,
}

/// One recorded element lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub selector: String,
    pub method: LookupMethod,
}

impl Lookup {
    pub fn wait(selector: &str, timeout: Duration) -> Self {
        Self { selector: selector.to_string(), method: LookupMethod::Wait(timeout) }
    }

    pub fn find(selector: &str) -> Self {
        Self { selector: selector.to_string(), method: LookupMethod::Find }
    }
}

#[derive(Debug, Clone)]
pub struct FixtureElement {
    text: String,
}

/// One fixture session.
#[derive(Debug)]
pub struct FixtureSession {
    pages: HashMap<String, FixturePage>,
    current: Mutex<Option<FixturePage>>,
    lookups: Mutex<Vec<Lookup>>,
    released: Arc<AtomicUsize>,
}

impl FixtureSession {
    pub fn new<'a>(pages: impl IntoIterator<Item = (&'a str, FixturePage)>) -> Self {
        Self::with_counter(pages.into_iter().map(|(h, p)| (h.to_string(), p)).collect(), Arc::default())
    }

    fn with_counter(pages: HashMap<String, FixturePage>, released: Arc<AtomicUsize>) -> Self {
        Self { pages, current: Mutex::new(None), lookups: Mutex::default(), released }
    }

    /// Selectors looked up so far, in order.
    pub fn attempts(&self) -> Vec<String> {
        self.lookups().into_iter().map(|lookup| lookup.selector).collect()
    }

    /// Lookups so far with how each was made, in order.
    pub fn lookups(&self) -> Vec<Lookup> {
        self.lookups.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn lookup(&self, locator: &Locator, method: LookupMethod) -> Option<FixtureElement> {
        self.lookups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Lookup { selector: locator.selector.to_string(), method });

        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        current
            .as_ref()
            .and_then(|page| page.elements.get(locator.selector))
            .map(|text| FixtureElement { text: text.clone() })
    }
}

#[async_trait::async_trait]
impl PageSession for FixtureSession {
    type Element = FixtureElement;

    async fn navigate(&self, url: &Url) -> Result<(), SessionError> {
        let page = url.host_str().and_then(|host| self.pages.get(host)).cloned();

        if let Some(page) = &page {
            if page.fail_navigation {
                return Err(SessionError::Navigation(format!("fixture refused {url}")));
            }
            if page.stall {
                tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
            }
        }

        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = page;
        Ok(())
    }

    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<Option<FixtureElement>, SessionError> {
        Ok(self.lookup(locator, LookupMethod::Wait(timeout)))
    }

    async fn find(&self, locator: &Locator) -> Result<Option<FixtureElement>, SessionError> {
        Ok(self.lookup(locator, LookupMethod::Find))
    }

    async fn read_text(&self, element: &FixtureElement) -> Result<String, SessionError> {
        Ok(element.text.clone())
    }

    async fn execute(&self, _script: &str) -> Result<serde_json::Value, SessionError> {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner).clone();
        match current {
            Some(page) if page.panic_on_script => panic!("fixture script panicked"),
            Some(page) => Ok(page.script_result.unwrap_or(serde_json::Value::Null)),
            None => Ok(serde_json::Value::Null),
        }
    }

    async fn release(self) -> Result<(), SessionError> {
        self.released.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Provider handing out [`FixtureSession`]s over a shared set of pages.
#[derive(Debug, Default)]
pub struct FixtureProvider {
    pages: HashMap<String, FixturePage>,
    fail_acquire_after: Option<usize>,
    acquired: AtomicUsize,
    released: Arc<AtomicUsize>,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `page` for requests to `host`.
    pub fn page(mut self, host: &str, page: FixturePage) -> Self {
        self.pages.insert(host.to_string(), page);
        self
    }

    /// Serve `page` for `site`'s search results.
    pub fn site(self, site: Site, page: FixturePage) -> Self {
        self.page(host(site), page)
    }

    /// Every acquisition fails.
    pub fn unavailable() -> Self {
        Self { fail_acquire_after: Some(0), ..Self::default() }
    }

    /// Acquisitions after the first `n` fail.
    pub fn fail_after(mut self, n: usize) -> Self {
        self.fail_acquire_after = Some(n);
        self
    }

    /// Number of acquisition attempts, successful or not.
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    /// Number of sessions released.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SessionProvider for FixtureProvider {
    type Session = FixtureSession;

    async fn acquire(&self) -> Result<FixtureSession, SessionError> {
        let previous = self.acquired.fetch_add(1, Ordering::SeqCst);
        if self.fail_acquire_after.is_some_and(|limit| previous >= limit) {
            return Err(SessionError::Launch("fixture browser unavailable".into()));
        }
        Ok(FixtureSession::with_counter(self.pages.clone(), Arc::clone(&self.released)))
    }
}
