//! Headless browser sessions for live storefront pages.
//!
//! This module provides the feature-gated page-session implementation
//! using chromiumoxide for headless Chrome/Chromium browser control.

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::{Element, Page};
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use url::Url;

use crate::locator::{Locator, LocatorKind};
use crate::session::{PageSession, SessionError, SessionProvider};

/// Launches one headless Chromium per acquired session.
#[derive(Debug, Clone)]
pub struct ChromiumProvider {
    poll_interval: Duration,
}

impl ChromiumProvider {
    pub fn new() -> Self {
        Self { poll_interval: Duration::from_millis(250) }
    }

    /// How often a waiting locator re-queries the DOM.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

impl Default for ChromiumProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SessionProvider for ChromiumProvider {
    type Session = ChromiumSession;

    /// Launch a browser and open a blank tab.
    ///
    /// The browser uses a background task to handle Chrome DevTools
    /// Protocol events for as long as the session lives.
    async fn acquire(&self) -> Result<ChromiumSession, SessionError> {
        let (browser, mut handler) =
            Browser::launch(BrowserConfig::builder().build().map_err(SessionError::Launch)?)
                .await
                .map_err(|e| SessionError::Launch(e.to_string()))?;

        let handler = HandlerTask(tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("browser handler event error: {e}");
                }
            }
        }));

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| SessionError::Launch(e.to_string()))?;

        tracing::debug!("headless browser session ready");
        Ok(ChromiumSession { browser, page, handler, poll_interval: self.poll_interval })
    }
}

/// CDP event loop for one browser. Aborted when dropped, so a session
/// dropped without `release` does not leave the task running.
struct HandlerTask(JoinHandle<()>);

impl Drop for HandlerTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// A browser process with a single tab.
///
/// Dropping the session aborts its event loop and chromiumoxide kills the
/// browser process; [`PageSession::release`] closes both cleanly.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: HandlerTask,
    poll_interval: Duration,
}

impl ChromiumSession {
    async fn lookup(&self, locator: &Locator) -> Result<Option<Element>, SessionError> {
        let found = match locator.kind {
            LocatorKind::Css => self.page.find_element(locator.selector).await,
            LocatorKind::XPath => self.page.find_xpath(locator.selector).await,
        };
        match found {
            Ok(element) => Ok(Some(element)),
            Err(e) => lookup_miss(e),
        }
    }

    /// Re-query until `locator` matches or the browser fails.
    async fn poll(&self, locator: &Locator) -> Result<Element, SessionError> {
        loop {
            if let Some(element) = self.lookup(locator).await? {
                return Ok(element);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// No match comes back as `NotFound` or a protocol error from Chrome.
/// Transport failures mean the browser is gone.
fn lookup_miss(err: CdpError) -> Result<Option<Element>, SessionError> {
    match err {
        CdpError::NotFound | CdpError::Chrome(_) => Ok(None),
        CdpError::Ws(_) | CdpError::ChannelSendError(_) | CdpError::NoResponse => Err(SessionError::Closed),
        other => Err(SessionError::Element(other.to_string())),
    }
}

#[async_trait::async_trait]
impl PageSession for ChromiumSession {
    type Element = Element;

    async fn navigate(&self, url: &Url) -> Result<(), SessionError> {
        self.page
            .goto(url.as_str())
            .await
            .map_err(|e| SessionError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<Option<Element>, SessionError> {
        let found = tokio::time::timeout(timeout, self.poll(locator)).await;

        match found {
            Ok(result) => result.map(Some),
            Err(_) => Ok(None),
        }
    }

    async fn find(&self, locator: &Locator) -> Result<Option<Element>, SessionError> {
        self.lookup(locator).await
    }

    async fn read_text(&self, element: &Element) -> Result<String, SessionError> {
        let text = element
            .inner_text()
            .await
            .map_err(|e| SessionError::Element(e.to_string()))?;
        Ok(text.unwrap_or_default())
    }

    async fn execute(&self, script: &str) -> Result<serde_json::Value, SessionError> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| SessionError::Script(e.to_string()))?;

        result
            .into_value()
            .map_err(|e| SessionError::Script(format!("failed to convert script result: {e}")))
    }

    async fn release(self) -> Result<(), SessionError> {
        let Self { mut browser, page, handler, .. } = self;

        page.close().await.ok();
        let closed = browser.close().await;
        browser.wait().await.ok();
        drop(handler);

        closed.map(|_| ()).map_err(|e| {
            tracing::debug!("browser close failed: {e}");
            SessionError::Closed
        })
    }
}
