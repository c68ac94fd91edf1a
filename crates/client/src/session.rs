//! Page-access capability consumed by the site adapters.
//!
//! A [`SessionProvider`] hands out one [`PageSession`] per acquisition. A
//! session is a single browser tab: it navigates to one URL at a time, so
//! callers never share one between concurrent adapters.

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::locator::Locator;

/// Errors raised by a page session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Failed to launch or connect to the browser.
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// Failed to navigate to URL.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// In-page script failed or returned something unreadable.
    #[error("script execution failed: {0}")]
    Script(String),

    /// Element lookup or text read failed for a reason other than absence.
    #[error("element access failed: {0}")]
    Element(String),

    /// Browser closed unexpectedly.
    #[error("browser closed unexpectedly")]
    Closed,
}

impl From<SessionError> for dealscout_core::Error {
    fn from(err: SessionError) -> Self {
        dealscout_core::Error::SessionUnavailable(err.to_string())
    }
}

/// One exclusive page-access session.
#[async_trait::async_trait]
pub trait PageSession: Send + Sync {
    /// Handle to an element found on the current page.
    type Element: Send + Sync;

    /// Load `url` in this session.
    async fn navigate(&self, url: &Url) -> Result<(), SessionError>;

    /// Wait up to `timeout` for `locator` to match. `Ok(None)` on timeout.
    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<Option<Self::Element>, SessionError>;

    /// Look `locator` up once without waiting.
    async fn find(&self, locator: &Locator) -> Result<Option<Self::Element>, SessionError>;

    /// Rendered text of `element`.
    async fn read_text(&self, element: &Self::Element) -> Result<String, SessionError>;

    /// Evaluate `script` in the page and return its JSON result.
    async fn execute(&self, script: &str) -> Result<serde_json::Value, SessionError>;

    /// Tear the session down.
    async fn release(self) -> Result<(), SessionError>;
}

/// Source of page sessions.
#[async_trait::async_trait]
pub trait SessionProvider: Send + Sync {
    type Session: PageSession;

    /// Create a new session. Failure here is fatal for a search.
    async fn acquire(&self) -> Result<Self::Session, SessionError>;
}
