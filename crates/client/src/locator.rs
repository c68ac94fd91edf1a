//! Ordered fallback locators.
//!
//! Storefronts restructure their markup independently and often, so every
//! field an adapter reads is described by a list of candidate locators.
//! [`resolve_text`] walks the list in order and returns the first match with
//! text; later candidates are never consulted once one succeeds.

use std::fmt;
use std::time::Duration;

use crate::session::{PageSession, SessionError};

/// How a locator selects its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorKind {
    Css,
    XPath,
}

/// A selection method and selector string for one page element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator {
    pub kind: LocatorKind,
    pub selector: &'static str,
}

impl Locator {
    pub const fn css(selector: &'static str) -> Self {
        Self { kind: LocatorKind::Css, selector }
    }

    pub const fn xpath(selector: &'static str) -> Self {
        Self { kind: LocatorKind::XPath, selector }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LocatorKind::Css => write!(f, "css:{}", self.selector),
            LocatorKind::XPath => write!(f, "xpath:{}", self.selector),
        }
    }
}

/// Return the text of the first locator that matches within `timeout`.
///
/// A timeout or blank text moves on to the next locator. `Ok(None)` means
/// every locator missed. Session failures are returned as errors for the
/// adapter to contain.
pub async fn resolve_text<S: PageSession>(
    session: &S, locators: &[Locator], timeout: Duration,
) -> Result<Option<String>, SessionError> {
    for locator in locators {
        let Some(element) = session.wait_for(locator, timeout).await? else {
            tracing::debug!(%locator, "locator timed out");
            continue;
        };

        let text = session.read_text(&element).await?;
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!(%locator, "locator matched an empty element");
            continue;
        }

        return Ok(Some(text.to_string()));
    }

    Ok(None)
}

/// Read the text of `locator` right now, without waiting.
pub async fn read_now<S: PageSession>(session: &S, locator: &Locator) -> Result<Option<String>, SessionError> {
    let Some(element) = session.find(locator).await? else {
        tracing::debug!(%locator, "element absent");
        return Ok(None);
    };

    let text = session.read_text(&element).await?;
    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}
