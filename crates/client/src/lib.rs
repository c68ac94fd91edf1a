//! Client code for dealscout.
//!
//! This crate drives storefront pages through a page-access session, turns
//! them into offers with per-site adapters, and runs whole searches. It is
//! shared by the MCP server and the CLI.

pub mod locator;
pub mod search;
pub mod session;
pub mod sites;

#[cfg(feature = "render")]
pub mod render;

#[cfg(any(test, feature = "fixture"))]
pub mod fixture;

pub use locator::{Locator, LocatorKind, resolve_text};
pub use search::{SearchOptions, run_search};
pub use session::{PageSession, SessionError, SessionProvider};
pub use sites::{AdapterTimeouts, SiteAdapter, fetch_offer};

#[cfg(feature = "render")]
pub use render::{ChromiumProvider, ChromiumSession};
