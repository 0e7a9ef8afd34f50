//! Headless browser fetching
//!
//! [`RenderedFetcher`] owns the capture loop and talks to the browser only
//! through the [`BrowserLauncher`] and [`BrowserSession`] traits.
//! [`ChromeLauncher`] is the Chromium implementation; tests substitute
//! scripted sessions.

mod chrome;
mod executable;
mod policy;
mod rendered;
mod session;

pub use chrome::{ChromeLauncher, ChromeSession, NetworkActivity};
pub use executable::{resolve_executable, SERVERLESS_CANDIDATES};
pub use policy::{RequestFilter, ResourceKind, Verdict, PRESENTATION_KINDS};
pub use rendered::RenderedFetcher;
pub use session::{BrowserLauncher, BrowserSession};
