//! Browser automation boundary.
//!
//! The scraping engine only ever talks to these traits; the concrete
//! backend (chromiumoxide, see `chromium.rs`) is an implementation choice.
//! Tests swap in an in-memory fake page.

use std::time::Duration;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("no element matches selector '{selector}'")]
    NotFound { selector: String },

    #[error("timed out after {timeout_ms}ms waiting for selector '{selector}'")]
    WaitTimeout { selector: String, timeout_ms: u64 },

    #[error("browser backend error: {0}")]
    Backend(String),
}

/// A launched browser that can hand out page sessions.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn new_page(&self) -> Result<Box<dyn Page>, BrowserError>;
}

/// One page session (tab), held exclusively by a single operator run.
///
/// Queries are selector-based and always act on the first match; bulk
/// element walks happen on HTML captured via `html()` instead, so the
/// extraction layer can work on a stable snapshot of the region.
#[async_trait]
pub trait Page: Send + Sync {
    /// Navigate to a URL and wait for the document to load.
    async fn goto(&self, url: &str) -> Result<(), BrowserError>;

    /// Poll until an element matching `selector` exists, up to `timeout`.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), BrowserError>;

    /// Inner text of the first element matching `selector`.
    async fn text(&self, selector: &str) -> Result<String, BrowserError>;

    /// Outer HTML of the first element matching `selector`.
    async fn html(&self, selector: &str) -> Result<String, BrowserError>;

    /// Click the first element matching `selector`.
    async fn click(&self, selector: &str) -> Result<(), BrowserError>;

    /// Close the session. Callers must invoke this on every exit path.
    async fn close(self: Box<Self>) -> Result<(), BrowserError>;
}
