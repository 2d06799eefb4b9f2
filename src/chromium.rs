//! chromiumoxide-backed implementation of the browser traits.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use log::debug;

use crate::browser::{Browser, BrowserError, Page};

/// How often `wait_for` re-checks the DOM while polling for a selector.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct ChromiumBrowser {
    browser: CdpBrowser,
}

impl ChromiumBrowser {
    /// Launch a headless Chromium instance. `executable` overrides the
    /// system-default binary lookup when set.
    pub async fn launch(executable: Option<PathBuf>) -> Result<Self, BrowserError> {
        let mut builder = BrowserConfig::builder()
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");
        if let Some(path) = executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|e| BrowserError::Backend(format!("invalid browser config: {e}")))?;

        let (browser, mut handler) = CdpBrowser::launch(config)
            .await
            .map_err(|e| BrowserError::Backend(format!("failed to launch browser: {e}")))?;

        // The handler stream must be driven for the browser connection to
        // make progress; it ends when the browser goes away.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
            debug!("browser event handler finished");
        });

        Ok(Self { browser })
    }
}

#[async_trait]
impl Browser for ChromiumBrowser {
    async fn new_page(&self) -> Result<Box<dyn Page>, BrowserError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Backend(format!("failed to open page: {e}")))?;
        Ok(Box::new(ChromiumPage { page }))
    }
}

struct ChromiumPage {
    page: CdpPage,
}

impl ChromiumPage {
    async fn find(&self, selector: &str) -> Result<chromiumoxide::element::Element, BrowserError> {
        self.page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::NotFound {
                selector: selector.to_string(),
            })
    }
}

#[async_trait]
impl Page for ChromiumPage {
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::Backend(format!("navigation to {url} failed: {e}")))?;
        let _ = self.page.wait_for_navigation().await;
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), BrowserError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(BrowserError::WaitTimeout {
                    selector: selector.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn text(&self, selector: &str) -> Result<String, BrowserError> {
        let element = self.find(selector).await?;
        let text = element
            .inner_text()
            .await
            .map_err(|e| BrowserError::Backend(format!("could not read text: {e}")))?;
        Ok(text.unwrap_or_default())
    }

    async fn html(&self, selector: &str) -> Result<String, BrowserError> {
        let element = self.find(selector).await?;
        let html = element
            .outer_html()
            .await
            .map_err(|e| BrowserError::Backend(format!("could not read html: {e}")))?;
        Ok(html.unwrap_or_default())
    }

    async fn click(&self, selector: &str) -> Result<(), BrowserError> {
        let element = self.find(selector).await?;
        element
            .click()
            .await
            .map_err(|e| BrowserError::Backend(format!("click on '{selector}' failed: {e}")))?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), BrowserError> {
        self.page
            .close()
            .await
            .map_err(|e| BrowserError::Backend(format!("failed to close page: {e}")))
    }
}
