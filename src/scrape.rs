//! The per-operator scrape contract and its shared skeleton.
//!
//! Every operator runs the same flow; the differences are confined to its
//! `OperatorConfig`. The skeleton owns the page session for the whole run
//! and releases it on every exit path.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::browser::{Browser, BrowserError, Page};
use crate::extractor::extract_route;
use crate::navigator;
use crate::operator::{OperatorConfig, WeekPolicy};
use crate::timetable::Sailing;

/// Bound on waits for the initial page load and its required elements.
const PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// An element the extraction depends on is absent. Fatal for the run;
    /// a page missing its anchors cannot be partially trusted.
    #[error("page structure mismatch: {0}")]
    Structure(String),

    /// Calendar paging did not converge, or a post-click reload never
    /// completed. Fatal for the run.
    #[error("calendar navigation failed: {0}")]
    Navigation(String),

    #[error("could not parse start date '{text}' with format '{format}'")]
    StartDate { text: String, format: String },

    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("scrape cancelled")]
    Cancelled,
}

/// The uniform operation every operator implementation satisfies.
#[async_trait]
pub trait Scraper: Send + Sync {
    fn company(&self) -> &str;

    /// Scrape `weeks` consecutive weeks of departures, starting from the
    /// week the site currently displays. Entries come back ascending by
    /// departure within each route; ordering across routes is unspecified.
    async fn scrape(
        &self,
        cancel: &CancellationToken,
        weeks: u32,
    ) -> Result<Vec<Sailing>, ScrapeError>;
}

/// Generic operator scraper: one of these per ferry company, differing only
/// in configuration.
pub struct FerryScraper {
    config: OperatorConfig,
    browser: Arc<dyn Browser>,
}

impl FerryScraper {
    pub fn new(config: OperatorConfig, browser: Arc<dyn Browser>) -> Self {
        Self { config, browser }
    }

    async fn run(
        &self,
        page: &dyn Page,
        cancel: &CancellationToken,
        weeks: u32,
    ) -> Result<Vec<Sailing>, ScrapeError> {
        let config = &self.config;

        page.goto(config.timetable_url).await?;

        // The displayed start date anchors every downstream day offset;
        // without it nothing on the page can be trusted.
        page.wait_for(config.start_date_selector, PAGE_LOAD_TIMEOUT)
            .await
            .map_err(|_| {
                ScrapeError::Structure(format!(
                    "start date element '{}' not found",
                    config.start_date_selector
                ))
            })?;
        let raw = page.text(config.start_date_selector).await.map_err(|_| {
            ScrapeError::Structure(format!(
                "start date element '{}' not readable",
                config.start_date_selector
            ))
        })?;
        let start_date = NaiveDate::parse_from_str(raw.trim(), config.start_date_format)
            .map_err(|_| ScrapeError::StartDate {
                text: raw.trim().to_string(),
                format: config.start_date_format.to_string(),
            })?;

        for route in &config.routes {
            page.wait_for(route.table_selector, PAGE_LOAD_TIMEOUT)
                .await
                .map_err(|_| {
                    ScrapeError::Structure(format!(
                        "route table '{}' did not load",
                        route.table_selector
                    ))
                })?;
        }

        let mut results = Vec::new();
        for week in 0..weeks {
            if cancel.is_cancelled() {
                return Err(ScrapeError::Cancelled);
            }
            let week_start = start_date + Days::new(7 * u64::from(week));

            // Week 0 is what the page already shows; later weeks need the
            // calendar.
            if week > 0 {
                if let Err(e) = navigator::go_to_week(page, config, week_start).await {
                    match config.week_policy {
                        WeekPolicy::Truncate => {
                            warn!(
                                "{}: stopping at week {} of {}: {}",
                                config.company, week, weeks, e
                            );
                            break;
                        }
                        WeekPolicy::Strict => return Err(e),
                    }
                }
            }

            for route in &config.routes {
                if cancel.is_cancelled() {
                    return Err(ScrapeError::Cancelled);
                }
                let html = page.html(route.table_selector).await.map_err(|e| match e {
                    BrowserError::NotFound { selector } => {
                        ScrapeError::Structure(format!("route table '{selector}' missing"))
                    }
                    other => ScrapeError::Browser(other),
                })?;
                results.extend(extract_route(&html, config, route, week_start));
            }
        }

        info!("{}: extracted {} departures", config.company, results.len());
        Ok(results)
    }
}

#[async_trait]
impl Scraper for FerryScraper {
    fn company(&self) -> &str {
        self.config.company
    }

    async fn scrape(
        &self,
        cancel: &CancellationToken,
        weeks: u32,
    ) -> Result<Vec<Sailing>, ScrapeError> {
        let weeks = weeks.max(1);
        let page = self.browser.new_page().await?;
        let result = self.run(page.as_ref(), cancel, weeks).await;
        // Release the session whatever happened above; a close failure is
        // logged but must not mask the scrape result.
        if let Err(e) = page.close().await {
            warn!("{}: failed to release page session: {e}", self.config.company);
        }
        result
    }
}
