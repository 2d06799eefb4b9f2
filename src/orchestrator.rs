//! Runs every configured operator and aggregates what they produce.

use log::{error, info};
use tokio_util::sync::CancellationToken;

use crate::notifier::{FailureNotifier, ScrapeFailure};
use crate::scrape::{ScrapeError, Scraper};
use crate::timetable::Sailing;

/// The outcome of one scrape cycle: everything gathered from operators that
/// succeeded, plus one failure record per operator that did not. How the
/// sailings replace previously stored data is the store's concern.
#[derive(Debug, Default)]
pub struct ScrapeReport {
    pub sailings: Vec<Sailing>,
    pub failures: Vec<ScrapeFailure>,
}

/// Run the operators one at a time (site automation is fragile under
/// overlapping sessions). A failing operator contributes zero entries and is
/// reported out-of-band; it never prevents the next operator from running.
pub async fn run_all(
    scrapers: &[Box<dyn Scraper>],
    notifier: Option<&FailureNotifier>,
    cancel: &CancellationToken,
    weeks: u32,
) -> ScrapeReport {
    let mut report = ScrapeReport::default();

    for scraper in scrapers {
        if cancel.is_cancelled() {
            info!("scrape cycle cancelled before {}", scraper.company());
            break;
        }
        match scraper.scrape(cancel, weeks).await {
            Ok(sailings) => {
                info!("{}: {} departures scraped", scraper.company(), sailings.len());
                report.sailings.extend(sailings);
            }
            Err(ScrapeError::Cancelled) => {
                info!("scrape cycle cancelled during {}", scraper.company());
                break;
            }
            Err(e) => {
                error!("{}: scrape failed: {e}", scraper.company());
                let failure = ScrapeFailure::new(scraper.company(), e.to_string());
                if let Some(notifier) = notifier {
                    notifier.notify(&failure).await;
                }
                report.failures.push(failure);
            }
        }
    }

    report
}
