use std::sync::Arc;
use std::time::Duration;

use dotenv::dotenv;
use log::{LevelFilter, error, info, warn};
use tokio_util::sync::CancellationToken;

use ferrytide::{
    AppEnv, Browser, ChromiumBrowser, FailureNotifier, FerryScraper, LoadFromEnv, Scraper,
    SmtpSettings, TimetableStore, all_operators, run_all,
};

async fn run_scrape_cycle(
    scrapers: &[Box<dyn Scraper>],
    notifier: &FailureNotifier,
    store: &TimetableStore,
    app_env: &AppEnv,
    cancel: &CancellationToken,
) {
    let report = run_all(scrapers, Some(notifier), cancel, app_env.scrape_weeks).await;

    if cancel.is_cancelled() {
        info!("scrape cycle interrupted, keeping previously stored data");
        return;
    }
    if report.sailings.is_empty() && !report.failures.is_empty() {
        warn!("every operator failed this cycle, keeping previously stored data");
        return;
    }

    match store.replace(&report.sailings, app_env.refresh_policy).await {
        Ok(()) => info!(
            "scrape cycle complete: {} records stored, {} operator(s) failed",
            report.sailings.len(),
            report.failures.len()
        ),
        Err(e) => error!("failed to store scrape results: {e}"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .init();

    let app_env = AppEnv::load_from_env()?;
    let smtp_settings = SmtpSettings::load_from_env()?;
    let notifier = FailureNotifier::new(&smtp_settings)?;
    let store = TimetableStore::connect(&app_env.database_url).await?;

    let browser: Arc<dyn Browser> =
        Arc::new(ChromiumBrowser::launch(app_env.chromium_path.clone()).await?);
    let scrapers: Vec<Box<dyn Scraper>> = all_operators()
        .into_iter()
        .map(|config| Box::new(FerryScraper::new(config, browser.clone())) as Box<dyn Scraper>)
        .collect();

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown requested");
                cancel.cancel();
            }
        });
    }

    loop {
        run_scrape_cycle(&scrapers, &notifier, &store, &app_env, &cancel).await;

        let Some(minutes) = app_env.scrape_interval_minutes else {
            break;
        };
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(Duration::from_secs(minutes * 60)) => {}
        }
    }

    Ok(())
}
