//! Pages the operator's date-picker widget to a target week.
//!
//! The widget only exposes single-month steps, so reaching a target week
//! means: open the picker, compare the displayed (month, year) with the
//! target, click next/previous until they match, then click the target day
//! and wait for the route tables to reload. The month loop is hard-bounded;
//! a widget that never converges is a navigation failure, not a hang.

use std::time::Duration;

use chrono::{Datelike, NaiveDate};

use crate::browser::{BrowserError, Page};
use crate::operator::{CalendarConfig, OperatorConfig};
use crate::scrape::ScrapeError;

/// Ceiling on month steps; three years in either direction is far beyond
/// any week a ferry operator publishes.
pub const MAX_MONTH_STEPS: u32 = 36;

/// Delay after each month click so the widget can redraw before re-reading.
pub const SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Bound on waits for the widget to open and the tables to reload.
pub const RELOAD_TIMEOUT: Duration = Duration::from_secs(15);

/// Bring the calendar to `week_start` and wait until the route tables have
/// reloaded. On return the page shows fresh data for the requested week.
pub async fn go_to_week(
    page: &dyn Page,
    config: &OperatorConfig,
    week_start: NaiveDate,
) -> Result<(), ScrapeError> {
    let cal = &config.calendar;

    page.click(cal.open_button).await.map_err(|e| match e {
        BrowserError::NotFound { selector } => {
            ScrapeError::Structure(format!("calendar button '{selector}' not found"))
        }
        other => ScrapeError::Browser(other),
    })?;
    page.wait_for(cal.widget, RELOAD_TIMEOUT)
        .await
        .map_err(|_| {
            ScrapeError::Navigation(format!("calendar widget '{}' did not open", cal.widget))
        })?;

    seek_month(page, cal, (week_start.year(), week_start.month())).await?;

    // The widget exposes days via 0-based data-month attributes.
    let day_selector = format!(
        "{} td[data-month='{}'][data-year='{}'] a[data-date='{}']",
        cal.container,
        week_start.month0(),
        week_start.year(),
        week_start.day()
    );
    page.click(&day_selector).await.map_err(|e| match e {
        BrowserError::NotFound { .. } => ScrapeError::Navigation(format!(
            "day {week_start} is not selectable on the calendar"
        )),
        other => ScrapeError::Browser(other),
    })?;

    // The caller assumes fresh data once navigation returns.
    for route in &config.routes {
        page.wait_for(route.table_selector, RELOAD_TIMEOUT)
            .await
            .map_err(|_| {
                ScrapeError::Navigation(format!(
                    "route table '{}' did not reload after selecting {week_start}",
                    route.table_selector
                ))
            })?;
    }

    Ok(())
}

/// Step the displayed month toward `target` (year, month), one click at a
/// time, until it matches or the step ceiling is hit.
async fn seek_month(
    page: &dyn Page,
    cal: &CalendarConfig,
    target: (i32, u32),
) -> Result<(), ScrapeError> {
    let mut steps = 0;
    loop {
        let shown = displayed_month(page, cal).await?;
        if shown == target {
            return Ok(());
        }
        if steps >= MAX_MONTH_STEPS {
            return Err(ScrapeError::Navigation(format!(
                "calendar stuck at {}-{:02} after {MAX_MONTH_STEPS} steps while seeking {}-{:02}",
                shown.0, shown.1, target.0, target.1
            )));
        }
        let button = if shown < target {
            cal.next_button
        } else {
            cal.prev_button
        };
        page.click(button).await.map_err(|e| match e {
            BrowserError::NotFound { selector } => {
                ScrapeError::Navigation(format!("calendar control '{selector}' not available"))
            }
            other => ScrapeError::Browser(other),
        })?;
        tokio::time::sleep(SETTLE_DELAY).await;
        steps += 1;
    }
}

async fn displayed_month(
    page: &dyn Page,
    cal: &CalendarConfig,
) -> Result<(i32, u32), ScrapeError> {
    let month_text = page.text(cal.month_label).await.map_err(|_| {
        ScrapeError::Navigation(format!("month label '{}' not readable", cal.month_label))
    })?;
    let year_text = page.text(cal.year_label).await.map_err(|_| {
        ScrapeError::Navigation(format!("year label '{}' not readable", cal.year_label))
    })?;

    let month = month_number(month_text.trim(), &cal.month_names).ok_or_else(|| {
        ScrapeError::Navigation(format!("unrecognized month label '{}'", month_text.trim()))
    })?;
    let year = year_text.trim().parse::<i32>().map_err(|_| {
        ScrapeError::Navigation(format!("unrecognized year label '{}'", year_text.trim()))
    })?;
    Ok((year, month))
}

fn month_number(label: &str, names: &[&str; 12]) -> Option<u32> {
    names
        .iter()
        .position(|name| name.eq_ignore_ascii_case(label))
        .map(|index| index as u32 + 1)
}
