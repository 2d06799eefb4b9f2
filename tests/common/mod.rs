//! In-memory fake of the browser boundary.
//!
//! Holds selector → text/html maps plus a tiny model of the date-picker
//! widget (displayed month, clamped paging range, selectable day cells), so
//! the navigation and scrape flows can be exercised without a browser.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use ferrytide::{Browser, BrowserError, CalendarConfig, Page};

#[derive(Default)]
pub struct FakeState {
    /// Selectors that exist on the page (for waits and clicks).
    pub present: HashSet<String>,
    pub texts: HashMap<String, String>,
    pub html: HashMap<String, String>,
    /// Date-picker state: displayed (year, month).
    pub displayed: (i32, u32),
    /// Paging stops at these bounds; clicks beyond them change nothing.
    pub min_display: (i32, u32),
    pub max_display: (i32, u32),
    pub calendar_open: bool,
    /// Day-cell selectors that exist on the widget.
    pub selectable_days: HashSet<String>,
    /// html overrides applied when the given day cell is clicked.
    pub swap_on_day: HashMap<String, HashMap<String, String>>,
    /// Selectors removed from the page when any day cell is clicked.
    pub drop_on_day: HashSet<String>,
    pub clicks: Vec<String>,
    pub visited: Vec<String>,
    pub closed: bool,
}

impl FakeState {
    pub fn new(displayed: (i32, u32)) -> Self {
        Self {
            displayed,
            min_display: (1970, 1),
            max_display: (9999, 12),
            ..Self::default()
        }
    }
}

/// The day-cell selector the jQuery-UI widget exposes for a date.
pub fn day_cell(container: &str, date: NaiveDate) -> String {
    format!(
        "{} td[data-month='{}'][data-year='{}'] a[data-date='{}']",
        container,
        date.month0(),
        date.year(),
        date.day()
    )
}

fn next_month(display: (i32, u32)) -> (i32, u32) {
    if display.1 == 12 {
        (display.0 + 1, 1)
    } else {
        (display.0, display.1 + 1)
    }
}

fn prev_month(display: (i32, u32)) -> (i32, u32) {
    if display.1 == 1 {
        (display.0 - 1, 12)
    } else {
        (display.0, display.1 - 1)
    }
}

pub struct FakePage {
    pub state: Arc<Mutex<FakeState>>,
    pub calendar: CalendarConfig,
}

#[async_trait]
impl Page for FakePage {
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        self.state.lock().unwrap().visited.push(url.to_string());
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), BrowserError> {
        let state = self.state.lock().unwrap();
        let exists = state.present.contains(selector)
            || (selector == self.calendar.widget && state.calendar_open);
        if exists {
            Ok(())
        } else {
            Err(BrowserError::WaitTimeout {
                selector: selector.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            })
        }
    }

    async fn text(&self, selector: &str) -> Result<String, BrowserError> {
        let state = self.state.lock().unwrap();
        if selector == self.calendar.month_label {
            let (_, month) = state.displayed;
            return Ok(self.calendar.month_names[month as usize - 1].to_string());
        }
        if selector == self.calendar.year_label {
            return Ok(state.displayed.0.to_string());
        }
        state
            .texts
            .get(selector)
            .cloned()
            .ok_or_else(|| BrowserError::NotFound {
                selector: selector.to_string(),
            })
    }

    async fn html(&self, selector: &str) -> Result<String, BrowserError> {
        let state = self.state.lock().unwrap();
        state
            .html
            .get(selector)
            .cloned()
            .ok_or_else(|| BrowserError::NotFound {
                selector: selector.to_string(),
            })
    }

    async fn click(&self, selector: &str) -> Result<(), BrowserError> {
        let mut state = self.state.lock().unwrap();
        state.clicks.push(selector.to_string());

        if selector == self.calendar.open_button {
            state.calendar_open = true;
            return Ok(());
        }
        if selector == self.calendar.next_button {
            if state.displayed < state.max_display {
                state.displayed = next_month(state.displayed);
            }
            return Ok(());
        }
        if selector == self.calendar.prev_button {
            if state.displayed > state.min_display {
                state.displayed = prev_month(state.displayed);
            }
            return Ok(());
        }
        if selector.starts_with(self.calendar.container) && selector.contains("data-date") {
            if !state.selectable_days.contains(selector) {
                return Err(BrowserError::NotFound {
                    selector: selector.to_string(),
                });
            }
            if let Some(overrides) = state.swap_on_day.get(selector).cloned() {
                state.html.extend(overrides);
            }
            let dropped: Vec<String> = state.drop_on_day.iter().cloned().collect();
            for gone in dropped {
                state.present.remove(&gone);
            }
            return Ok(());
        }
        if state.present.contains(selector) {
            Ok(())
        } else {
            Err(BrowserError::NotFound {
                selector: selector.to_string(),
            })
        }
    }

    async fn close(self: Box<Self>) -> Result<(), BrowserError> {
        self.state.lock().unwrap().closed = true;
        Ok(())
    }
}

pub struct FakeBrowser {
    pub state: Arc<Mutex<FakeState>>,
    pub calendar: CalendarConfig,
}

impl FakeBrowser {
    pub fn new(state: Arc<Mutex<FakeState>>, calendar: CalendarConfig) -> Self {
        Self { state, calendar }
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn new_page(&self) -> Result<Box<dyn Page>, BrowserError> {
        Ok(Box::new(FakePage {
            state: self.state.clone(),
            calendar: self.calendar.clone(),
        }))
    }
}
