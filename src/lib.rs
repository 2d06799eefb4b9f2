mod browser;
mod chromium;
mod config;
mod extractor;
mod navigator;
mod notifier;
mod operator;
mod orchestrator;
mod scrape;
mod store;
mod timetable;

pub use browser::{Browser, BrowserError, Page};
pub use chromium::ChromiumBrowser;
pub use config::{AppEnv, LoadFromEnv, SmtpSettings};
pub use extractor::extract_route;
pub use navigator::{MAX_MONTH_STEPS, go_to_week};
pub use notifier::{FailureNotifier, ScrapeFailure};
pub use operator::{
    CalendarConfig, DayGroups, OperatorConfig, RouteConfig, WeekPolicy, all_operators, aremiti,
    terevau, vaearai,
};
pub use orchestrator::{ScrapeReport, run_all};
pub use scrape::{FerryScraper, ScrapeError, Scraper};
pub use store::{RefreshPolicy, TimetableStore};
pub use timetable::Sailing;
