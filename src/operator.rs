//! Per-operator scraping configuration.
//!
//! Every ferry company publishes its timetable with its own markup, date
//! format and calendar widget. One `OperatorConfig` value captures all of
//! it; the scrape skeleton and extractor are generic over the config, so
//! adding an operator means adding a constructor here and nothing else.

/// A direction of travel tied to the page region that lists it.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    pub table_selector: &'static str,
    pub origin: &'static str,
    pub destination: &'static str,
}

/// How a route region breaks the week into days.
#[derive(Debug, Clone)]
pub enum DayGroups {
    /// One table row per day, one cell per departure time. Rows without
    /// data cells (header rows) are furniture, not days.
    TableRows {
        row_selector: &'static str,
        cell_selector: &'static str,
    },
    /// One block element per day with a nested list of time elements.
    DayBlocks {
        block_selector: &'static str,
        time_selector: &'static str,
    },
}

/// Selectors for the date-picker widget used to page to later weeks.
#[derive(Debug, Clone)]
pub struct CalendarConfig {
    pub open_button: &'static str,
    pub container: &'static str,
    pub widget: &'static str,
    pub month_label: &'static str,
    pub year_label: &'static str,
    pub next_button: &'static str,
    pub prev_button: &'static str,
    /// Displayed month names in calendar order, matched case-insensitively.
    pub month_names: [&'static str; 12],
}

/// What to do when a later week cannot be reached on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekPolicy {
    /// Keep the weeks already extracted and stop paging.
    Truncate,
    /// Fail the operator's whole call.
    Strict,
}

#[derive(Debug, Clone)]
pub struct OperatorConfig {
    pub company: &'static str,
    pub timetable_url: &'static str,
    pub start_date_selector: &'static str,
    /// chrono format of the displayed start date, e.g. `%d/%m/%Y`.
    pub start_date_format: &'static str,
    /// chrono format of a departure cell, e.g. `%H:%M`.
    pub time_format: &'static str,
    pub routes: Vec<RouteConfig>,
    pub day_groups: DayGroups,
    pub calendar: CalendarConfig,
    pub week_policy: WeekPolicy,
}

const FRENCH_MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// The jQuery-UI datepicker all three operators embed.
fn datepicker() -> CalendarConfig {
    CalendarConfig {
        open_button: "#bt_show_calendar",
        container: "#datepicker",
        widget: "#datepicker .ui-datepicker-calendar",
        month_label: "#datepicker .ui-datepicker-month",
        year_label: "#datepicker .ui-datepicker-year",
        next_button: "#datepicker .ui-datepicker-next",
        prev_button: "#datepicker .ui-datepicker-prev",
        month_names: FRENCH_MONTHS,
    }
}

fn tahiti_moorea_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig {
            table_selector: "#horaires-table-tahiti-moo",
            origin: "Tahiti",
            destination: "Moorea",
        },
        RouteConfig {
            table_selector: "#horaires-table-moo-tahiti",
            origin: "Moorea",
            destination: "Tahiti",
        },
    ]
}

pub fn vaearai() -> OperatorConfig {
    OperatorConfig {
        company: "Vaearai",
        timetable_url: "https://www.vaearai.com/horaires/",
        start_date_selector: "#startDate",
        start_date_format: "%d/%m/%Y",
        time_format: "%H:%M",
        routes: tahiti_moorea_routes(),
        day_groups: DayGroups::TableRows {
            row_selector: "tr",
            cell_selector: "td",
        },
        calendar: datepicker(),
        week_policy: WeekPolicy::Truncate,
    }
}

pub fn terevau() -> OperatorConfig {
    OperatorConfig {
        company: "Terevau",
        timetable_url: "https://www.terevau.pf/horaires/",
        start_date_selector: "#startDate",
        start_date_format: "%d/%m/%Y",
        time_format: "%H:%M",
        routes: tahiti_moorea_routes(),
        day_groups: DayGroups::TableRows {
            row_selector: "tbody tr",
            cell_selector: "td",
        },
        calendar: datepicker(),
        week_policy: WeekPolicy::Truncate,
    }
}

pub fn aremiti() -> OperatorConfig {
    OperatorConfig {
        company: "Aremiti",
        timetable_url: "https://www.aremitiexpress.com/en/home/",
        start_date_selector: "#startDate",
        start_date_format: "%d/%m/%Y",
        time_format: "%H:%M",
        routes: tahiti_moorea_routes(),
        day_groups: DayGroups::DayBlocks {
            block_selector: ".day-of-week",
            time_selector: ".trip-date",
        },
        calendar: datepicker(),
        week_policy: WeekPolicy::Truncate,
    }
}

/// Every operator the service scrapes, in run order.
pub fn all_operators() -> Vec<OperatorConfig> {
    vec![aremiti(), terevau(), vaearai()]
}
