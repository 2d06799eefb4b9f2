//! Turns a captured route region into `Sailing` records.
//!
//! The page shows at most a weekday label per day, never a date, so the
//! calendar day is assigned positionally: the day-grouping at position `i`
//! is `week_start + i` days. The day counter advances once per grouping
//! even when a grouping contributes no departures, otherwise a day with no
//! service would shift every later day backward.

use chrono::{Days, NaiveDate, NaiveTime};
use scraper::{ElementRef, Html, Selector};

use crate::operator::{DayGroups, OperatorConfig, RouteConfig};
use crate::timetable::Sailing;

fn extract_text(node: ElementRef) -> String {
    node.text().collect::<String>().replace('\u{a0}', " ")
}

/// Extract every departure of one route for the week starting at
/// `week_start`, in display order.
///
/// Cell text that does not parse under the operator's time format (weekday
/// headers, "no service" placeholders, empty cells) is skipped silently.
pub fn extract_route(
    region_html: &str,
    config: &OperatorConfig,
    route: &RouteConfig,
    week_start: NaiveDate,
) -> Vec<Sailing> {
    let fragment = Html::parse_fragment(region_html);
    let mut sailings = Vec::new();

    match &config.day_groups {
        DayGroups::TableRows {
            row_selector,
            cell_selector,
        } => {
            let row_selector = Selector::parse(row_selector).unwrap();
            let cell_selector = Selector::parse(cell_selector).unwrap();
            let mut trip_date = week_start;
            for row in fragment.select(&row_selector) {
                let cells: Vec<_> = row.select(&cell_selector).collect();
                if cells.is_empty() {
                    // Header row, not a day.
                    continue;
                }
                for cell in cells {
                    push_departure(&mut sailings, &extract_text(cell), trip_date, config, route);
                }
                trip_date = trip_date + Days::new(1);
            }
        }
        DayGroups::DayBlocks {
            block_selector,
            time_selector,
        } => {
            let block_selector = Selector::parse(block_selector).unwrap();
            let time_selector = Selector::parse(time_selector).unwrap();
            let mut trip_date = week_start;
            for block in fragment.select(&block_selector) {
                for time_node in block.select(&time_selector) {
                    push_departure(
                        &mut sailings,
                        &extract_text(time_node),
                        trip_date,
                        config,
                        route,
                    );
                }
                trip_date = trip_date + Days::new(1);
            }
        }
    }

    sailings
}

fn push_departure(
    sailings: &mut Vec<Sailing>,
    cell_text: &str,
    trip_date: NaiveDate,
    config: &OperatorConfig,
    route: &RouteConfig,
) {
    if let Ok(time) = NaiveTime::parse_from_str(cell_text.trim(), config.time_format) {
        sailings.push(Sailing {
            departure: trip_date.and_time(time),
            origin: route.origin.to_string(),
            destination: route.destination.to_string(),
            company: config.company.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::{aremiti, vaearai};
    use chrono::NaiveDate;

    fn monday() -> NaiveDate {
        // 2024-01-08 is a Monday.
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
    }

    fn departure(s: &str) -> chrono::NaiveDateTime {
        chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    const VAEARAI_WEEK: &str = r#"
        <table id="horaires-table-tahiti-moo">
          <tr><th>Jour</th><th>Départs</th></tr>
          <tr><td>Lundi</td><td>06:10</td><td>16:40</td></tr>
          <tr><td>Mardi</td><td>06:10</td></tr>
          <tr><td>Mercredi</td><td>07:30</td><td>—</td><td>18:15</td></tr>
          <tr><td>Jeudi</td><td>Pas de service</td></tr>
          <tr><td>Vendredi</td><td>09:00</td></tr>
        </table>"#;

    #[test]
    fn positional_day_assignment_composes_date_and_time() {
        let config = vaearai();
        let route = &config.routes[0];
        let sailings = extract_route(VAEARAI_WEEK, &config, route, monday());

        let departures: Vec<_> = sailings.iter().map(|s| s.departure).collect();
        assert_eq!(
            departures,
            vec![
                departure("2024-01-08 06:10"),
                departure("2024-01-08 16:40"),
                departure("2024-01-09 06:10"),
                departure("2024-01-10 07:30"),
                departure("2024-01-10 18:15"),
                departure("2024-01-12 09:00"),
            ]
        );
        assert!(sailings.iter().all(|s| s.origin == "Tahiti"
            && s.destination == "Moorea"
            && s.company == "Vaearai"));
    }

    #[test]
    fn unparsable_cells_are_skipped_but_the_day_still_advances() {
        let config = vaearai();
        let route = &config.routes[0];
        let sailings = extract_route(VAEARAI_WEEK, &config, route, monday());

        // Wednesday's "—" cell emits nothing; Thursday has no valid time at
        // all yet Friday still lands on the 12th.
        assert!(sailings.iter().any(|s| s.departure == departure("2024-01-10 07:30")));
        assert!(sailings.iter().any(|s| s.departure == departure("2024-01-10 18:15")));
        assert_eq!(
            sailings.iter().filter(|s| s.departure.date() == monday() + Days::new(2)).count(),
            2
        );
        assert!(sailings.iter().any(|s| s.departure == departure("2024-01-12 09:00")));
    }

    #[test]
    fn header_rows_without_data_cells_do_not_count_as_days() {
        let config = vaearai();
        let route = &config.routes[0];
        let sailings = extract_route(VAEARAI_WEEK, &config, route, monday());

        // The <th>-only header row must not shift Monday to Tuesday.
        assert_eq!(sailings[0].departure, departure("2024-01-08 06:10"));
    }

    #[test]
    fn day_blocks_advance_once_per_block_even_when_empty() {
        let config = aremiti();
        let route = &config.routes[0];
        let html = r#"
            <div id="horaires-table-tahiti-moo">
              <div class="day-of-week">
                <div class="header">Lundi</div>
                <span class="trip-date">05:55</span>
                <span class="trip-date">17:20</span>
              </div>
              <div class="day-of-week">
                <div class="header">Mardi</div>
              </div>
              <div class="day-of-week">
                <div class="header">Mercredi</div>
                <span class="trip-date">08:05</span>
              </div>
            </div>"#;

        let sailings = extract_route(html, &config, route, monday());
        let departures: Vec<_> = sailings.iter().map(|s| s.departure).collect();
        assert_eq!(
            departures,
            vec![
                departure("2024-01-08 05:55"),
                departure("2024-01-08 17:20"),
                departure("2024-01-10 08:05"),
            ]
        );
    }

    #[test]
    fn extraction_is_idempotent_over_a_static_fixture() {
        let config = vaearai();
        let route = &config.routes[0];
        let first = extract_route(VAEARAI_WEEK, &config, route, monday());
        let second = extract_route(VAEARAI_WEEK, &config, route, monday());
        assert_eq!(first, second);
    }

    #[test]
    fn departures_within_a_route_come_out_in_ascending_order() {
        let config = vaearai();
        let route = &config.routes[0];
        let sailings = extract_route(VAEARAI_WEEK, &config, route, monday());
        assert!(sailings.windows(2).all(|w| w[0].departure <= w[1].departure));
    }
}
