use chrono::{Datelike, NaiveDate, Weekday};
use xive::calendar::{build_month_grid, GridConfig, GridLayout, WeekStart, YearMonth, GRID_CELLS};
use xive::provider::{decode_tickets, EventRecord, Tz};

fn config(week_start: WeekStart, layout: GridLayout) -> GridConfig {
    GridConfig {
        week_start,
        layout,
        timezone: Tz::utc(),
        ..GridConfig::default()
    }
}

fn all_months() -> impl Iterator<Item = YearMonth> {
    (1999..=2030).flat_map(|year| (1..=12).map(move |month| YearMonth::new(year, month).unwrap()))
}

fn all_configs() -> Vec<GridConfig> {
    vec![
        config(WeekStart::Sunday, GridLayout::SixWeeks),
        config(WeekStart::Monday, GridLayout::SixWeeks),
        config(WeekStart::Sunday, GridLayout::NaturalWeeks),
        config(WeekStart::Monday, GridLayout::NaturalWeeks),
    ]
}

#[test]
fn whole_weeks_only() {
    for config in all_configs() {
        for month in all_months() {
            let cells = build_month_grid(month, &[], &config).unwrap();
            assert_eq!(cells.len() % 7, 0, "{} {:?}", month, config.layout);

            if config.layout == GridLayout::SixWeeks {
                assert_eq!(cells.len(), GRID_CELLS, "{}", month);
            } else {
                assert!(cells.len() <= GRID_CELLS, "{}", month);
            }
        }
    }
}

#[test]
fn consecutive_days_without_gaps() {
    for config in all_configs() {
        for month in all_months() {
            let cells = build_month_grid(month, &[], &config).unwrap();
            for pair in cells.windows(2) {
                assert_eq!(pair[0].date.succ_opt().unwrap(), pair[1].date);
            }
        }
    }
}

#[test]
fn every_day_of_the_month_once() {
    for config in all_configs() {
        for month in all_months() {
            let cells = build_month_grid(month, &[], &config).unwrap();
            let days: Vec<NaiveDate> = cells
                .iter()
                .filter(|cell| !cell.is_padding)
                .map(|cell| cell.date)
                .collect();

            let expected: Vec<NaiveDate> = month
                .first_day()
                .iter_days()
                .take_while(|date| *date <= month.last_day())
                .collect();

            assert_eq!(days, expected, "{}", month);
            assert!(cells
                .iter()
                .filter(|cell| cell.is_padding)
                .all(|cell| cell.date.month() != month.month().number_from_month()));
        }
    }
}

#[test]
fn first_cell_is_week_start() {
    for month in all_months() {
        let monday = build_month_grid(month, &[], &config(WeekStart::Monday, GridLayout::SixWeeks))
            .unwrap();
        assert_eq!(monday[0].weekday(), Weekday::Mon);

        let sunday = build_month_grid(month, &[], &config(WeekStart::Sunday, GridLayout::NaturalWeeks))
            .unwrap();
        assert_eq!(sunday[0].weekday(), Weekday::Sun);
        assert_eq!(sunday.last().unwrap().weekday(), Weekday::Sat);
    }
}

#[test]
fn february_2024_monday_six_weeks() {
    let cells = build_month_grid(
        YearMonth::new(2024, 2).unwrap(),
        &[],
        &config(WeekStart::Monday, GridLayout::SixWeeks),
    )
    .unwrap();

    assert_eq!(cells.len(), 42);
    assert_eq!(cells[0].date, NaiveDate::from_ymd_opt(2024, 1, 29).unwrap());
    assert_eq!(cells[41].date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
}

#[test]
fn tickets_from_payload_end_up_on_their_day() {
    let tickets = decode_tickets(
        r#"{"data": [
            {"id": 10, "eventDate": "2024-05-15", "title": "Frida", "isEligible": true},
            {"id": 11, "eventDate": "2024-05-15", "title": "Frida again", "isEligible": true},
            {"id": 12, "eventDate": "2024-05-15", "title": "Not bought", "isEligible": false},
            {"id": 13, "eventDate": "someday", "isEligible": true},
            {"id": 14, "eventDate": "2024-04-30", "isEligible": true},
            {"id": 15, "eventDate": "2024-06-01", "isEligible": true}
        ]}"#,
    )
    .unwrap();
    assert_eq!(tickets.len(), 6);

    let cells = build_month_grid(
        YearMonth::new(2024, 5).unwrap(),
        &tickets,
        &config(WeekStart::Sunday, GridLayout::SixWeeks),
    )
    .unwrap();

    let target = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
    let trailing = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    assert!(cells.iter().any(|cell| cell.date == trailing && cell.is_padding));

    for cell in &cells {
        let ids: Vec<i64> = cell.events.iter().map(|event| event.id).collect();
        if cell.date == target {
            assert_eq!(ids, vec![10, 11]);
        } else {
            assert!(ids.is_empty(), "{} has {:?}", cell.date, ids);
        }
    }
}

#[test]
fn empty_event_list_is_not_an_error() {
    let events: Vec<EventRecord> = Vec::new();
    let cells = build_month_grid(
        YearMonth::new(2024, 5).unwrap(),
        &events,
        &GridConfig::default(),
    )
    .unwrap();

    assert!(cells.iter().all(|cell| cell.events.is_empty()));
}
