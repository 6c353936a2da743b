use chrono::NaiveDate;

use crate::calendar::{build_month_grid, events_by_day, DayCell, GridConfig, YearMonth};
use crate::config::Config;
use crate::provider::*;

/// Fetched tickets together with the month currently on screen.
pub struct Agenda {
    events: Vec<EventRecord>,
    config: GridConfig,
    month: YearMonth,
}

impl Agenda {
    pub fn new(events: Vec<EventRecord>, config: GridConfig, month: YearMonth) -> Self {
        Agenda {
            events,
            config,
            month,
        }
    }

    /// Starts at the current month and loads the configured ticket file, if any.
    pub fn from_config(config: &Config) -> Result<Self> {
        let events = match &config.tickets {
            Some(path) => load_tickets(path)?,
            None => Vec::new(),
        };

        let month = YearMonth::of(&config.calendar.timezone.today())?;

        Ok(Agenda::new(events, config.calendar.clone(), month))
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn set_month(&mut self, month: YearMonth) {
        self.month = month;
    }

    pub fn next_month(&mut self) -> Result<YearMonth> {
        self.month = self.month.succ()?;
        Ok(self.month)
    }

    pub fn prev_month(&mut self) -> Result<YearMonth> {
        self.month = self.month.pred()?;
        Ok(self.month)
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Replaces all tickets, e.g. after a new fetch.
    pub fn refresh(&mut self, events: Vec<EventRecord>) {
        log::debug!("Refreshing agenda with {} ticket(s)", events.len());
        self.events = events;
    }

    pub fn grid(&self) -> Result<Vec<DayCell<'_>>> {
        build_month_grid(self.month, &self.events, &self.config)
    }

    pub fn events_of_day(&self, date: &NaiveDate) -> Vec<&EventRecord> {
        events_by_day(&self.events, &self.config)
            .remove(date)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agenda() -> Agenda {
        Agenda::new(
            vec![
                EventRecord::new(1, "2024-05-15"),
                EventRecord::new(2, "2024-06-01"),
                EventRecord::new(3, "2024-06-01").eligible(false),
                EventRecord::new(4, "2024-06-01"),
            ],
            GridConfig {
                timezone: Tz::utc(),
                ..GridConfig::default()
            },
            YearMonth::new(2024, 5).unwrap(),
        )
    }

    #[test]
    fn navigation_rebuilds_grid() {
        let mut agenda = agenda();

        let may = agenda.grid().unwrap();
        assert_eq!(may.iter().filter(|c| c.has_events()).count(), 1);

        assert_eq!(agenda.next_month().unwrap(), YearMonth::new(2024, 6).unwrap());
        let june = agenda.grid().unwrap();
        let first = june.iter().find(|c| !c.is_padding).unwrap();
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(first.events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![2, 4]);

        agenda.prev_month().unwrap();
        agenda.prev_month().unwrap();
        assert_eq!(agenda.month(), YearMonth::new(2024, 4).unwrap());
    }

    #[test]
    fn events_of_day_ignores_ineligible() {
        let agenda = agenda();
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let ids: Vec<i64> = agenda.events_of_day(&date).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 4]);

        let empty = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        assert!(agenda.events_of_day(&empty).is_empty());
    }

    #[test]
    fn refresh_replaces_events() {
        let mut agenda = agenda();
        agenda.refresh(Vec::new());

        assert!(agenda.events().is_empty());
        assert!(agenda.grid().unwrap().iter().all(|c| !c.has_events()));
    }

    #[test]
    fn from_default_config() {
        let agenda = Agenda::from_config(&Config::default()).unwrap();
        assert!(agenda.events().is_empty());
        assert_eq!(agenda.grid().unwrap().len(), crate::calendar::GRID_CELLS);
    }
}
