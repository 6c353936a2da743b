use chrono::format::{Item, StrftimeItems};
use chrono::{Datelike, Days, Month, NaiveDate, Weekday};
use itertools::Itertools;
use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, map_res, opt, recognize};
use nom::sequence::{pair, separated_pair};
use num_traits::FromPrimitive;
use serde::Deserialize;
use serde_with::DeserializeFromStr;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::{self, Write};
use std::str::FromStr;

use crate::provider::{days_of_month, DateFormat, Error, ErrorKind, EventRecord, Result, Tz};

pub const DAYS_IN_WEEK: usize = 7;
pub const GRID_CELLS: usize = 6 * DAYS_IN_WEEK;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, DeserializeFromStr)]
pub enum WeekStart {
    Sunday,
    #[default]
    Monday,
}

impl WeekStart {
    pub fn weekday(&self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    /// Column of `weekday` in a row starting at this day.
    pub fn offset_of(&self, weekday: Weekday) -> u32 {
        match self {
            WeekStart::Sunday => weekday.num_days_from_sunday(),
            WeekStart::Monday => weekday.num_days_from_monday(),
        }
    }

    /// Weekdays in column order.
    pub fn weekdays(&self) -> [Weekday; DAYS_IN_WEEK] {
        let mut days = [self.weekday(); DAYS_IN_WEEK];
        for idx in 1..DAYS_IN_WEEK {
            days[idx] = days[idx - 1].succ();
        }
        days
    }
}

impl FromStr for WeekStart {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sun" | "sunday" => Ok(WeekStart::Sunday),
            "mon" | "monday" => Ok(WeekStart::Monday),
            _ => Err(Error::new(
                ErrorKind::ParseError,
                &format!("'{}' is not a valid start of the week", s),
            )),
        }
    }
}

/// How many trailing padding days a grid receives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, DeserializeFromStr)]
pub enum GridLayout {
    /// Always six full weeks.
    #[default]
    SixWeeks,
    /// Only up to the end of the week containing the last day of the month.
    NaturalWeeks,
}

impl FromStr for GridLayout {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "six-weeks" | "fixed" => Ok(GridLayout::SixWeeks),
            "natural" | "natural-weeks" => Ok(GridLayout::NaturalWeeks),
            _ => Err(Error::new(
                ErrorKind::ParseError,
                &format!("'{}' is not a valid grid layout", s),
            )),
        }
    }
}

/// strftime pattern used for the text of a day cell.
#[derive(Clone, Debug, PartialEq, Eq, DeserializeFromStr)]
pub struct LabelFormat(String);

impl Default for LabelFormat {
    fn default() -> Self {
        LabelFormat("%-d".to_owned())
    }
}

impl LabelFormat {
    pub fn label_of(&self, date: &NaiveDate) -> String {
        let mut label = String::new();
        // Patterns asking for time or offset fields cannot be rendered from a date
        if write!(&mut label, "{}", date.format(&self.0)).is_err() {
            label.clear();
            label.push_str(&date.day().to_string());
        }
        label
    }
}

impl FromStr for LabelFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() || StrftimeItems::new(s).any(|item| item == Item::Error) {
            return Err(Error::new(
                ErrorKind::ParseError,
                &format!("Day label '{}' not recognized", s),
            ));
        }
        Ok(LabelFormat(s.to_owned()))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub week_start: WeekStart,
    pub layout: GridLayout,
    pub date_format: DateFormat,
    pub timezone: Tz,
    pub day_label: LabelFormat,
}

/// A month of the proleptic Gregorian calendar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YearMonth {
    year: i32,
    month: Month,
    first: NaiveDate,
    last: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        let value = Month::from_u32(month).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidMonth,
                &format!("{} is not a month", month),
            )
        })?;

        let out_of_range = || {
            Error::new(
                ErrorKind::InvalidMonth,
                &format!("{:04}-{:02} is out of the supported range", year, month),
            )
        };

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(out_of_range)?;
        let num_days = days_of_month(&value, year).ok_or_else(out_of_range)?;
        let last = NaiveDate::from_ymd_opt(year, month, num_days).ok_or_else(out_of_range)?;

        Ok(YearMonth {
            year,
            month: value,
            first,
            last,
        })
    }

    /// The month containing `date`.
    pub fn of<D: Datelike>(date: &D) -> Result<Self> {
        Self::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last
    }

    pub fn num_days(&self) -> u32 {
        self.last.day()
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.first <= *date && *date <= self.last
    }

    pub fn succ(&self) -> Result<Self> {
        match self.month {
            Month::December => Self::new(self.year + 1, 1),
            month => Self::new(self.year, month.succ().number_from_month()),
        }
    }

    pub fn pred(&self) -> Result<Self> {
        match self.month {
            Month::January => Self::new(self.year - 1, 12),
            month => Self::new(self.year, month.pred().number_from_month()),
        }
    }
}

impl PartialOrd for YearMonth {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for YearMonth {
    fn cmp(&self, other: &Self) -> Ordering {
        self.first.cmp(&other.first)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month.number_from_month())
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (_, (year, month)) = all_consuming(separated_pair(
            map_res(
                recognize(pair(opt(char::<_, (&str, nom::error::ErrorKind)>('-')), digit1)),
                |s: &str| s.parse::<i32>(),
            ),
            char('-'),
            map_res(digit1, |s: &str| s.parse::<u32>()),
        ))(s.trim())
        .map_err(|_| {
            Error::new(
                ErrorKind::InvalidMonth,
                &format!("'{}' is not of the form YYYY-MM", s),
            )
        })?;

        YearMonth::new(year, month)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    pub label: String,
    pub is_padding: bool,
    pub events: Vec<&'a EventRecord>,
}

impl<'a> DayCell<'a> {
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }
}

impl fmt::Display for DayCell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Groups eligible records by the calendar day they fall on.
///
/// Records whose date does not parse are dropped. Within a day the input
/// order is kept.
pub fn events_by_day<'a>(
    events: &'a [EventRecord],
    config: &GridConfig,
) -> HashMap<NaiveDate, Vec<&'a EventRecord>> {
    events
        .iter()
        .filter(|event| event.is_eligible)
        .filter_map(|event| {
            match config
                .date_format
                .parse(&event.event_date, &config.timezone)
            {
                Ok(date) => Some((date, event)),
                Err(err) => {
                    log::debug!("Ignoring ticket {}: {}", event.id, err);
                    None
                }
            }
        })
        .into_group_map()
}

/// Builds the day cells shown for `target`, whole weeks only.
///
/// The first cell falls on `config.week_start`. Padding cells before and
/// after the month never carry events.
pub fn build_month_grid<'a>(
    target: YearMonth,
    events: &'a [EventRecord],
    config: &GridConfig,
) -> Result<Vec<DayCell<'a>>> {
    let first = target.first_day();

    let leading = config.week_start.offset_of(first.weekday()) as usize;
    let natural = leading + target.num_days() as usize;
    let trailing = (DAYS_IN_WEEK - natural % DAYS_IN_WEEK) % DAYS_IN_WEEK;

    let total = match config.layout {
        GridLayout::SixWeeks => (natural + trailing).max(GRID_CELLS),
        GridLayout::NaturalWeeks => natural + trailing,
    };

    let out_of_range = || {
        Error::new(
            ErrorKind::InvalidMonth,
            &format!("The grid of {} leaves the supported date range", target),
        )
    };

    let start = first
        .checked_sub_days(Days::new(leading as u64))
        .ok_or_else(out_of_range)?;
    start
        .checked_add_days(Days::new(total as u64 - 1))
        .ok_or_else(out_of_range)?;

    let mut by_day = events_by_day(events, config);

    let cells: Vec<DayCell> = start
        .iter_days()
        .take(total)
        .map(|date| {
            let is_padding = !target.contains(&date);
            let events = if is_padding {
                Vec::new()
            } else {
                by_day.remove(&date).unwrap_or_default()
            };

            DayCell {
                date,
                label: config.day_label.label_of(&date),
                is_padding,
                events,
            }
        })
        .collect();

    log::debug!(
        "Built grid for {}: {} cells starting {}",
        target,
        cells.len(),
        start
    );

    Ok(cells)
}
