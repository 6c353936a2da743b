use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Month, NaiveDate, NaiveDateTime};
use phf::phf_map;
use serde_with::DeserializeFromStr;
use std::str::FromStr;

use super::error::*;
use super::tz::Tz;

static PRESETS: phf::Map<&'static str, &'static str> = phf_map! {
    "iso" => "%Y-%m-%d",
    "korean" => "%Y년 %m월 %d일",
};

pub fn days_of_month(month: &Month, year: i32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month.number_from_month(), 1)?;
    if *month == Month::December {
        return Some(31);
    }
    let next = NaiveDate::from_ymd_opt(year, month.number_from_month() + 1, 1)?;

    Some(next.signed_duration_since(first).num_days() as u32)
}

/// How the `eventDate` string of a ticket is turned into a calendar day.
#[derive(Clone, Debug, PartialEq, Eq, DeserializeFromStr, derive_more::Display)]
pub enum DateFormat {
    #[display(fmt = "rfc3339")]
    Rfc3339,
    #[display(fmt = "{}", _0)]
    Pattern(String),
}

impl Default for DateFormat {
    fn default() -> Self {
        DateFormat::Pattern(PRESETS["iso"].to_owned())
    }
}

impl DateFormat {
    pub fn iso() -> Self {
        Self::default()
    }

    pub fn korean() -> Self {
        DateFormat::Pattern(PRESETS["korean"].to_owned())
    }

    /// Parses `value` and reduces it to a calendar day in `tz`.
    ///
    /// Patterns without a time zone are taken as already local to `tz`; the
    /// time of day, if any, is dropped.
    pub fn parse(&self, value: &str, tz: &Tz) -> Result<NaiveDate> {
        let value = value.trim();

        match self {
            DateFormat::Rfc3339 => Ok(tz.date_of(&DateTime::parse_from_rfc3339(value)?)),
            // Offset-carrying patterns first, chrono would otherwise accept them
            // as a plain date and skip the conversion to `tz`
            DateFormat::Pattern(pattern) => DateTime::parse_from_str(value, pattern)
                .map(|dt| tz.date_of(&dt))
                .or_else(|_| NaiveDate::parse_from_str(value, pattern))
                .or_else(|err| {
                    NaiveDateTime::parse_from_str(value, pattern)
                        .map(|dt| dt.date())
                        .map_err(|_| err)
                })
                .map_err(|err| {
                    Error::new(
                        ErrorKind::DateParse,
                        &format!("'{}' does not match '{}': {}", value, pattern, err),
                    )
                }),
        }
    }
}

impl FromStr for DateFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lowercase = s.to_lowercase();

        if lowercase == "rfc3339" {
            return Ok(DateFormat::Rfc3339);
        }

        if let Some(pattern) = PRESETS.get(lowercase.as_str()) {
            return Ok(DateFormat::Pattern((*pattern).to_owned()));
        }

        if s.is_empty() || StrftimeItems::new(s).any(|item| item == Item::Error) {
            return Err(Error::new(
                ErrorKind::ParseError,
                &format!("Date format '{}' not recognized", s),
            ));
        }

        Ok(DateFormat::Pattern(s.to_owned()))
    }
}
