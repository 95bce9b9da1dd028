//! Resolve user supplied date specifiers into a range of two calendar dates.
//!
//! A specifier is either a `MM-DD-YYYY` date, a keyword (`today`, `tomorrow`)
//! or a duration like `5d`, `2w`, `1m` or `1y`.

use std::{fmt, sync::OnceLock};

use chrono::{Days, NaiveDate};
use regex::Regex;

use crate::error::{Error, Result};

pub static FORMAT: &str = "%m-%d-%Y";

/// The units a duration can be given in.
///
/// Months and years are approximated with 30 and 365 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Day,
    Week,
    Month,
    Year,
}

impl DurationUnit {
    fn days(self) -> u64 {
        match self {
            DurationUnit::Day => 1,
            DurationUnit::Week => 7,
            DurationUnit::Month => 30,
            DurationUnit::Year => 365,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSpec {
    Today,
    Tomorrow,
    Duration(u64, DurationUnit),
    Literal(NaiveDate),
}

impl DateSpec {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let lowercase = trimmed.to_lowercase();
        match lowercase.as_str() {
            "today" => return Ok(DateSpec::Today),
            "tomorrow" => return Ok(DateSpec::Tomorrow),
            _ => {}
        }
        if let Some(captures) = duration_regex().captures(&lowercase) {
            let amount = captures["amount"]
                .parse()
                .map_err(|err| Error::date_parse(input, err))?;
            let unit = match &captures["unit"] {
                "d" => DurationUnit::Day,
                "w" => DurationUnit::Week,
                "m" => DurationUnit::Month,
                _ => DurationUnit::Year,
            };
            return Ok(DateSpec::Duration(amount, unit));
        }
        NaiveDate::parse_from_str(trimmed, FORMAT)
            .map(DateSpec::Literal)
            .map_err(|err| Error::date_parse(input, err))
    }

    fn is_duration(&self) -> bool {
        matches!(self, DateSpec::Duration(..))
    }

    /// The date this specifier stands for, durations are counted from `base`.
    fn to_date(self, today: NaiveDate, base: NaiveDate, input: &str) -> Result<NaiveDate> {
        match self {
            DateSpec::Today => Ok(today),
            DateSpec::Tomorrow => add_days(today, 1, input),
            DateSpec::Duration(amount, unit) => {
                let days = amount
                    .checked_mul(unit.days())
                    .ok_or_else(|| Error::date_parse(input, "duration is too long"))?;
                add_days(base, days, input)
            }
            DateSpec::Literal(date) => Ok(date),
        }
    }
}

fn duration_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^(?P<amount>\d+)(?P<unit>[dwmy])$").unwrap())
}

fn add_days(date: NaiveDate, days: u64, input: &str) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| Error::date_parse(input, "date is out of range"))
}

/// A start and an end date. `start <= end` is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ResolvedRange {
    /// Both dates in the format the menu API expects.
    pub fn query_dates(&self) -> (String, String) {
        (
            self.start.format(FORMAT).to_string(),
            self.end.format(FORMAT).to_string(),
        )
    }
}

impl fmt::Display for ResolvedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (start, end) = self.query_dates();
        write!(f, "{start} to {end}")
    }
}

/// Resolve a pair of date specifiers relative to `today`.
///
/// If the start is a duration, the range runs from today for that long and the
/// end specifier is ignored, even if it is a duration itself. Otherwise, if the
/// end is a duration, it is counted from the resolved start.
pub fn resolve(start: &str, end: &str, today: NaiveDate) -> Result<ResolvedRange> {
    let start_spec = DateSpec::parse(start)?;
    if start_spec.is_duration() {
        return Ok(ResolvedRange {
            start: today,
            end: start_spec.to_date(today, today, start)?,
        });
    }
    let start_date = start_spec.to_date(today, today, start)?;
    let end_date = DateSpec::parse(end)?.to_date(today, start_date, end)?;
    Ok(ResolvedRange {
        start: start_date,
        end: end_date,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::{
        date_range::{resolve, DateSpec, DurationUnit, ResolvedRange},
        error::Error,
    };

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 6, 1)
    }

    #[test]
    fn test_parse() {
        assert_eq!(DateSpec::parse("today").unwrap(), DateSpec::Today);
        assert_eq!(DateSpec::parse(" Tomorrow ").unwrap(), DateSpec::Tomorrow);
        assert_eq!(
            DateSpec::parse("2W").unwrap(),
            DateSpec::Duration(2, DurationUnit::Week)
        );
        assert_eq!(
            DateSpec::parse("06-13-2025").unwrap(),
            DateSpec::Literal(date(2025, 6, 13))
        );
        assert!(matches!(
            DateSpec::parse("2025-06-13"),
            Err(Error::DateParse { .. })
        ));
        assert!(matches!(
            DateSpec::parse("5h"),
            Err(Error::DateParse { .. })
        ));
    }

    #[test]
    fn test_resolve_literals() {
        let range = resolve("06-02-2025", "06-13-2025", today()).unwrap();
        assert_eq!(
            range,
            ResolvedRange {
                start: date(2025, 6, 2),
                end: date(2025, 6, 13),
            }
        );
        assert_eq!(
            range.query_dates(),
            ("06-02-2025".to_string(), "06-13-2025".to_string())
        );
    }

    #[test]
    fn test_resolve_inverted_literals() {
        let range = resolve("06-13-2025", "06-02-2025", today()).unwrap();
        assert_eq!(range.start, date(2025, 6, 13));
        assert_eq!(range.end, date(2025, 6, 2));
    }

    #[test]
    fn test_resolve_start_duration() {
        for (spec, end) in [
            ("5d", date(2025, 6, 6)),
            ("2w", date(2025, 6, 15)),
            ("1m", date(2025, 7, 1)),
            ("1y", date(2026, 6, 1)),
        ] {
            let range = resolve(spec, "not a date", today()).unwrap();
            assert_eq!(range.start, today());
            assert_eq!(range.end, end, "{spec}");
        }
    }

    #[test]
    fn test_resolve_both_durations() {
        let range = resolve("1w", "1y", today()).unwrap();
        assert_eq!(range.start, today());
        assert_eq!(range.end, date(2025, 6, 8));
    }

    #[test]
    fn test_resolve_end_duration() {
        let range = resolve("08-20-2025", "3D", today()).unwrap();
        assert_eq!(range.start, date(2025, 8, 20));
        assert_eq!(range.end, date(2025, 8, 23));
        let range = resolve("08-20-2025", "2m", today()).unwrap();
        assert_eq!(range.end, date(2025, 10, 19));
    }

    #[test]
    fn test_resolve_keywords() {
        let range = resolve("today", "7d", today()).unwrap();
        assert_eq!(range.start, date(2025, 6, 1));
        assert_eq!(range.end, date(2025, 6, 8));
        let range = resolve("tomorrow", "1w", today()).unwrap();
        assert_eq!(range.start, date(2025, 6, 2));
        assert_eq!(range.end, date(2025, 6, 9));
        let range = resolve("today", "tomorrow", today()).unwrap();
        assert_eq!(range.end, date(2025, 6, 2));
    }

    #[test]
    fn test_resolve_invalid() {
        assert!(resolve("06/02/2025", "06-13-2025", today()).is_err());
        assert!(resolve("06-02-2025", "soon", today()).is_err());
        assert!(resolve("99999999999999999999d", "", today()).is_err());
        assert!(resolve("9999999999999y", "", today()).is_err());
    }
}
