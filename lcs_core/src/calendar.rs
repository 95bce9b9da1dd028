//! Turn the entrées of each day into all-day iCalendar events.

use std::{fmt, fs, path::Path, str::FromStr, sync::OnceLock};

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use ical::{
    generator::{IcalCalendar, IcalCalendarBuilder, IcalEvent, IcalEventBuilder, Property},
    ical_property,
};
use regex::Regex;
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    extract::DayEntrees,
};

static PROD_ID: &str = "-//School Lunch Menu//linqconnect.com";
static FORMAT: &str = "%Y%m%d";
static TITLE: &str = "School Lunch - Main Entree";
static LINE_LENGTH: usize = 75;

/// How the summary of an event is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleStyle {
    /// Always `School Lunch - Main Entree`.
    Fixed,
    /// `School Lunch - Main Entree (2025-08-21: Pizza, Salad)`
    #[default]
    DateAndItems,
}

impl FromStr for TitleStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "fixed" => Ok(TitleStyle::Fixed),
            "date_and_items" => Ok(TitleStyle::DateAndItems),
            _ => Err(Error::Config(format!("unknown title style `{s}`"))),
        }
    }
}

impl fmt::Display for TitleStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TitleStyle::Fixed => f.write_str("fixed"),
            TitleStyle::DateAndItems => f.write_str("date_and_items"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub title: String,
    pub date: NaiveDate,
    /// The entrées, one per line.
    pub description: String,
}

/// One event per day, in the order of the days.
pub fn events(day_entrees: &DayEntrees, title_style: TitleStyle) -> Vec<CalendarEvent> {
    day_entrees
        .iter()
        .map(|(date, entrees)| {
            let title = match title_style {
                TitleStyle::Fixed => String::from(TITLE),
                TitleStyle::DateAndItems => format!(
                    "{TITLE} ({}: {})",
                    date.format("%Y-%m-%d"),
                    entrees.join(", ")
                ),
            };
            CalendarEvent {
                title,
                date: *date,
                description: entrees.join("\n"),
            }
        })
        .collect()
}

/// Build the calendar for the events of one building.
pub fn get_calendar(building_id: &str, events: &[CalendarEvent], timezone: Tz) -> IcalCalendar {
    get_calendar_at(building_id, events, timezone, Utc::now())
}

/// Build the calendar, stamping every event with `now` in the wall clock time of `timezone`.
fn get_calendar_at(
    building_id: &str,
    events: &[CalendarEvent],
    timezone: Tz,
    now: DateTime<Utc>,
) -> IcalCalendar {
    let changed = now
        .with_timezone(&timezone)
        .format("%Y%m%dT%H%M%S")
        .to_string();
    let mut calendar = IcalCalendarBuilder::version("2.0")
        .gregorian()
        .prodid(PROD_ID)
        .build();
    for event in events {
        calendar
            .events
            .push(get_event(building_id, event, timezone.name(), &changed));
    }
    calendar
}

fn get_event(building_id: &str, event: &CalendarEvent, timezone: &str, changed: &str) -> IcalEvent {
    IcalEventBuilder::tzid(timezone)
        .uid(uid(building_id, &event.date))
        .changed(changed)
        .one_day(event.date.format(FORMAT).to_string())
        .set(ical_property!("SUMMARY", escape_text(&event.title)))
        .set(ical_property!("DESCRIPTION", escape_text(&event.description)))
        .set(ical_property!("TRANSP", "TRANSPARENT"))
        .build()
}

/// Get a unique id for the lunch of a specific building on a specific date.
///
/// Changing this function is a breaking change!
fn uid(building_id: &str, date: &NaiveDate) -> String {
    let whitespace_regex = Regex::new(r"\s+").unwrap();
    let building_id = whitespace_regex.replace_all(building_id, "-");
    format!("SchoolLunch_{building_id}_{}@linqconnect.com", date.format(FORMAT))
}

/// Escape a TEXT value as described in RFC 5545, section 3.3.11.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            _ => escaped.push(character),
        }
    }
    escaped
}

/// Generate the calendar text, without UTC markers on timestamps.
pub fn serialize(calendar: &IcalCalendar) -> String {
    strip_utc_markers(&emit(calendar))
}

/// Write the calendar as content lines, see RFC 5545, section 3.1.
fn emit(calendar: &IcalCalendar) -> String {
    let mut lines = vec![String::from("BEGIN:VCALENDAR")];
    lines.extend(calendar.properties.iter().map(content_line));
    for event in &calendar.events {
        lines.push(String::from("BEGIN:VEVENT"));
        lines.extend(event.properties.iter().map(content_line));
        lines.push(String::from("END:VEVENT"));
    }
    lines.push(String::from("END:VCALENDAR"));
    lines
        .iter()
        .map(|line| fold_line(line) + "\r\n")
        .collect()
}

fn content_line(property: &Property) -> String {
    let mut line = property.name.clone();
    for (name, values) in property.params.iter().flatten() {
        let values: Vec<String> = values.iter().map(|value| param_value(value)).collect();
        line.push_str(&format!(";{name}={}", values.join(",")));
    }
    line.push(':');
    line.push_str(property.value.as_deref().unwrap_or_default());
    line
}

fn param_value(value: &str) -> String {
    if value.contains([':', ';', ',']) {
        format!("\"{}\"", value.replace('"', ""))
    } else {
        String::from(value)
    }
}

/// Fold a content line into lines of at most 75 octets without splitting a character.
fn fold_line(line: &str) -> String {
    let mut folded = String::with_capacity(line.len() + line.len() / LINE_LENGTH * 3);
    let mut rest = line;
    // continuation lines start with a space
    let mut limit = LINE_LENGTH;
    while rest.len() > limit {
        let mut split = limit;
        while !rest.is_char_boundary(split) {
            split -= 1;
        }
        folded.push_str(&rest[..split]);
        folded.push_str("\r\n ");
        rest = &rest[split..];
        limit = LINE_LENGTH - 1;
    }
    folded.push_str(rest);
    folded
}

/// Remove the trailing UTC `Z` from timestamp lines, leaving all other lines as they are.
fn strip_utc_markers(ics: &str) -> String {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = REGEX.get_or_init(|| {
        Regex::new(r"(?m)^((?:DTSTAMP|DTSTART|DTEND|CREATED|LAST-MODIFIED)[;:][^\r\n]*\d)Z(\r?)$")
            .unwrap()
    });
    regex.replace_all(ics, "${1}${2}").into_owned()
}

/// Write the calendar to `path`, replacing any previous file.
pub fn write_calendar(path: &Path, calendar: &IcalCalendar) -> Result<()> {
    fs::write(path, serialize(calendar))?;
    Ok(())
}
