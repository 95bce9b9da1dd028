//! This crate turns a school's LinqConnect lunch menu into an iCalendar file.
//!
//! Every school day with a main entrée becomes one all-day event.
//! The menu is read from <https://api.linqconnect.com/api/FamilyMenu>.

use std::path::PathBuf;

use chrono::NaiveDate;
use ical::generator::IcalCalendar;
use tracing::info;

pub use ical;

pub mod calendar;
pub mod config;
pub mod date_range;
pub mod error;
pub mod extract;
pub mod menu;
pub mod menu_client;

pub use error::{Error, Result};

use crate::{config::Settings, date_range::ResolvedRange, menu_client::MenuClient};

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub path: PathBuf,
    pub range: ResolvedRange,
    pub event_count: usize,
}

/// Get the lunch calendar described by the settings.
///
/// Relative dates are counted from `today`.
pub async fn get(settings: &Settings, today: NaiveDate) -> Result<(IcalCalendar, ResolvedRange)> {
    let range = date_range::resolve(&settings.start_date, &settings.end_date, today)?;
    let client = MenuClient::with_base_url(&settings.api_url);
    let menu = client
        .fetch(&settings.building_id, &settings.district_id, &range)
        .await?;
    let day_entrees = extract::extract(&menu, &settings.filter);
    let events = calendar::events(&day_entrees, settings.title_style);
    let calendar = calendar::get_calendar(&settings.building_id, &events, settings.timezone);
    Ok((calendar, range))
}

/// Get the lunch calendar and write it to the configured output file.
///
/// Nothing is written if fetching or parsing the menu fails.
pub async fn run(settings: &Settings, today: NaiveDate) -> Result<RunSummary> {
    let (calendar, range) = get(settings, today).await?;
    calendar::write_calendar(&settings.output, &calendar)?;
    let summary = RunSummary {
        path: settings.output.clone(),
        range,
        event_count: calendar.events.len(),
    };
    info!(
        path = %summary.path.display(),
        events = summary.event_count,
        "calendar written"
    );
    Ok(summary)
}
