//! Settings of a run, merged from command line flags and a YAML file.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono_tz::Tz;
use serde::Deserialize;
use tracing::debug;

use crate::{
    calendar::TitleStyle,
    error::{Error, Result},
    extract::MenuFilter,
    menu_client,
};

pub static CONFIG_FILE: &str = "config.yaml";
pub static OUTPUT_FILE: &str = "school_lunch_menu.ics";
pub static TIMEZONE: &str = "America/New_York";

/// Where the start and end date are taken from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    /// Only the command line flags.
    Cli,
    /// Only the configuration file.
    ConfigFile,
    /// The flags, falling back to the configuration file.
    #[default]
    Merged,
}

impl FromStr for DateSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "cli" => Ok(DateSource::Cli),
            "config_file" => Ok(DateSource::ConfigFile),
            "merged" => Ok(DateSource::Merged),
            _ => Err(Error::Config(format!("unknown date source `{s}`"))),
        }
    }
}

/// Settings as given by one source, everything may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PartialSettings {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub building_id: Option<String>,
    pub district_id: Option<String>,
    pub plan_name_prefix: Option<String>,
    pub title_style: Option<TitleStyle>,
    pub date_source: Option<DateSource>,
    pub output: Option<PathBuf>,
    pub timezone: Option<String>,
    pub api_url: Option<String>,
}

impl PartialSettings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(PartialSettings::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = fs::read_to_string(path).map_err(|err| {
            Error::Config(format!("cannot read {}: {err}", path.display()))
        })?;
        debug!(path = %path.display(), "configuration file loaded");
        PartialSettings::from_yaml(&yaml)
    }

    /// Read the given file, or `config.yaml` in `directory` if there is one.
    pub fn discover(explicit: Option<&Path>, directory: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return PartialSettings::from_file(path);
        }
        let default_path = directory.join(CONFIG_FILE);
        if default_path.is_file() {
            return PartialSettings::from_file(&default_path);
        }
        Ok(PartialSettings::default())
    }
}

/// Complete settings of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub start_date: String,
    pub end_date: String,
    pub building_id: String,
    pub district_id: String,
    pub filter: MenuFilter,
    pub title_style: TitleStyle,
    pub output: PathBuf,
    pub timezone: Tz,
    pub api_url: String,
}

impl Settings {
    /// Merge flags and file, flags win unless the date source says otherwise.
    pub fn merge(cli: PartialSettings, file: PartialSettings) -> Result<Self> {
        let date_source = cli.date_source.or(file.date_source).unwrap_or_default();
        let (start_date, end_date) = match date_source {
            DateSource::Cli => (cli.start_date, cli.end_date),
            DateSource::ConfigFile => (file.start_date, file.end_date),
            DateSource::Merged => (
                cli.start_date.or(file.start_date),
                cli.end_date.or(file.end_date),
            ),
        };
        let filter = cli
            .plan_name_prefix
            .or(file.plan_name_prefix)
            .map(|prefix| MenuFilter::with_plan_name_prefix(&prefix))
            .unwrap_or_default();
        Ok(Settings {
            start_date: required(start_date, "start_date")?,
            end_date: required(end_date, "end_date")?,
            building_id: required(cli.building_id.or(file.building_id), "building_id")?,
            district_id: required(cli.district_id.or(file.district_id), "district_id")?,
            filter,
            title_style: cli.title_style.or(file.title_style).unwrap_or_default(),
            output: cli
                .output
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(OUTPUT_FILE)),
            timezone: timezone(
                cli.timezone
                    .or(file.timezone)
                    .as_deref()
                    .unwrap_or(TIMEZONE),
            )?,
            api_url: cli
                .api_url
                .or(file.api_url)
                .unwrap_or_else(|| String::from(menu_client::URL)),
        })
    }
}

/// An IANA timezone name like `America/New_York`.
fn timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| Error::Config(format!("unknown timezone `{name}`")))
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config(format!("missing required value `{name}`"))),
    }
}
