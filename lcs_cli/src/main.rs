use std::{env::current_dir, path::PathBuf};

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use lcs_core::{
    calendar::TitleStyle,
    config::{DateSource, PartialSettings, Settings},
};
use tracing_subscriber::EnvFilter;

/// Fetch a school lunch menu from LinqConnect and write it as an iCalendar file.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Arguments {
    /// the start date, as MM-DD-YYYY, `today`, `tomorrow` or a duration like `2w`
    #[arg(long)]
    pub start_date: Option<String>,
    /// the end date, as MM-DD-YYYY, `today`, `tomorrow` or a duration like `1m`
    #[arg(long)]
    pub end_date: Option<String>,
    /// the building id of the school
    #[arg(long)]
    pub building_id: Option<String>,
    /// the district id of the school
    #[arg(long)]
    pub district_id: Option<String>,
    /// only use menu plans whose name starts with this, e.g. `Lunch- Elementary`
    #[arg(long)]
    pub plan_prefix: Option<String>,
    /// `fixed` or `date_and_items`
    #[arg(long)]
    pub title_style: Option<TitleStyle>,
    /// take the dates from `cli`, `config_file` or `merged`
    #[arg(long)]
    pub date_source: Option<DateSource>,
    /// the YAML configuration file, defaults to `config.yaml` if present
    #[arg(long, short)]
    pub config: Option<PathBuf>,
    /// the calendar file to write
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// the timezone of the events
    #[arg(long)]
    pub timezone: Option<String>,
    /// the menu endpoint
    #[arg(long, hide = true)]
    pub api_url: Option<String>,
    /// log every processed day
    #[arg(long, short)]
    pub verbose: bool,
}

impl From<&Arguments> for PartialSettings {
    fn from(value: &Arguments) -> Self {
        PartialSettings {
            start_date: value.start_date.clone(),
            end_date: value.end_date.clone(),
            building_id: value.building_id.clone(),
            district_id: value.district_id.clone(),
            plan_name_prefix: value.plan_prefix.clone(),
            title_style: value.title_style,
            date_source: value.date_source,
            output: value.output.clone(),
            timezone: value.timezone.clone(),
            api_url: value.api_url.clone(),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Arguments::parse();
    init_tracing(args.verbose);
    let file = PartialSettings::discover(args.config.as_deref(), &current_dir()?)?;
    let settings = Settings::merge(PartialSettings::from(&args), file)?;
    tracing::debug!(?settings, "settings merged");
    let summary = lcs_core::run(&settings, Local::now().date_naive()).await?;
    println!("ICS file generated: {}", summary.path.display());
    println!("Total events added: {}", summary.event_count);
    Ok(())
}
