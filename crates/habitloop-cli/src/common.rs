//! Helpers shared by the command modules.

use chrono::{NaiveDate, NaiveTime};
use habitloop_core::storage::open_store;
use habitloop_core::{Config, Frequency, HabitStore, HabitTracker};
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub type Tracker = HabitTracker<Box<dyn HabitStore>>;

pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{raw}', expected YYYY-MM-DD"))
}

pub fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    habitloop_core::habit::parse_time(raw).ok_or_else(|| format!("invalid time '{raw}', expected HH:MM"))
}

pub fn parse_frequency(raw: &str) -> Result<Frequency, String> {
    raw.parse::<Frequency>().map_err(|e| e.to_string())
}

/// Load the configuration and open the configured habit store.
pub fn open_tracker() -> Result<(Config, Tracker), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let tracker = HabitTracker::open(open_store(&config.storage)?)?;
    Ok((config, tracker))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
