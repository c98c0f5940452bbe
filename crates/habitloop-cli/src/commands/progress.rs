//! Progress recording commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use habitloop_core::motivator;
use serde_json::json;

use crate::common::{self, parse_date, print_json, CliResult};

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Mark a habit completed
    Done {
        /// Habit ID
        id: String,
        /// Day to record (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Clear a completion
    Undo {
        /// Habit ID
        id: String,
        /// Day to clear (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Flip the completion of a day
    Toggle {
        /// Habit ID
        id: String,
        /// Day to flip (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
}

pub fn run(action: ProgressAction, today: NaiveDate) -> CliResult {
    let (_, mut tracker) = common::open_tracker()?;

    let (id, date, completed) = match action {
        ProgressAction::Done { id, date } => {
            let date = date.unwrap_or(today);
            tracker.set_progress(&id, date, true)?;
            (id, date, true)
        }
        ProgressAction::Undo { id, date } => {
            let date = date.unwrap_or(today);
            tracker.set_progress(&id, date, false)?;
            (id, date, false)
        }
        ProgressAction::Toggle { id, date } => {
            let date = date.unwrap_or(today);
            let completed = tracker.toggle_progress(&id, date)?;
            (id, date, completed)
        }
    };

    let message = match tracker.get(&id) {
        Some(habit) if completed => Some(motivator::completion_message(habit, &mut rand::thread_rng())),
        _ => None,
    };
    print_json(&json!({
        "id": id,
        "date": date,
        "completed": completed,
        "message": message,
    }))
}
