//! Habit management commands for CLI.

use chrono::{NaiveDate, NaiveTime};
use clap::Subcommand;
use habitloop_core::schedule::{due_habits, is_due, next_due_date};
use habitloop_core::{streak, Frequency, HabitDraft};
use serde_json::json;

use crate::common::{self, parse_date, parse_frequency, parse_time, print_json, CliResult};

/// How far ahead `show` looks for the next due date.
const NEXT_DUE_HORIZON_DAYS: u32 = 366;

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,
        /// daily, weekly, custom, timed or goal
        #[arg(long, short, default_value = "daily", value_parser = parse_frequency)]
        frequency: Frequency,
        /// Why this habit matters
        #[arg(long)]
        motivation: Option<String>,
        /// Weekday for weekly habits, 0=Sunday .. 6=Saturday (repeatable)
        #[arg(long = "weekday", short = 'w')]
        weekdays: Vec<u8>,
        /// Date for custom habits, YYYY-MM-DD (repeatable)
        #[arg(long = "on", value_parser = parse_date)]
        dates: Vec<NaiveDate>,
        /// Reminder time, HH:MM
        #[arg(long, value_parser = parse_time)]
        time: Option<NaiveTime>,
        /// Target count for goal habits
        #[arg(long)]
        goal: Option<u32>,
    },
    /// List habits
    List {
        /// Only habits due today
        #[arg(long)]
        due: bool,
    },
    /// Show one habit with its streaks and next due date
    Show {
        /// Habit ID
        id: String,
    },
    /// Delete a habit and its progress
    Delete {
        /// Habit ID
        id: String,
    },
    /// Delete every habit and all progress
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: HabitAction, today: NaiveDate) -> CliResult {
    let (_, mut tracker) = common::open_tracker()?;

    match action {
        HabitAction::Add {
            name,
            frequency,
            motivation,
            weekdays,
            dates,
            time,
            goal,
        } => {
            let draft = HabitDraft {
                name,
                motivation,
                frequency,
                weekdays: weekdays.into_iter().collect(),
                custom_dates: dates.into_iter().collect(),
                scheduled_time: time,
                goal_target: goal,
            };
            let habit = tracker.create(draft, today)?;
            print_json(&habit)?;
        }
        HabitAction::List { due } => {
            if due {
                let habits: Vec<_> = due_habits(tracker.habits(), today).collect();
                print_json(&habits)?;
            } else {
                let habits: Vec<_> = tracker.habits().collect();
                print_json(&habits)?;
            }
        }
        HabitAction::Show { id } => {
            let habit = tracker
                .get(&id)
                .ok_or_else(|| format!("habit not found: {id}"))?;
            print_json(&json!({
                "habit": habit,
                "due_today": is_due(habit, today),
                "next_due": next_due_date(habit, today, NEXT_DUE_HORIZON_DAYS),
                "streak": streak::compute(habit, today),
            }))?;
        }
        HabitAction::Delete { id } => {
            let deleted = tracker.delete(&id)?;
            print_json(&json!({ "id": id, "deleted": deleted }))?;
        }
        HabitAction::Reset { yes } => {
            if !yes {
                return Err("refusing to delete all habits without --yes".into());
            }
            let removed = tracker.reset()?;
            print_json(&json!({ "removed": removed }))?;
        }
    }
    Ok(())
}
