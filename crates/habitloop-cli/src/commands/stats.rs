use chrono::{Datelike, NaiveDate};
use clap::Subcommand;
use habitloop_core::{stats, streak};
use serde_json::json;

use crate::common::{self, print_json, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Dashboard summary: today, last 7 and 30 days, streaks
    Overview,
    /// Day-by-day completion over the last N days
    Window {
        /// Window length (default: stats.default_window_days)
        #[arg(long)]
        days: Option<u32>,
    },
    /// The current week
    Week,
    /// A calendar month (default: the current month)
    Month {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    /// Per-habit completion over the last N days
    Habits {
        /// Window length (default: stats.default_window_days)
        #[arg(long)]
        days: Option<u32>,
    },
    /// Current and longest streak per habit
    Streaks,
}

pub fn run(action: StatsAction, today: NaiveDate) -> CliResult {
    let (config, tracker) = common::open_tracker()?;
    let window_start =
        |days: Option<u32>| stats::window_start(today, days.unwrap_or(config.stats.default_window_days));

    match action {
        StatsAction::Overview => {
            print_json(&stats::overview(tracker.habits(), today))?;
        }
        StatsAction::Window { days } => {
            let start = window_start(days);
            let first_created = tracker.habits().map(|h| h.created_at).min().unwrap_or(today);
            print_json(&json!({
                "start": start,
                "end": today,
                "totals": stats::window_stats(tracker.habits(), start, today, today),
                "days": stats::daily_breakdown(tracker.habits(), start.max(first_created), today, today),
            }))?;
        }
        StatsAction::Week => {
            let week = stats::week_summary(tracker.habits(), today, config.stats.week_starts_on, today);
            print_json(&week)?;
        }
        StatsAction::Month { year, month } => {
            let year = year.unwrap_or(today.year());
            let month = month.unwrap_or(today.month());
            let calendar = stats::month_calendar(tracker.habits(), year, month, today)
                .ok_or_else(|| format!("invalid month: {year}-{month}"))?;
            print_json(&calendar)?;
        }
        StatsAction::Habits { days } => {
            let start = window_start(days);
            print_json(&stats::habit_breakdown(tracker.habits(), start, today, today))?;
        }
        StatsAction::Streaks => {
            let per_habit: Vec<_> = tracker
                .habits()
                .map(|h| {
                    let s = streak::compute(h, today);
                    json!({ "id": h.id, "name": h.name, "current": s.current, "longest": s.longest })
                })
                .collect();
            print_json(&json!({
                "best": streak::collection(tracker.habits(), today),
                "habits": per_habit,
            }))?;
        }
    }
    Ok(())
}
