use chrono::NaiveDate;
use habitloop_core::schedule::due_habits;
use habitloop_core::{motivator, stats};
use serde_json::json;

use crate::common::{self, print_json, CliResult};

pub fn run(today: NaiveDate) -> CliResult {
    let (_, tracker) = common::open_tracker()?;

    let due: Vec<_> = due_habits(tracker.habits(), today)
        .map(|h| {
            json!({
                "id": h.id,
                "name": h.name,
                "frequency": h.frequency,
                "scheduledTime": h.scheduled_time.map(|t| t.format("%H:%M").to_string()),
                "completed": h.is_completed(today),
            })
        })
        .collect();

    print_json(&json!({
        "date": today,
        "status": stats::day_status(tracker.habits(), today, today),
        "habits": due,
        "message": motivator::message(tracker.habits(), today, &mut rand::thread_rng()),
        "quote": motivator::daily_quote(today),
    }))
}
