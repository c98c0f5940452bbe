//! Streaks of consecutive due-and-completed days.
//!
//! Dates are walked from `today` back to the habit's creation day. Days the
//! habit is not due are transparent: they neither extend nor break a run.
//! Today gets a grace rule: if it is due and not yet completed it is skipped,
//! so an unfinished day never resets the current streak.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::habit::Habit;
use crate::ledger::is_completed;
use crate::schedule::is_due;

/// Current and longest streak of a habit (or the best over a collection).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Run ending at today (or at the last due day before today).
    pub current: u32,
    /// Longest run ever observed.
    pub longest: u32,
}

/// Compute the streaks of a single habit as of `today`.
pub fn compute(habit: &Habit, today: NaiveDate) -> StreakSummary {
    let mut current = 0;
    let mut longest = 0;
    let mut run = 0;
    let mut still_counting = true;

    let mut date = today;
    while date >= habit.created_at {
        if is_due(habit, date) {
            if is_completed(habit, date) {
                run += 1;
                if still_counting {
                    current += 1;
                }
            } else if date != today {
                still_counting = false;
                longest = longest.max(run);
                run = 0;
            }
        }

        date = match date.pred_opt() {
            Some(previous) => previous,
            None => break,
        };
    }

    StreakSummary {
        current,
        longest: longest.max(run),
    }
}

/// Best current and best longest streak over a collection.
///
/// The two maxima are taken independently and may come from different habits.
pub fn collection<'a, I>(habits: I, today: NaiveDate) -> StreakSummary
where
    I: IntoIterator<Item = &'a Habit>,
{
    habits
        .into_iter()
        .map(|habit| compute(habit, today))
        .fold(StreakSummary::default(), |best, s| StreakSummary {
            current: best.current.max(s.current),
            longest: best.longest.max(s.longest),
        })
}
