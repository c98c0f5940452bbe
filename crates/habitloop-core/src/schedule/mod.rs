//! Schedule evaluation: is a habit due on a given calendar date?
//!
//! Everything here is a pure function of the habit and the date passed in.
//! Nothing reads the wall clock.

use chrono::{Datelike, Days, NaiveDate};

use crate::habit::{Frequency, Habit};

/// Weekday index of a date, 0=Sunday .. 6=Saturday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    // num_days_from_sunday is always in 0..=6
    date.weekday().num_days_from_sunday() as u8
}

/// Whether `habit` should be tracked on `date`.
///
/// A habit is never due before the day it was created. `Custom` habits match
/// their explicit dates only; their weekday set is ignored. Unrecognized
/// frequencies are never due.
pub fn is_due(habit: &Habit, date: NaiveDate) -> bool {
    if date < habit.created_at {
        return false;
    }

    match &habit.frequency {
        Frequency::Daily | Frequency::Timed | Frequency::Goal => true,
        Frequency::Weekly => habit.weekdays.contains(&weekday_index(date)),
        Frequency::Custom => habit.custom_dates.contains(&date),
        Frequency::Other(_) => false,
    }
}

/// Habits from `habits` that are due on `date`.
pub fn due_habits<'a, I>(habits: I, date: NaiveDate) -> impl Iterator<Item = &'a Habit>
where
    I: IntoIterator<Item = &'a Habit>,
{
    habits.into_iter().filter(move |h| is_due(h, date))
}

/// First date on or after `from` (looking at most `horizon_days` ahead) on
/// which `habit` is due.
pub fn next_due_date(habit: &Habit, from: NaiveDate, horizon_days: u32) -> Option<NaiveDate> {
    (0..=u64::from(horizon_days))
        .map_while(|offset| from.checked_add_days(Days::new(offset)))
        .find(|&date| is_due(habit, date))
}

/// Iterate the dates of `[start, end]`, oldest first. Empty when `end < start`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start
        .iter_days()
        .take_while(move |&date| date <= end)
}
