//! Progress ledger: per-date completion of a habit.
//!
//! The ledger accepts any date, due or not. Whether an entry counts is
//! decided by the streak and statistics code, which filter by schedule.
//!
//! Writers store `true` for completed dates and remove the key otherwise.
//! Readers treat a missing key and an explicit `false` the same way.

use chrono::NaiveDate;

use crate::habit::Habit;

/// Whether `habit` was completed on `date`.
pub fn is_completed(habit: &Habit, date: NaiveDate) -> bool {
    habit.progress.get(&date).copied().unwrap_or(false)
}

/// A copy of `habit` with the completion of `date` set to `value`.
pub fn set_completed(habit: &Habit, date: NaiveDate, value: bool) -> Habit {
    let mut updated = habit.clone();
    updated.record(date, value);
    updated
}

/// A copy of `habit` with the completion of `date` flipped, plus the new value.
pub fn toggle(habit: &Habit, date: NaiveDate) -> (Habit, bool) {
    let value = !is_completed(habit, date);
    (set_completed(habit, date, value), value)
}

/// Completed dates, oldest first.
pub fn completed_dates(habit: &Habit) -> impl Iterator<Item = NaiveDate> + '_ {
    habit
        .progress
        .iter()
        .filter(|(_, &done)| done)
        .map(|(&date, _)| date)
}

/// Number of completed dates, due or not.
pub fn total_completions(habit: &Habit) -> usize {
    completed_dates(habit).count()
}

impl Habit {
    /// Record completion of `date` in place.
    pub fn record(&mut self, date: NaiveDate, completed: bool) {
        if completed {
            self.progress.insert(date, true);
        } else {
            self.progress.remove(&date);
        }
    }

    pub fn is_completed(&self, date: NaiveDate) -> bool {
        is_completed(self, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::{Frequency, HabitDraft};

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn weekly_habit() -> Habit {
        Habit::create(
            HabitDraft::new("Gym", Frequency::Weekly).with_weekdays([1]),
            "gym",
            day("2024-01-01"),
        )
        .unwrap()
    }

    #[test]
    fn absent_and_false_both_read_as_not_completed() {
        let mut habit = weekly_habit();
        assert!(!is_completed(&habit, day("2024-01-01")));
        habit.progress.insert(day("2024-01-01"), false);
        assert!(!is_completed(&habit, day("2024-01-01")));
    }

    #[test]
    fn set_completed_returns_updated_copy() {
        let habit = weekly_habit();
        let updated = set_completed(&habit, day("2024-01-01"), true);
        assert!(is_completed(&updated, day("2024-01-01")));
        assert!(!is_completed(&habit, day("2024-01-01")));
        assert_eq!(updated.weekdays, habit.weekdays);
        assert_eq!(updated.frequency, habit.frequency);
    }

    #[test]
    fn unmarking_removes_the_key() {
        let habit = set_completed(&weekly_habit(), day("2024-01-01"), true);
        let cleared = set_completed(&habit, day("2024-01-01"), false);
        assert!(cleared.progress.is_empty());
    }

    #[test]
    fn undue_dates_can_be_recorded() {
        // 2024-01-02 is a Tuesday; the habit is only due on Mondays
        let habit = set_completed(&weekly_habit(), day("2024-01-02"), true);
        assert!(is_completed(&habit, day("2024-01-02")));
    }

    #[test]
    fn toggle_flips_and_reports_new_value() {
        let (habit, now) = toggle(&weekly_habit(), day("2024-01-08"));
        assert!(now);
        let (habit, now) = toggle(&habit, day("2024-01-08"));
        assert!(!now);
        assert!(!habit.progress.contains_key(&day("2024-01-08")));
    }

    #[test]
    fn completed_dates_skip_false_entries() {
        let mut habit = weekly_habit();
        habit.record(day("2024-01-01"), true);
        habit.progress.insert(day("2024-01-08"), false);
        habit.record(day("2024-01-15"), true);
        let dates: Vec<_> = completed_dates(&habit).collect();
        assert_eq!(dates, vec![day("2024-01-01"), day("2024-01-15")]);
        assert_eq!(total_completions(&habit), 2);
    }
}
