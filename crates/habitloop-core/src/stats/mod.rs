//! Statistics over a habit collection.
//!
//! A *scheduled instance* is one (habit, date) pair where the habit is due on
//! that date and the date is not after `today`. Future dates never count
//! toward either side of a completion rate.

use chrono::{Datelike, Days, NaiveDate};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::habit::{Habit, HabitId};
use crate::ledger::{is_completed, total_completions};
use crate::schedule::{days_between, is_due, weekday_index};
use crate::streak::{self, StreakSummary};

/// Scheduled and completed instance counts over a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowStats {
    pub scheduled: u32,
    pub completed: u32,
}

impl WindowStats {
    pub fn new(scheduled: u32, completed: u32) -> Self {
        Self {
            scheduled,
            completed,
        }
    }

    /// Completion percentage rounded half-up; `0` when nothing was scheduled.
    pub fn completion_rate(&self) -> u32 {
        if self.scheduled == 0 {
            return 0;
        }
        let (c, s) = (u64::from(self.completed), u64::from(self.scheduled));
        // (200c + s) / 2s == round(100c / s) for non-negative values
        ((200 * c + s) / (2 * s)) as u32
    }

    fn merge(self, other: WindowStats) -> WindowStats {
        WindowStats {
            scheduled: self.scheduled + other.scheduled,
            completed: self.completed + other.completed,
        }
    }
}

impl Serialize for WindowStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("WindowStats", 3)?;
        state.serialize_field("scheduled", &self.scheduled)?;
        state.serialize_field("completed", &self.completed)?;
        state.serialize_field("completion_rate", &self.completion_rate())?;
        state.end()
    }
}

/// Calendar marker for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// Every due habit was completed.
    Full,
    /// Some, but not all, due habits were completed.
    Partial,
    /// A past day where no due habit was completed.
    Missed,
    /// Today, with no due habit completed yet.
    Pending,
    /// Nothing due, or the day lies in the future.
    None,
}

impl DayStatus {
    fn classify(counts: WindowStats, is_today: bool) -> Self {
        if counts.scheduled == 0 {
            DayStatus::None
        } else if counts.completed == counts.scheduled {
            DayStatus::Full
        } else if counts.completed == 0 {
            if is_today {
                DayStatus::Pending
            } else {
                DayStatus::Missed
            }
        } else {
            DayStatus::Partial
        }
    }
}

/// First day of a week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    Sunday,
    #[default]
    Monday,
}

impl WeekStart {
    fn index(self) -> u8 {
        match self {
            WeekStart::Sunday => 0,
            WeekStart::Monday => 1,
        }
    }
}

/// Counts and status for one calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct DayPoint {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub counts: WindowStats,
    pub status: DayStatus,
}

/// One week of day points.
#[derive(Debug, Clone, Serialize)]
pub struct WeekSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<DayPoint>,
    pub totals: WindowStats,
}

/// Every day of a calendar month.
#[derive(Debug, Clone, Serialize)]
pub struct MonthCalendar {
    pub year: i32,
    pub month: u32,
    pub days: Vec<DayPoint>,
    pub totals: WindowStats,
}

/// Per-habit statistics over a window.
#[derive(Debug, Clone, Serialize)]
pub struct HabitStats {
    pub habit_id: HabitId,
    pub name: String,
    #[serde(flatten)]
    pub counts: WindowStats,
    pub streak: StreakSummary,
}

/// Dashboard summary as of a given day.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub date: NaiveDate,
    pub habit_count: usize,
    pub today: WindowStats,
    pub today_status: DayStatus,
    pub last_7_days: WindowStats,
    pub last_30_days: WindowStats,
    pub streaks: StreakSummary,
    pub total_completions: usize,
}

/// Scheduled and completed instances over `[start, end]`, ignoring dates
/// after `today`.
pub fn window_stats<'a, I>(habits: I, start: NaiveDate, end: NaiveDate, today: NaiveDate) -> WindowStats
where
    I: IntoIterator<Item = &'a Habit>,
{
    let end = end.min(today);
    let mut stats = WindowStats::default();

    for habit in habits {
        // nothing is due before creation
        for date in days_between(start.max(habit.created_at), end) {
            if is_due(habit, date) {
                stats.scheduled += 1;
                if is_completed(habit, date) {
                    stats.completed += 1;
                }
            }
        }
    }
    stats
}

/// First day of the `days`-day window ending at `today`.
///
/// A zero-length window is treated as a single day. Windows that would reach
/// past the earliest representable date start there instead.
pub fn window_start(today: NaiveDate, days: u32) -> NaiveDate {
    let back = u64::from(days.max(1) - 1);
    today.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN)
}

/// Window of the `days` days ending at `today` (inclusive).
pub fn last_days<'a, I>(habits: I, today: NaiveDate, days: u32) -> WindowStats
where
    I: IntoIterator<Item = &'a Habit>,
{
    if days == 0 {
        return WindowStats::default();
    }
    window_stats(habits, window_start(today, days), today, today)
}

/// Calendar marker for `date` as seen on `today`.
pub fn day_status<'a, I>(habits: I, date: NaiveDate, today: NaiveDate) -> DayStatus
where
    I: IntoIterator<Item = &'a Habit>,
{
    if date > today {
        return DayStatus::None;
    }
    DayStatus::classify(window_stats(habits, date, date, today), date == today)
}

/// One [`DayPoint`] per date in `[start, end]`, future days included with
/// zero counts.
pub fn daily_breakdown<'a, I>(habits: I, start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Vec<DayPoint>
where
    I: IntoIterator<Item = &'a Habit> + Clone,
{
    days_between(start, end)
        .map(|date| {
            let counts = window_stats(habits.clone(), date, date, today);
            let status = if date > today {
                DayStatus::None
            } else {
                DayStatus::classify(counts, date == today)
            };
            DayPoint {
                date,
                counts,
                status,
            }
        })
        .collect()
}

/// The week containing `anchor`.
pub fn week_summary<'a, I>(habits: I, anchor: NaiveDate, week_start: WeekStart, today: NaiveDate) -> WeekSummary
where
    I: IntoIterator<Item = &'a Habit> + Clone,
{
    let offset = (weekday_index(anchor) + 7 - week_start.index()) % 7;
    let start = anchor
        .checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(anchor);
    let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
    let days = daily_breakdown(habits, start, end, today);
    let totals = sum(&days);
    WeekSummary {
        start,
        end,
        days,
        totals,
    }
}

/// Calendar for `year`-`month`. `None` for an invalid month.
pub fn month_calendar<'a, I>(habits: I, year: i32, month: u32, today: NaiveDate) -> Option<MonthCalendar>
where
    I: IntoIterator<Item = &'a Habit> + Clone,
{
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = next_first.pred_opt()?;
    let days = daily_breakdown(habits, first, last, today);
    let totals = sum(&days);
    Some(MonthCalendar {
        year,
        month,
        days,
        totals,
    })
}

/// Calendar for the month containing `today`.
pub fn current_month<'a, I>(habits: I, today: NaiveDate) -> Option<MonthCalendar>
where
    I: IntoIterator<Item = &'a Habit> + Clone,
{
    month_calendar(habits, today.year(), today.month(), today)
}

/// Per-habit counts over `[start, end]` plus each habit's streaks.
pub fn habit_breakdown<'a, I>(habits: I, start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Vec<HabitStats>
where
    I: IntoIterator<Item = &'a Habit>,
{
    habits
        .into_iter()
        .map(|habit| HabitStats {
            habit_id: habit.id.clone(),
            name: habit.name.clone(),
            counts: window_stats([habit], start, end, today),
            streak: streak::compute(habit, today),
        })
        .collect()
}

/// Dashboard summary as of `today`.
pub fn overview<'a, I>(habits: I, today: NaiveDate) -> Overview
where
    I: IntoIterator<Item = &'a Habit> + Clone,
{
    let today_counts = window_stats(habits.clone(), today, today, today);
    Overview {
        date: today,
        habit_count: habits.clone().into_iter().count(),
        today: today_counts,
        today_status: DayStatus::classify(today_counts, true),
        last_7_days: last_days(habits.clone(), today, 7),
        last_30_days: last_days(habits.clone(), today, 30),
        streaks: streak::collection(habits.clone(), today),
        total_completions: habits.into_iter().map(total_completions).sum(),
    }
}

fn sum(days: &[DayPoint]) -> WindowStats {
    days.iter()
        .fold(WindowStats::default(), |acc, d| acc.merge(d.counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::{Frequency, HabitDraft};

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn daily(id: &str, created: &str, done: &[&str]) -> Habit {
        let mut habit =
            Habit::create(HabitDraft::new(id, Frequency::Daily), id, day(created)).unwrap();
        for d in done {
            habit.record(day(d), true);
        }
        habit
    }

    #[test]
    fn completion_rate_rounds_half_up_and_handles_zero() {
        assert_eq!(WindowStats::new(0, 0).completion_rate(), 0);
        assert_eq!(WindowStats::new(3, 1).completion_rate(), 33);
        assert_eq!(WindowStats::new(3, 2).completion_rate(), 67);
        assert_eq!(WindowStats::new(8, 1).completion_rate(), 13); // 12.5
        assert_eq!(WindowStats::new(4, 4).completion_rate(), 100);
    }

    #[test]
    fn window_counts_due_instances_only() {
        let a = daily("a", "2024-01-01", &["2024-01-01", "2024-01-02"]);
        let mut b = Habit::create(
            HabitDraft::new("b", Frequency::Weekly).with_weekdays([1]),
            "b",
            day("2024-01-01"),
        )
        .unwrap();
        // Tuesday completion is not due and must not be counted
        b.record(day("2024-01-02"), true);
        let s = window_stats([&a, &b], day("2024-01-01"), day("2024-01-03"), day("2024-01-03"));
        assert_eq!(s, WindowStats::new(4, 2));
        assert_eq!(s.completion_rate(), 50);
    }

    #[test]
    fn window_excludes_future_dates() {
        let a = daily("a", "2024-01-01", &["2024-01-01", "2024-01-05"]);
        let s = window_stats([&a], day("2024-01-01"), day("2024-01-10"), day("2024-01-02"));
        assert_eq!(s, WindowStats::new(2, 1));
    }

    #[test]
    fn empty_window_has_zero_rate() {
        let a = daily("a", "2024-02-01", &[]);
        let s = window_stats([&a], day("2024-01-01"), day("2024-01-31"), day("2024-03-01"));
        assert_eq!(s, WindowStats::default());
        assert_eq!(s.completion_rate(), 0);
        let none: Vec<Habit> = Vec::new();
        assert_eq!(last_days(&none, day("2024-01-31"), 7).completion_rate(), 0);
    }

    #[test]
    fn last_days_spans_inclusive_window() {
        let a = daily("a", "2024-01-01", &["2024-01-05", "2024-01-10"]);
        let s = last_days([&a], day("2024-01-10"), 7);
        assert_eq!(s, WindowStats::new(7, 2));
        assert_eq!(last_days([&a], day("2024-01-10"), 0), WindowStats::default());
    }

    #[test]
    fn oversized_window_covers_everything_since_creation() {
        let a = daily("a", "2024-01-01", &["2024-01-05", "2024-01-10"]);
        let today = day("2024-01-10");
        assert_eq!(window_start(today, u32::MAX), NaiveDate::MIN);
        assert_eq!(last_days([&a], today, u32::MAX), WindowStats::new(10, 2));
        assert_eq!(
            last_days([&a], today, u32::MAX),
            window_stats([&a], a.created_at, today, today)
        );
    }

    #[test]
    fn window_start_counts_today() {
        let today = day("2024-01-10");
        assert_eq!(window_start(today, 7), day("2024-01-04"));
        assert_eq!(window_start(today, 1), today);
        assert_eq!(window_start(today, 0), today);
    }

    #[test]
    fn day_status_rules() {
        let a = daily("a", "2024-01-01", &["2024-01-01", "2024-01-02"]);
        let b = daily("b", "2024-01-01", &["2024-01-01"]);
        let habits = [a, b];
        let today = day("2024-01-04");
        assert_eq!(day_status(&habits, day("2024-01-01"), today), DayStatus::Full);
        assert_eq!(day_status(&habits, day("2024-01-02"), today), DayStatus::Partial);
        assert_eq!(day_status(&habits, day("2024-01-03"), today), DayStatus::Missed);
        assert_eq!(day_status(&habits, today, today), DayStatus::Pending);
        assert_eq!(day_status(&habits, day("2024-01-05"), today), DayStatus::None);
        assert_eq!(day_status(&habits, day("2023-12-31"), today), DayStatus::None);
    }

    #[test]
    fn today_partial_and_full() {
        let a = daily("a", "2024-01-01", &["2024-01-04"]);
        let b = daily("b", "2024-01-01", &[]);
        let today = day("2024-01-04");
        assert_eq!(day_status([&a, &b], today, today), DayStatus::Partial);
        assert_eq!(day_status([&a], today, today), DayStatus::Full);
    }

    #[test]
    fn week_summary_starts_on_configured_day() {
        let a = daily("a", "2024-01-01", &["2024-01-03"]);
        // 2024-01-03 is a Wednesday
        let monday = week_summary([&a], day("2024-01-03"), WeekStart::Monday, day("2024-01-04"));
        assert_eq!(monday.start, day("2024-01-01"));
        assert_eq!(monday.end, day("2024-01-07"));
        assert_eq!(monday.days.len(), 7);
        assert_eq!(monday.totals, WindowStats::new(4, 1));
        assert_eq!(monday.days[5].status, DayStatus::None);

        let sunday = week_summary([&a], day("2024-01-03"), WeekStart::Sunday, day("2024-01-04"));
        assert_eq!(sunday.start, day("2023-12-31"));
        assert_eq!(sunday.days[0].status, DayStatus::None);
    }

    #[test]
    fn month_calendar_covers_every_day() {
        let a = daily("a", "2024-02-01", &["2024-02-01", "2024-02-02"]);
        let cal = month_calendar([&a], 2024, 2, day("2024-02-03")).unwrap();
        assert_eq!(cal.days.len(), 29);
        assert_eq!(cal.totals, WindowStats::new(3, 2));
        assert_eq!(cal.days[0].status, DayStatus::Full);
        assert_eq!(cal.days[2].status, DayStatus::Pending);
        assert_eq!(cal.days[28].status, DayStatus::None);
        assert!(month_calendar([&a], 2024, 13, day("2024-02-03")).is_none());
        assert_eq!(month_calendar([&a], 2024, 12, day("2024-02-03")).unwrap().days.len(), 31);
    }

    #[test]
    fn habit_breakdown_reports_each_habit() {
        let a = daily("a", "2024-01-01", &["2024-01-01", "2024-01-02"]);
        let b = daily("b", "2024-01-02", &[]);
        let rows = habit_breakdown([&a, &b], day("2024-01-01"), day("2024-01-02"), day("2024-01-02"));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].counts, WindowStats::new(2, 2));
        assert_eq!(rows[0].streak, StreakSummary { current: 2, longest: 2 });
        assert_eq!(rows[1].counts, WindowStats::new(1, 0));
        assert_eq!(rows[1].counts.completion_rate(), 0);
    }

    #[test]
    fn overview_aggregates_collection() {
        let a = daily("a", "2024-01-01", &["2024-01-01", "2024-01-02", "2024-01-03"]);
        let b = daily("b", "2024-01-03", &["2024-01-03"]);
        let habits = vec![a, b];
        let o = overview(&habits, day("2024-01-03"));
        assert_eq!(o.habit_count, 2);
        assert_eq!(o.today, WindowStats::new(2, 2));
        assert_eq!(o.today_status, DayStatus::Full);
        assert_eq!(o.last_7_days, WindowStats::new(4, 4));
        assert_eq!(o.streaks, StreakSummary { current: 3, longest: 3 });
        assert_eq!(o.total_completions, 4);
    }

    #[test]
    fn window_stats_serializes_rate() {
        let json = serde_json::to_value(WindowStats::new(4, 3)).unwrap();
        assert_eq!(json["completion_rate"], 75);
        let point = DayPoint {
            date: day("2024-01-01"),
            counts: WindowStats::new(2, 1),
            status: DayStatus::Partial,
        };
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(json["scheduled"], 2);
        assert_eq!(json["status"], "partial");
    }
}
