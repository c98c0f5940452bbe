//! SQLite-backed habit store.
//!
//! Provides persistent storage for:
//! - Habit definitions (one row per habit, collection order kept in `position`)
//! - Completed dates (one row per habit and date; not-completed dates are absent)

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::{params, Connection};

use super::migrations;
use super::HabitStore;
use crate::error::StorageError;
use crate::habit::{parse_day, parse_time, Frequency, Habit};

/// Raw `habits` row before decoding.
struct HabitRow {
    id: String,
    name: String,
    motivation: Option<String>,
    frequency: String,
    weekdays: String,
    custom_dates: String,
    scheduled_time: Option<String>,
    goal_target: Option<u32>,
    created_at: String,
}

impl HabitRow {
    fn decode(self) -> Result<Habit, StorageError> {
        let weekdays: BTreeSet<u8> = serde_json::from_str(&self.weekdays)
            .map_err(|e| corrupt(&self.id, "weekdays", e))?;
        let custom_dates: BTreeSet<NaiveDate> = serde_json::from_str(&self.custom_dates)
            .map_err(|e| corrupt(&self.id, "custom_dates", e))?;
        let created_at = parse_day(&self.created_at)
            .ok_or_else(|| corrupt(&self.id, "created_at", &self.created_at))?;
        let scheduled_time = match self.scheduled_time.as_deref() {
            Some(raw) => Some(parse_time(raw).ok_or_else(|| corrupt(&self.id, "scheduled_time", raw))?),
            None => None,
        };

        Ok(Habit {
            id: self.id,
            name: self.name,
            motivation: self.motivation,
            frequency: Frequency::from(self.frequency),
            weekdays,
            custom_dates,
            scheduled_time,
            goal_target: self.goal_target,
            created_at,
            progress: BTreeMap::new(),
        })
    }
}

fn corrupt(id: &str, column: &str, detail: impl std::fmt::Display) -> StorageError {
    StorageError::Corrupt(format!("habit {id}: bad {column}: {detail}"))
}

/// SQLite database holding the habit collection.
pub struct HabitDb {
    conn: Connection,
}

impl HabitDb {
    /// Open the database at `path`, creating file and schema if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened habit database");
        Self::with_connection(conn)
    }

    /// Open an in-memory database (for tests).
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        migrations::migrate(&conn).map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    fn load_progress(&self) -> Result<Vec<(String, String)>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT habit_id, date FROM habit_progress ORDER BY habit_id, date")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

impl HabitStore for HabitDb {
    fn load_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, motivation, frequency, weekdays, custom_dates,
                    scheduled_time, goal_target, created_at
             FROM habits
             ORDER BY position",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(HabitRow {
                id: row.get(0)?,
                name: row.get(1)?,
                motivation: row.get(2)?,
                frequency: row.get(3)?,
                weekdays: row.get(4)?,
                custom_dates: row.get(5)?,
                scheduled_time: row.get(6)?,
                goal_target: row.get(7)?,
                created_at: row.get(8)?,
            })
        })?;

        let mut habits = Vec::new();
        for row in rows {
            habits.push(row?.decode()?);
        }

        let mut by_id: BTreeMap<&str, usize> = BTreeMap::new();
        for (index, habit) in habits.iter().enumerate() {
            by_id.insert(habit.id.as_str(), index);
        }
        let mut completions: Vec<(usize, NaiveDate)> = Vec::new();
        for (habit_id, raw_date) in self.load_progress()? {
            let Some(&index) = by_id.get(habit_id.as_str()) else {
                tracing::warn!(%habit_id, "skipping progress row for unknown habit");
                continue;
            };
            let date = parse_day(&raw_date).ok_or_else(|| corrupt(&habit_id, "progress date", &raw_date))?;
            completions.push((index, date));
        }
        drop(by_id);
        for (index, date) in completions {
            habits[index].progress.insert(date, true);
        }

        tracing::debug!(count = habits.len(), "loaded habits from database");
        Ok(habits)
    }

    fn save_habits(&self, habits: &[Habit]) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM habit_progress", [])?;
        tx.execute("DELETE FROM habits", [])?;

        {
            let mut insert_habit = tx.prepare(
                "INSERT INTO habits (id, position, name, motivation, frequency, weekdays,
                                     custom_dates, scheduled_time, goal_target, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            let mut insert_progress =
                tx.prepare("INSERT INTO habit_progress (habit_id, date) VALUES (?1, ?2)")?;

            for (position, habit) in habits.iter().enumerate() {
                insert_habit.execute(params![
                    habit.id,
                    position as i64,
                    habit.name,
                    habit.motivation,
                    habit.frequency.as_str(),
                    serde_json::to_string(&habit.weekdays)?,
                    serde_json::to_string(&habit.custom_dates)?,
                    habit.scheduled_time.map(|t| t.format("%H:%M").to_string()),
                    habit.goal_target,
                    habit.created_at.format("%Y-%m-%d").to_string(),
                ])?;
                for date in crate::ledger::completed_dates(habit) {
                    insert_progress.execute(params![habit.id, date.format("%Y-%m-%d").to_string()])?;
                }
            }
        }

        tx.commit()?;
        tracing::debug!(count = habits.len(), "saved habits to database");
        Ok(())
    }
}
