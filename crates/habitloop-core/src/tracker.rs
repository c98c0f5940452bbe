//! The in-memory habit collection and its mutation path.
//!
//! [`HabitTracker`] loads the collection once from a [`HabitStore`], serves
//! reads from memory, and writes the full snapshot back after every
//! mutation. A mutation is staged on a copy and only becomes visible after
//! the store accepted it, so a failed save leaves the previous collection in
//! place. Successful mutations are announced on the tracker's [`EventBus`].

use std::sync::mpsc::Receiver;

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::error::{CoreError, Result};
use crate::events::{Event, EventBus};
use crate::habit::{Habit, HabitDraft, HabitId};
use crate::ledger;
use crate::storage::HabitStore;

/// Habit collection keyed by id, in creation order.
pub struct HabitTracker<S: HabitStore> {
    store: S,
    habits: IndexMap<HabitId, Habit>,
    bus: EventBus,
    revision: u64,
}

impl<S: HabitStore> HabitTracker<S> {
    /// Load the collection from `store`.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn open(store: S) -> Result<Self> {
        let habits = index(store.load_habits()?);
        tracing::debug!(count = habits.len(), "habit collection loaded");
        Ok(Self {
            store,
            habits,
            bus: EventBus::new(),
            revision: 0,
        })
    }

    /// Re-read the collection from the store.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read; the current collection
    /// is kept in that case.
    pub fn reload(&mut self) -> Result<()> {
        self.habits = index(self.store.load_habits()?);
        Ok(())
    }

    /// All habits in creation order.
    pub fn habits(&self) -> indexmap::map::Values<'_, HabitId, Habit> {
        self.habits.values()
    }

    /// Owned copy of the collection, in creation order.
    pub fn to_vec(&self) -> Vec<Habit> {
        self.habits.values().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.habits.get(id)
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of successful mutations since the tracker was opened.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Receive an [`Event`] after every successful mutation.
    pub fn subscribe(&mut self) -> Receiver<Event> {
        self.bus.subscribe()
    }

    /// Validate `draft`, add the habit and persist.
    ///
    /// # Errors
    /// Returns [`CoreError::Validation`] before touching the collection, or a
    /// storage error if the save failed.
    pub fn create(&mut self, draft: HabitDraft, today: NaiveDate) -> Result<Habit> {
        let habit = Habit::new(draft, today)?;
        let mut staged = self.habits.clone();
        staged.insert(habit.id.clone(), habit.clone());
        self.commit(staged)?;
        tracing::info!(id = %habit.id, name = %habit.name, "habit created");
        Ok(habit)
    }

    /// Remove a habit and its whole ledger.
    ///
    /// Returns `false` without saving when no habit has this id.
    ///
    /// # Errors
    /// Returns a storage error if the save failed.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        if !self.habits.contains_key(id) {
            tracing::debug!(%id, "delete of unknown habit ignored");
            return Ok(false);
        }
        let mut staged = self.habits.clone();
        staged.shift_remove(id);
        self.commit(staged)?;
        tracing::info!(%id, "habit deleted");
        Ok(true)
    }

    /// Record whether habit `id` was completed on `date`.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] for an unknown id, or a storage error
    /// if the save failed.
    pub fn set_progress(&mut self, id: &str, date: NaiveDate, completed: bool) -> Result<Habit> {
        let current = self.habits.get(id).ok_or_else(|| not_found(id))?;
        let updated = ledger::set_completed(current, date, completed);
        let mut staged = self.habits.clone();
        staged.insert(updated.id.clone(), updated.clone());
        self.commit(staged)?;
        tracing::debug!(%id, %date, completed, "progress recorded");
        Ok(updated)
    }

    /// Flip the completion of habit `id` on `date` and return the new value.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] for an unknown id, or a storage error
    /// if the save failed.
    pub fn toggle_progress(&mut self, id: &str, date: NaiveDate) -> Result<bool> {
        let current = self.habits.get(id).ok_or_else(|| not_found(id))?;
        let completed = !ledger::is_completed(current, date);
        self.set_progress(id, date, completed)?;
        Ok(completed)
    }

    /// Delete every habit and all progress. Returns how many were removed.
    ///
    /// # Errors
    /// Returns a storage error if the save failed.
    pub fn reset(&mut self) -> Result<usize> {
        let removed = self.habits.len();
        self.commit(IndexMap::new())?;
        tracing::info!(removed, "habit collection reset");
        Ok(removed)
    }

    fn commit(&mut self, staged: IndexMap<HabitId, Habit>) -> Result<()> {
        let snapshot: Vec<Habit> = staged.values().cloned().collect();
        if let Err(e) = self.store.save_habits(&snapshot) {
            tracing::warn!("save failed, keeping previous collection: {e}");
            return Err(e.into());
        }
        self.habits = staged;
        self.revision += 1;
        self.bus.publish(Event::HabitsChanged {
            revision: self.revision,
        });
        Ok(())
    }
}

fn not_found(id: &str) -> CoreError {
    CoreError::NotFound { id: id.to_string() }
}

fn index(habits: Vec<Habit>) -> IndexMap<HabitId, Habit> {
    let mut map = IndexMap::with_capacity(habits.len());
    for habit in habits {
        if map.contains_key(&habit.id) {
            tracing::warn!(id = %habit.id, "duplicate habit id in store; keeping the first");
            continue;
        }
        map.insert(habit.id.clone(), habit);
    }
    map
}
