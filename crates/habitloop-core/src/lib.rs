//! # Habitloop Core Library
//!
//! This library provides the core logic for the habitloop habit tracker:
//! deciding when a habit is due, recording completions, computing streaks
//! and aggregating statistics. The CLI and any GUI or web host are thin
//! layers over the same library.
//!
//! ## Architecture
//!
//! - **Engine**: pure functions over habits, with the reference date
//!   ("today") always passed in explicitly
//! - **Tracker**: the in-memory collection; every mutation is persisted as a
//!   full snapshot and then announced as an [`Event`]
//! - **Storage**: SQLite or JSON-file habit stores and TOML configuration
//! - **API**: an HTTP-shaped handler for hosts that expose the collection
//!
//! ## Key Components
//!
//! - [`Habit`] / [`HabitDraft`]: the habit record and its creation input
//! - [`schedule::is_due`]: the scheduling rule
//! - [`streak::compute`]: current and longest streak
//! - [`stats`]: window statistics, calendars and breakdowns
//! - [`HabitTracker`]: collection management over a [`HabitStore`]
//! - [`Config`]: application configuration

pub mod api;
pub mod error;
pub mod events;
pub mod habit;
pub mod ledger;
pub mod motivator;
pub mod schedule;
pub mod stats;
pub mod storage;
pub mod streak;
pub mod tracker;

pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::{Event, EventBus};
pub use habit::{Frequency, Habit, HabitDraft, HabitId};
pub use stats::{DayStatus, WeekStart, WindowStats};
pub use storage::{Config, HabitDb, HabitStore, JsonFileStore, MemoryStore};
pub use streak::StreakSummary;
pub use tracker::HabitTracker;
