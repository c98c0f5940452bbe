mod config;
pub mod database;
pub mod json_file;
pub mod migrations;

pub use config::{Config, StatsConfig, StorageBackend, StorageConfig};
pub use database::HabitDb;
pub use json_file::JsonFileStore;

use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{ConfigError, StorageError};
use crate::habit::Habit;

/// Persistence contract for the habit collection.
///
/// The whole collection is read once and written back as a snapshot after
/// every mutation. Implementations must make a save all-or-nothing.
pub trait HabitStore {
    /// Read the full collection. An empty store yields an empty list.
    ///
    /// # Errors
    /// Returns an error if the backend is unreachable or its data is corrupt.
    fn load_habits(&self) -> Result<Vec<Habit>, StorageError>;

    /// Replace the persisted collection with `habits`.
    ///
    /// # Errors
    /// Returns an error if nothing was written.
    fn save_habits(&self, habits: &[Habit]) -> Result<(), StorageError>;
}

impl<S: HabitStore + ?Sized> HabitStore for Box<S> {
    fn load_habits(&self) -> Result<Vec<Habit>, StorageError> {
        (**self).load_habits()
    }

    fn save_habits(&self, habits: &[Habit]) -> Result<(), StorageError> {
        (**self).save_habits(habits)
    }
}

/// In-process store, mostly for tests.
///
/// `set_failing(true)` makes every call fail with
/// [`StorageError::Unavailable`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    habits: Mutex<Vec<Habit>>,
    failing: Mutex<bool>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_habits(habits: Vec<Habit>) -> Self {
        Self {
            habits: Mutex::new(habits),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap_or_else(|e| e.into_inner()) = failing;
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy of the currently persisted snapshot.
    pub fn snapshot(&self) -> Vec<Habit> {
        self.habits.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn check(&self) -> Result<(), StorageError> {
        if *self.failing.lock().unwrap_or_else(|e| e.into_inner()) {
            Err(StorageError::Unavailable("memory store is set to fail".into()))
        } else {
            Ok(())
        }
    }
}

impl HabitStore for MemoryStore {
    fn load_habits(&self) -> Result<Vec<Habit>, StorageError> {
        self.check()?;
        Ok(self.snapshot())
    }

    fn save_habits(&self, habits: &[Habit]) -> Result<(), StorageError> {
        self.check()?;
        *self.habits.lock().unwrap_or_else(|e| e.into_inner()) = habits.to_vec();
        *self.saves.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}

/// Open the store selected by `config`.
///
/// # Errors
/// Returns an error if the data directory or the backend cannot be opened.
pub fn open_store(config: &StorageConfig) -> Result<Box<dyn HabitStore>, crate::error::CoreError> {
    let store: Box<dyn HabitStore> = match config.backend {
        StorageBackend::Sqlite => {
            let path = match &config.path {
                Some(path) => PathBuf::from(path),
                None => data_dir()?.join("habitloop.db"),
            };
            Box::new(HabitDb::open_at(path)?)
        }
        StorageBackend::Json => {
            let path = match &config.path {
                Some(path) => PathBuf::from(path),
                None => data_dir()?.join("habits.json"),
            };
            Box::new(JsonFileStore::new(path))
        }
    };
    Ok(store)
}

/// Returns the habitloop data directory, creating it if needed.
///
/// `HABITLOOP_DATA_DIR` overrides the location. Otherwise it is
/// `~/.config/habitloop`, or `~/.config/habitloop-dev` when
/// `HABITLOOP_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("HABITLOOP_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("HABITLOOP_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("habitloop-dev")
            } else {
                base_dir.join("habitloop")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
