//! JSON-file habit store.
//!
//! The collection is kept as a flat JSON array, the same shape the API
//! returns. Writes go to a temporary sibling file that is then renamed over
//! the target, so a reader never sees a half-written file.

use std::path::{Path, PathBuf};

use super::HabitStore;
use crate::error::StorageError;
use crate::habit::Habit;

/// Habit store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "habits.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl HabitStore for JsonFileStore {
    fn load_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no habit file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let habits: Vec<Habit> = serde_json::from_str(&content).map_err(|e| {
            StorageError::Corrupt(format!("{}: {e}", self.path.display()))
        })?;
        tracing::debug!(count = habits.len(), "loaded habits from json file");
        Ok(habits)
    }

    fn save_habits(&self, habits: &[Habit]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_string_pretty(habits)?;
        let temp = self.temp_path();
        std::fs::write(&temp, data)?;
        if let Err(e) = std::fs::rename(&temp, &self.path) {
            let _ = std::fs::remove_file(&temp);
            return Err(e.into());
        }
        tracing::debug!(count = habits.len(), "saved habits to json file");
        Ok(())
    }
}
