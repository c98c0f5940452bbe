//! Core error types for habitloop-core.
//!
//! This module defines the error hierarchy using thiserror. Schedule, streak
//! and statistics functions never fail; errors only come from habit creation,
//! collection lookups, storage and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitloop-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No habit with this id exists in the collection
    #[error("Habit not found: {id}")]
    NotFound { id: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage-specific errors.
///
/// All of these are recoverable: the in-memory collection from the last
/// successful load or save stays authoritative.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Persisted data could not be decoded
    #[error("Stored habit data is corrupt: {0}")]
    Corrupt(String),

    /// The store refused the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Could not resolve the data directory
    #[error("Cannot resolve data directory: {0}")]
    DataDir(String),
}

/// Validation errors raised when a habit is created.
///
/// These are reported before any mutation, so the collection is unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Habit name must not be empty")]
    EmptyName,

    #[error("Weekly habits need at least one weekday")]
    NoWeekdays,

    #[error("Custom habits need at least one date")]
    NoCustomDates,

    #[error("Weekday index {0} is out of range (0=Sunday .. 6=Saturday)")]
    WeekdayOutOfRange(u8),

    #[error("Goal target must be a positive number")]
    ZeroGoalTarget,

    #[error("Unknown frequency: {0}")]
    UnknownFrequency(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    /// Name of the offending input field, as it appears in the wire format.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::EmptyName => Some("name"),
            ValidationError::NoWeekdays | ValidationError::WeekdayOutOfRange(_) => {
                Some("weekdays")
            }
            ValidationError::NoCustomDates => Some("customDates"),
            ValidationError::ZeroGoalTarget => Some("goalTarget"),
            ValidationError::UnknownFrequency(_) => Some("frequency"),
            ValidationError::InvalidValue { field, .. } => Some(field.as_str()),
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_name_their_field() {
        assert_eq!(ValidationError::EmptyName.field(), Some("name"));
        assert_eq!(ValidationError::NoWeekdays.field(), Some("weekdays"));
        assert_eq!(ValidationError::NoCustomDates.field(), Some("customDates"));
        assert_eq!(ValidationError::WeekdayOutOfRange(9).field(), Some("weekdays"));
        let err = ValidationError::InvalidValue {
            field: "scheduledTime".into(),
            message: "bad".into(),
        };
        assert_eq!(err.field(), Some("scheduledTime"));
    }

    #[test]
    fn locked_sqlite_maps_to_locked() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: rusqlite::ErrorCode::DatabaseLocked,
                extended_code: 6,
            },
            None,
        );
        assert!(matches!(StorageError::from(err), StorageError::Locked));
    }

    #[test]
    fn not_found_message_contains_id() {
        let err = CoreError::NotFound { id: "abc".into() };
        assert!(err.to_string().contains("abc"));
    }
}
