pub mod config;
pub mod habit;
pub mod progress;
pub mod stats;
pub mod today;
