//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with an isolated data directory and verify
//! the JSON it prints.

use std::path::Path;
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_habitloop-cli"))
        .env("HABITLOOP_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &Path, args: &[&str]) -> Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "command {args:?} failed: {stderr}");
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("bad JSON from {args:?}: {e}\n{stdout}"))
}

fn add_habit(data_dir: &Path, args: &[&str]) -> String {
    let mut full = vec!["--today", "2024-01-01", "habit", "add"];
    full.extend_from_slice(args);
    let habit = run_json(data_dir, &full);
    habit["id"].as_str().unwrap().to_string()
}

#[test]
fn test_habit_add_and_list() {
    let dir = TempDir::new().unwrap();
    let id = add_habit(dir.path(), &["Read", "--frequency", "timed", "--time", "21:00"]);

    let list = run_json(dir.path(), &["habit", "list"]);
    let habits = list.as_array().unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0]["id"], id.as_str());
    assert_eq!(habits[0]["scheduledTime"], "21:00");
    assert_eq!(habits[0]["createdAt"], "2024-01-01");
}

#[test]
fn test_habit_add_validation_error() {
    let dir = TempDir::new().unwrap();
    let (stdout, stderr, code) = run_cli(dir.path(), &["habit", "add", "Gym", "--frequency", "weekly"]);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.starts_with("error:"), "stderr: {stderr}");
    assert!(stderr.contains("weekday"));
}

#[test]
fn test_list_due_filters_by_weekday() {
    let dir = TempDir::new().unwrap();
    add_habit(dir.path(), &["Gym", "-f", "weekly", "--weekday", "1"]);
    add_habit(dir.path(), &["Walk"]);

    // 2024-01-02 is a Tuesday.
    let due = run_json(dir.path(), &["--today", "2024-01-02", "habit", "list", "--due"]);
    let names: Vec<&str> = due.as_array().unwrap().iter().map(|h| h["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Walk"]);

    let due = run_json(dir.path(), &["--today", "2024-01-08", "habit", "list", "--due"]);
    assert_eq!(due.as_array().unwrap().len(), 2);
}

#[test]
fn test_progress_and_streaks() {
    let dir = TempDir::new().unwrap();
    let id = add_habit(dir.path(), &["Walk"]);

    for day in ["2024-01-01", "2024-01-02"] {
        let done = run_json(dir.path(), &["--today", day, "progress", "done", &id]);
        assert_eq!(done["completed"], true);
        assert!(done["message"].is_string());
    }
    let undo = run_json(dir.path(), &["progress", "undo", &id, "--date", "2024-01-03"]);
    assert_eq!(undo["completed"], false);

    let streaks = run_json(dir.path(), &["--today", "2024-01-03", "stats", "streaks"]);
    assert_eq!(streaks["best"]["current"], 2);
    assert_eq!(streaks["habits"][0]["longest"], 2);

    let toggled = run_json(dir.path(), &["--today", "2024-01-03", "progress", "toggle", &id]);
    assert_eq!(toggled["completed"], true);
    let streaks = run_json(dir.path(), &["--today", "2024-01-03", "stats", "streaks"]);
    assert_eq!(streaks["best"]["current"], 3);
}

#[test]
fn test_progress_unknown_habit_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["progress", "done", "missing"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not found"), "stderr: {stderr}");
}

#[test]
fn test_delete_and_reset() {
    let dir = TempDir::new().unwrap();
    let id = add_habit(dir.path(), &["Walk"]);
    add_habit(dir.path(), &["Read"]);

    let deleted = run_json(dir.path(), &["habit", "delete", &id]);
    assert_eq!(deleted["deleted"], true);
    let again = run_json(dir.path(), &["habit", "delete", &id]);
    assert_eq!(again["deleted"], false);

    let (_, _, code) = run_cli(dir.path(), &["habit", "reset"]);
    assert_eq!(code, 1);
    let reset = run_json(dir.path(), &["habit", "reset", "--yes"]);
    assert_eq!(reset["removed"], 1);
    assert_eq!(run_json(dir.path(), &["habit", "list"]), serde_json::json!([]));
}

#[test]
fn test_stats_overview_and_month() {
    let dir = TempDir::new().unwrap();
    let id = add_habit(dir.path(), &["Walk"]);
    run_json(dir.path(), &["progress", "done", &id, "--date", "2024-01-01"]);

    let overview = run_json(dir.path(), &["--today", "2024-01-02", "stats", "overview"]);
    assert_eq!(overview["habit_count"], 1);
    assert_eq!(overview["last_7_days"]["scheduled"], 2);
    assert_eq!(overview["last_7_days"]["completed"], 1);
    assert_eq!(overview["last_7_days"]["completion_rate"], 50);
    assert_eq!(overview["today_status"], "pending");

    let month = run_json(dir.path(), &["--today", "2024-01-02", "stats", "month"]);
    assert_eq!(month["days"].as_array().unwrap().len(), 31);
    assert_eq!(month["days"][0]["status"], "full");

    let (_, _, code) = run_cli(dir.path(), &["stats", "month", "--year", "2024", "--month", "13"]);
    assert_eq!(code, 1);
}

#[test]
fn test_stats_window_oversized_days() {
    let dir = TempDir::new().unwrap();
    let id = add_habit(dir.path(), &["Walk"]);
    run_json(dir.path(), &["progress", "done", &id, "--date", "2024-01-02"]);

    let window = run_json(dir.path(), &["--today", "2024-01-03", "stats", "window", "--days", "4000000000"]);
    assert_eq!(window["totals"]["scheduled"], 3);
    assert_eq!(window["totals"]["completed"], 1);
    assert_eq!(window["days"].as_array().unwrap().len(), 3);
    assert_eq!(window["days"][0]["date"], "2024-01-01");

    let habits = run_json(dir.path(), &["--today", "2024-01-03", "stats", "habits", "--days", "4000000000"]);
    assert_eq!(habits[0]["scheduled"], 3);
}

#[test]
fn test_today_includes_quote_and_message() {
    let dir = TempDir::new().unwrap();
    add_habit(dir.path(), &["Walk"]);
    let today = run_json(dir.path(), &["--today", "2024-01-01", "today"]);
    assert_eq!(today["habits"][0]["name"], "Walk");
    assert_eq!(today["habits"][0]["completed"], false);
    assert!(today["message"].as_str().unwrap().contains("Walk"));
    assert!(today["quote"]["author"].is_string());
}

#[test]
fn test_config_get_set_list() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "stats.week_starts_on"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "monday");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "stats.week_starts_on", "sunday"]);
    assert_eq!(code, 0);
    let list = run_json(dir.path(), &["config", "list"]);
    assert_eq!(list["stats"]["week_starts_on"], "sunday");

    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "nope.key"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_json_backend_via_config() {
    let dir = TempDir::new().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "storage.backend", "json"]);
    assert_eq!(code, 0);
    add_habit(dir.path(), &["Walk"]);
    assert!(dir.path().join("habits.json").exists());
    assert_eq!(run_json(dir.path(), &["habit", "list"]).as_array().unwrap().len(), 1);
}
