//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_timetable-cli"))
        .args(args)
        .env("TIMETABLE_DATA_DIR", data_dir)
        .env_remove("TIMETABLE_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (code, stdout, stderr) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_plan_for_ten_minutes() {
    let dir = tempfile::tempdir().unwrap();
    let plan = run_json(dir.path(), &["timer", "plan", "--focus", "10"]);
    assert_eq!(plan["focusMinutes"], 10);
    assert_eq!(plan["shortBreakMinutes"], 2);
    assert_eq!(plan["longBreakMinutes"], 6);
    assert_eq!(plan["totalSessions"], 2);
}

#[test]
fn test_plan_clamps_non_positive_focus() {
    let dir = tempfile::tempdir().unwrap();
    let plan = run_json(dir.path(), &["timer", "plan", "--focus", "-3"]);
    assert_eq!(plan["focusMinutes"], 1);
    assert_eq!(plan["longBreakMinutes"], 3);
}

#[test]
fn test_focus_is_saved_for_status() {
    let dir = tempfile::tempdir().unwrap();
    let saved = run_json(dir.path(), &["timer", "focus", "40"]);
    assert_eq!(saved["totalSessions"], 4);

    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["phase"], "focus");
    assert_eq!(status["isRunning"], false);
    assert_eq!(status["remainingSecs"], 40 * 60);
    assert_eq!(status["completedSessions"], 0);
    assert_eq!(status["settings"]["focusMinutes"], 40);
}

#[test]
fn test_status_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let status = run_json(dir.path(), &["timer", "status"]);
    assert_eq!(status["remainingSecs"], 1500);
    assert_eq!(status["totalSessions"], 3);
    assert!(status["taskId"].is_null());
}

#[test]
fn test_task_select_show_clear() {
    let dir = tempfile::tempdir().unwrap();
    let selected = run_json(dir.path(), &["task", "select", "21"]);
    assert_eq!(selected["taskId"], "21");
    assert_eq!(run_json(dir.path(), &["task", "show"])["taskId"], "21");
    assert_eq!(run_json(dir.path(), &["timer", "status"])["taskId"], "21");

    run_json(dir.path(), &["task", "clear"]);
    assert!(run_json(dir.path(), &["task", "show"])["taskId"].is_null());

    // The select box placeholder means "no task".
    assert!(run_json(dir.path(), &["task", "select", "none"])["taskId"].is_null());
}

#[test]
fn test_config_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "set", "api.timeout_secs", "3"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "api.timeout_secs"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "3");
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "timer.bogus", "1"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));

    let (code, _, _) = run_cli(dir.path(), &["config", "get", "timer.bogus"]);
    assert_ne!(code, 0);
}

#[test]
fn test_run_one_focus_phase() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "set", "timer.tick_interval_ms", "1"]);
    assert_eq!(code, 0);

    let (code, stdout, stderr) = run_cli(dir.path(), &["timer", "run", "--focus", "1"]);
    assert_eq!(code, 0, "run failed: {stderr}");

    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("every stdout line is JSON"))
        .collect();
    let actions: Vec<&str> = lines.iter().filter_map(|l| l["action"].as_str()).collect();
    assert_eq!(actions, vec!["reset", "start", "sessionCompleted"]);

    let final_state = lines.last().unwrap();
    assert_eq!(final_state["phase"], "break");
    assert_eq!(final_state["breakKind"], "short");
    assert_eq!(final_state["completedSessions"], 1);
    assert_eq!(final_state["remainingSecs"], 60);
    assert!(stderr.contains("Session Complete!"));
}
