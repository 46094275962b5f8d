//! Basic CLI E2E tests.
//!
//! Each test runs the built `lockin` binary with HOME pointed at a temp
//! directory, so config and cache never touch the real user profile.

use std::process::Command;

use serde_json::{json, Value};
use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli_with(home: &TempDir, envs: &[(&str, &str)], args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_lockin"))
        .args(args)
        .env("HOME", home.path())
        .env("TZ", "UTC")
        .env_remove("LOCKIN_ENV")
        .env_remove("LOCKIN_TOKEN")
        .env_remove("LOCKIN_API_BASE_URL")
        .env_remove("RUST_LOG")
        .envs(envs.iter().copied())
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli(home: &TempDir, args: &[&str]) -> (String, String, i32) {
    run_cli_with(home, &[], args)
}

fn home() -> TempDir {
    tempfile::tempdir().expect("temp home")
}

#[test]
fn test_help_lists_commands() {
    let (stdout, _, code) = run_cli(&home(), &["--help"]);
    assert_eq!(code, 0);
    for command in ["goals", "proof", "export", "dashboard", "countdown", "config", "auth", "cache"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[test]
fn test_countdown_urgent() {
    let (stdout, _, code) = run_cli(
        &home(),
        &["countdown", "2024-01-15T21:30:00Z", "--now", "2024-01-15T20:00:00Z"],
    );
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "1h 30m (urgent)");
}

#[test]
fn test_countdown_overdue() {
    let (stdout, _, code) = run_cli(
        &home(),
        &["countdown", "2024-01-15T19:59:00Z", "--now", "2024-01-15T20:00:00Z"],
    );
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "OVERDUE");
}

#[test]
fn test_countdown_json_days() {
    let (stdout, _, code) = run_cli(
        &home(),
        &[
            "countdown",
            "2024-01-17T22:00:00Z",
            "--now",
            "2024-01-15T20:00:00Z",
            "--json",
        ],
    );
    assert_eq!(code, 0);
    let parsed: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["text"], "2d 2h");
    assert_eq!(parsed["urgent"], false);
    assert_eq!(parsed["overdue"], false);
}

#[test]
fn test_countdown_next_weekly_deadline() {
    let (stdout, _, code) = run_cli(
        &home(),
        &[
            "countdown",
            "--interval",
            "weekly",
            "--time",
            "23:59",
            "--now",
            "2024-01-15 12:00:00",
            "--json",
        ],
    );
    assert_eq!(code, 0);
    let parsed: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["deadline"], "2024-01-21T23:59:00+00:00");
    assert_eq!(parsed["text"], "6d 11h");
}

#[test]
fn test_countdown_invalid_timestamp() {
    let (_, stderr, code) = run_cli(&home(), &["countdown", "next tuesday"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error: Invalid timestamp"));
}

#[test]
fn test_config_set_get_roundtrip() {
    let home = home();
    let (_, _, code) = run_cli(&home, &["config", "set", "api.timeout_secs", "45"]);
    assert_eq!(code, 0);

    let (stdout, _, code) = run_cli(&home, &["config", "get", "api.timeout_secs"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "45");

    let (stdout, _, code) = run_cli(&home, &["config", "list"]);
    assert_eq!(code, 0);
    let parsed: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["api"]["timeout_secs"], 45);
    assert_eq!(parsed["dev_mode"], false);
}

#[test]
fn test_config_unknown_key_and_bad_value() {
    let home = home();
    let (_, stderr, code) = run_cli(&home, &["config", "get", "api.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown configuration key: api.nope"));

    let (_, stderr, code) = run_cli(&home, &["config", "set", "dev_mode", "sometimes"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("dev_mode"));
}

#[test]
fn test_cache_starts_empty() {
    let (stdout, _, code) = run_cli(&home(), &["cache", "list"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "cache is empty");
}

#[test]
fn test_offline_without_cache_fails() {
    let (_, stderr, code) = run_cli(&home(), &["goals", "list", "--offline"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("no cached goals"));
}

#[test]
fn test_create_rejects_bad_input_before_sending() {
    let home = home();
    let token = [("LOCKIN_TOKEN", "test-token")];

    let (_, stderr, code) = run_cli_with(
        &home,
        &token,
        &["goals", "create", "--name", "Read", "--target", "0"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("targetAmount"));

    let (_, stderr, code) = run_cli_with(
        &home,
        &token,
        &["goals", "create", "--name", "Read", "--target", "30", "--interval", "yearly"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("interval"));
}

fn goals_body() -> Value {
    json!({
        "data": {
            "data": {
                "data": [
                    {
                        "id": 1, "name": "Read", "targetAmount": 10, "interval": "daily",
                        "stakeAmount": 5, "deadlineTime": "21:00:00",
                        "nextDeadlineDateTime": "2099-01-01T21:00:00Z",
                        "isActive": true, "currentStreak": 5, "status": "active"
                    },
                    {
                        "id": 2, "name": "Run", "targetAmount": 4, "interval": "weekly",
                        "stakeAmount": 20, "deadlineTime": "23:59:00",
                        "nextDeadlineDateTime": "2000-01-01T00:00:00Z",
                        "isActive": true, "currentStreak": 1, "status": "danger"
                    }
                ]
            }
        }
    })
}

#[test]
fn test_goals_list_fetches_then_serves_from_cache() {
    let home = home();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/goals")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(goals_body().to_string())
        .expect(1)
        .create();

    let url = server.url();
    let envs = [("LOCKIN_TOKEN", "test-token"), ("LOCKIN_API_BASE_URL", url.as_str())];

    let (stdout, stderr, code) = run_cli_with(&home, &envs, &["goals", "list", "--json"]);
    assert_eq!(code, 0, "stderr: {stderr}");
    let cards: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(cards.as_array().map(Vec::len), Some(2));
    assert_eq!(cards[0]["goal"]["name"], "Read");
    assert_eq!(cards[0]["progress"], 50);
    assert_eq!(cards[1]["countdown"]["text"], "OVERDUE");
    assert_eq!(cards[1]["emphasis"], "overdue");
    assert_eq!(cards[1]["color"], "critical");

    let (stdout, _, code) = run_cli_with(&home, &envs, &["goals", "list", "--offline", "--json"]);
    assert_eq!(code, 0);
    let cached: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(cached[1]["goal"]["name"], "Run");

    let (stdout, _, code) = run_cli(&home, &["cache", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("goals"));

    mock.assert();
}

#[test]
fn test_dashboard_offline_summary() {
    let home = home();
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/goals")
        .with_status(200)
        .with_body(goals_body().to_string())
        .create();

    let url = server.url();
    let envs = [("LOCKIN_TOKEN", "test-token"), ("LOCKIN_API_BASE_URL", url.as_str())];
    let (_, _, code) = run_cli_with(&home, &envs, &["goals", "list"]);
    assert_eq!(code, 0);

    let (stdout, _, code) = run_cli(&home, &["dashboard", "--offline", "--json"]);
    assert_eq!(code, 0);
    let parsed: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["summary"]["total_goals"], 2);
    assert_eq!(parsed["summary"]["total_at_stake"], 25.0);
    assert_eq!(parsed["summary"]["average_streak"], 3);
    assert_eq!(parsed["charts"][0]["band"], "medium");
}

#[test]
fn test_dev_mode_clears_cache() {
    let home = home();
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/goals")
        .with_status(200)
        .with_body(goals_body().to_string())
        .create();

    let url = server.url();
    let envs = [("LOCKIN_TOKEN", "test-token"), ("LOCKIN_API_BASE_URL", url.as_str())];
    let (_, _, code) = run_cli_with(&home, &envs, &["goals", "list"]);
    assert_eq!(code, 0);

    let (_, _, code) = run_cli(&home, &["config", "set", "dev_mode", "true"]);
    assert_eq!(code, 0);

    let (_, stderr, code) = run_cli(&home, &["goals", "list", "--offline"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("no cached goals"));
}

#[test]
fn test_api_error_message_is_printed() {
    let home = home();
    let mut server = mockito::Server::new();
    server
        .mock("DELETE", "/api/goals/9")
        .with_status(404)
        .with_body(r#"{"message": "Goal not found"}"#)
        .create();

    let url = server.url();
    let envs = [("LOCKIN_TOKEN", "test-token"), ("LOCKIN_API_BASE_URL", url.as_str())];
    let (_, stderr, code) = run_cli_with(&home, &envs, &["goals", "delete", "9"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error: Goal not found"));
}
