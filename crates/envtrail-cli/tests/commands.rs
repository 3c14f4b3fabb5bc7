use chrono::{TimeZone, Utc};
use envtrail_testing::assertions::{assert_entries_referenced, backup_names, managed_count};
use envtrail_testing::{SessionScript, TestWorld};
use envtrail_types::WeekStamp;
use predicates::prelude::*;

fn recorded_world() -> TestWorld {
    let world = TestWorld::new().with_project("app");
    world
        .record_session(
            "app",
            Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap(),
            &SessionScript::new("Fix login bug")
                .exchange("why does login fail?", "the token expired")
                .exchanges(2)
                .finalize("refresh tokens early"),
        )
        .unwrap();
    world
}

#[test]
fn test_init_writes_config_once() {
    let world = TestWorld::new();
    std::fs::remove_file(world.data_dir().join("config.toml")).unwrap();

    let first = world.run(&["--format", "json", "init"]).unwrap();
    assert!(first.success(), "{}", first.stderr());
    assert_eq!(first.json().unwrap()["created"], true);
    assert!(world.data_dir().join("config.toml").exists());

    let second = world.run(&["init"]).unwrap();
    assert!(second.success());
    assert!(second.stdout().contains("already exists"));
}

#[test]
fn test_status_of_untracked_project_creates_nothing() {
    let world = TestWorld::new().with_project("app");
    let result = world
        .run(&["--format", "json", "status", "--project", "app"])
        .unwrap();
    assert!(result.success(), "{}", result.stderr());

    let json = result.json().unwrap();
    assert_eq!(json["active"], false);
    assert_eq!(json["pointer"]["exists"], false);
    assert!(std::fs::read_dir(world.project("app")).unwrap().next().is_none());
}

#[test]
fn test_status_reports_recorded_session() {
    let world = recorded_world();
    let before = world.read_file("app", ".env").unwrap();

    let result = world
        .run(&["--format", "json", "status", "--project", "app"])
        .unwrap();
    assert!(result.success(), "{}", result.stderr());
    let json = result.json().unwrap();
    // start + 3 exchanges + summary + end
    assert_eq!(json["pointer"]["managed_count"], 1 + 3 * 2 + 2);
    assert_eq!(json["weeks"][0], "2026-W42");
    assert!(backup_names(&json).unwrap().is_empty());

    assert_eq!(world.read_file("app", ".env").unwrap(), before);
}

#[test]
fn test_status_plain_output() {
    let world = recorded_world();
    let mut cmd = world.command().unwrap();
    cmd.args(["status", "--project", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pointer file:"))
        .stdout(predicate::str::contains("9 entries"))
        .stdout(predicate::str::contains("SESSION_END"));
}

#[test]
fn test_rotate_backs_up_and_clears_entries() {
    let world = recorded_world();
    let original = world.read_file("app", ".env").unwrap();
    assert_entries_referenced(&original).unwrap();

    let result = world
        .run(&["--format", "json", "rotate", "--project", "app"])
        .unwrap();
    assert!(result.success(), "{}", result.stderr());

    let backup = format!(".env.backup.{}", WeekStamp::of(Utc::now()).backup_suffix());
    assert_eq!(result.json().unwrap()["backup_file"], backup.as_str());
    assert_eq!(world.read_file("app", &backup).unwrap(), original);

    let live = world.read_file("app", ".env").unwrap();
    assert_eq!(managed_count(&live), 0);
    assert!(live.contains("# Project Environment Variables"));
    assert!(live.contains("# === envtrail session history ==="));
}

#[test]
fn test_rotate_without_pointer_file() {
    let world = TestWorld::new().with_project("app");
    let mut cmd = world.command().unwrap();
    cmd.args(["rotate", "--project", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to rotate"));
    assert!(!world.project("app").join(".env").exists());
}

#[test]
fn test_resolve_reference_from_pointer_file() {
    let world = recorded_world();
    let content = world.read_file("app", ".env").unwrap();
    let lines: Vec<&str> = content.lines().collect();
    let user_line = lines
        .iter()
        .position(|l| l.contains("_USER_1="))
        .unwrap();
    let reference = lines[user_line + 1].trim_start_matches("# Log: ");

    let result = world
        .run(&["--format", "json", "resolve", "--project", "app", reference])
        .unwrap();
    assert!(result.success(), "{}", result.stderr());
    let json = result.json().unwrap();
    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["type"], "user_message");
    assert_eq!(records[0]["content"], "why does login fail?");
    assert_eq!(records[0]["message_num"], 1);
}

#[test]
fn test_resolve_unknown_hash_fails() {
    let world = recorded_world();
    let mut cmd = world.command().unwrap();
    cmd.args([
        "resolve",
        "--project",
        "app",
        ".claude/logs/2026-W42/chat.jsonl#0000000000000000",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Error: No log record matches"));
}

#[test]
fn test_log_with_week_and_limit() {
    let world = recorded_world();
    let result = world
        .run(&[
            "--format", "json", "log", "--project", "app", "--week", "2026-W42", "--limit", "2",
        ])
        .unwrap();
    assert!(result.success(), "{}", result.stderr());
    let json = result.json().unwrap();
    assert_eq!(json["week"], "2026-W42");
    assert_eq!(json["total"], 1 + 3 * 2 + 2);
    assert_eq!(json["records"][0]["type"], "session_summary");
    assert_eq!(json["records"][1]["type"], "session_end");
}

#[test]
fn test_weeks_lists_log_directories() {
    let world = recorded_world();
    world
        .record_session(
            "app",
            Utc.with_ymd_and_hms(2026, 10, 26, 9, 0, 0).unwrap(),
            &SessionScript::new("next week").exchanges(1),
        )
        .unwrap();

    let mut cmd = world.command().unwrap();
    cmd.args(["weeks", "--project", "app"])
        .assert()
        .success()
        .stdout("2026-W42\n2026-W44\n");
}

#[test]
fn test_missing_project_exits_with_error() {
    let world = TestWorld::new();
    let mut cmd = world.command().unwrap();
    cmd.args(["status", "--project", "nope"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: Project directory not found"));
}

#[test]
fn test_invalid_week_is_rejected() {
    let world = recorded_world();
    let result = world
        .run(&["log", "--project", "app", "--week", "last-week"])
        .unwrap();
    assert!(!result.success());
    assert!(result.stderr().contains("Invalid week stamp"));
}

#[test]
fn test_log_env_var_enables_debug_logging() {
    let world = TestWorld::new()
        .with_project("app")
        .with_env("ENVTRAIL_LOG", "debug");
    let result = world.run(&["status", "--project", "app"]).unwrap();
    assert!(result.success());
    assert!(result.stderr().contains("resolved data directory"));
    assert!(!result.stdout().contains("resolved data directory"));
}
