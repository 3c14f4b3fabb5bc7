use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use envtrail_runtime::{Config, Error, ManualClock, SessionLog, SessionState};
use envtrail_store::{Limits, PointerFile, ProjectLayout, ProjectLock, WeekLog};
use envtrail_types::{EntryRole, LogBody, WeekStamp};

struct Fixture {
    _dir: TempDir,
    project: PathBuf,
    clock: Arc<ManualClock>,
    log: SessionLog,
}

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
}

fn fixture_with(limits: Limits) -> Fixture {
    let dir = TempDir::new().unwrap();
    let project = dir.path().join("project");
    fs::create_dir(&project).unwrap();
    let project = project.canonicalize().unwrap();
    let clock = Arc::new(ManualClock::new(start_time()));
    let config = Config {
        limits,
        ..Config::default()
    };
    let log = SessionLog::with_clock(config, clock.clone());
    Fixture {
        _dir: dir,
        project,
        clock,
        log,
    }
}

fn fixture() -> Fixture {
    fixture_with(Limits::default())
}

fn pointer(project: &Path) -> PointerFile {
    PointerFile::new(project.join(".env"))
}

fn week_log(project: &Path, at: DateTime<Utc>) -> WeekLog {
    WeekLog::new(
        project
            .join(".claude/logs")
            .join(WeekStamp::of(at).dir_name())
            .join("chat.jsonl"),
    )
}

#[test]
fn test_start_on_empty_directory() {
    let mut fx = fixture();
    let receipt = fx.log.start(&fx.project, "Fix login bug").unwrap();

    assert!(receipt.pointer_file_created);
    assert_eq!(receipt.chat_id.as_str(), "20261016T093000");
    assert!(receipt.eviction.is_none());

    let content = pointer(&fx.project).read().unwrap();
    assert!(content.starts_with("# Project Environment Variables\n"));
    assert!(content.contains("CLAUDE_PTR_20261016T093000_SESSION_START=\"=== Chat Session: Fix login bug ===\""));
    assert!(content.contains("# Log: .claude/logs/2026-W42/chat.jsonl#"));

    let records = week_log(&fx.project, start_time()).records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message_num, 0);
    match &records[0].body {
        LogBody::SessionStart {
            topic,
            project_path,
        } => {
            assert_eq!(topic, "Fix login bug");
            assert_eq!(Path::new(project_path), fx.project.as_path());
        }
        other => panic!("unexpected first record: {:?}", other),
    }
}

#[test]
fn test_start_keeps_unterminated_user_line_intact() {
    let mut fx = fixture();
    fs::write(fx.project.join(".env"), "API_KEY=secret").unwrap();
    fx.log.start(&fx.project, "t").unwrap();

    let content = pointer(&fx.project).read().unwrap();
    assert_eq!(content.lines().next(), Some("API_KEY=secret"));
    assert_eq!(pointer(&fx.project).entries(&Limits::default()).unwrap().len(), 1);

    let status = fx.log.status(Some(&fx.project)).unwrap();
    assert_eq!(status.pointer.unwrap().managed_count, 1);
}

#[test]
fn test_restart_under_held_lock_keeps_active_session() {
    let dir = TempDir::new().unwrap();
    let project = dir.path().canonicalize().unwrap();
    let config = Config {
        lock_timeout_ms: 50,
        ..Config::default()
    };
    let mut log = SessionLog::with_clock(config, Arc::new(ManualClock::new(start_time())));
    let first = log.start(&project, "first").unwrap();

    let held = ProjectLock::acquire(&ProjectLayout::new(&project), Duration::from_secs(1)).unwrap();
    let err = log.start(&project, "second").unwrap_err();
    assert!(matches!(
        err,
        Error::Store(envtrail_store::Error::LockTimeout { .. })
    ));
    assert_eq!(log.active().unwrap().chat_id, first.chat_id);

    drop(held);
    log.append("still here", "yes").unwrap();
}

#[test]
fn test_start_missing_project_fails() {
    let mut fx = fixture();
    let missing = fx.project.join("nope");
    let err = fx.log.start(&missing, "topic").unwrap_err();
    assert!(matches!(err, Error::ProjectNotFound(_)));
    assert!(!missing.exists());
    assert!(fx.log.active().is_none());
}

#[test]
fn test_append_writes_two_entries_and_two_records() {
    let mut fx = fixture();
    fx.log.start(&fx.project, "topic").unwrap();
    fx.clock.advance(TimeDelta::seconds(42));

    let receipt = fx.log.append("hi", "hello").unwrap();
    assert_eq!(receipt.message_num, 1);
    assert_eq!(receipt.user_preview.as_str(), "hi");

    let entries = pointer(&fx.project).entries(&Limits::default()).unwrap();
    let messages: Vec<_> = entries
        .iter()
        .filter(|e| matches!(e.role(), Some(EntryRole::User | EntryRole::Assistant)))
        .collect();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].key, "20261016T093042_USER_1");
    assert_eq!(messages[1].key, "20261016T093042_ASSISTANT_1");

    let records = week_log(&fx.project, start_time()).records().unwrap();
    let exchange: Vec<_> = records.iter().filter(|r| r.message_num == 1).collect();
    assert_eq!(exchange.len(), 2);
    assert_eq!(exchange[0].body.kind(), "user_message");
    assert_eq!(exchange[1].body.kind(), "assistant_message");
}

#[test]
fn test_append_before_start_touches_nothing() {
    let mut fx = fixture();
    let err = fx.log.append("hi", "hello").unwrap_err();
    assert!(matches!(err, Error::NoActiveSession));
    assert!(!fx.project.join(".env").exists());
    assert!(!fx.project.join(".claude").exists());
}

#[test]
fn test_finalize_returns_to_idle() {
    let mut fx = fixture();
    fx.log.start(&fx.project, "topic").unwrap();
    fx.log.append("q1", "a1").unwrap();
    fx.log.append("q2", "a2").unwrap();
    fx.clock.advance(TimeDelta::minutes(14) + TimeDelta::seconds(40));

    let receipt = fx.log.finalize("Fixed the bug").unwrap();
    assert_eq!(receipt.duration_minutes, 15);
    assert_eq!(receipt.message_count, 2);
    assert!(matches!(fx.log.state(), SessionState::Idle));

    let content = pointer(&fx.project).read().unwrap();
    assert!(content.contains("_SESSION_SUMMARY=\"Fixed the bug\""));
    assert!(content.contains("_SESSION_END=\"Duration: 15min, Messages: 2\""));
    assert!(content.ends_with("# ===================================\n\n"));

    let records = week_log(&fx.project, start_time()).records().unwrap();
    match &records.last().unwrap().body {
        LogBody::SessionEnd {
            duration_minutes,
            message_count,
            ..
        } => {
            assert_eq!(*duration_minutes, 15);
            assert_eq!(*message_count, 2);
        }
        other => panic!("unexpected last record: {:?}", other),
    }

    let before = content.clone();
    assert!(matches!(
        fx.log.append("late", "reply").unwrap_err(),
        Error::NoActiveSession
    ));
    assert!(matches!(
        fx.log.finalize("again").unwrap_err(),
        Error::NoActiveSession
    ));
    assert_eq!(pointer(&fx.project).read().unwrap(), before);
}

#[test]
fn test_message_counter_is_monotonic() {
    let mut fx = fixture();
    fx.log.start(&fx.project, "topic").unwrap();
    for expected in 1..=7 {
        let receipt = fx.log.append("u", "a").unwrap();
        assert_eq!(receipt.message_num, expected);
    }
    assert_eq!(fx.log.active().unwrap().message_count, 7);
}

#[test]
fn test_restart_resets_counter() {
    let mut fx = fixture();
    fx.log.start(&fx.project, "first").unwrap();
    fx.log.append("u", "a").unwrap();
    fx.clock.advance(TimeDelta::minutes(5));

    let receipt = fx.log.start(&fx.project, "second").unwrap();
    assert!(!receipt.pointer_file_created);
    assert_eq!(fx.log.active().unwrap().message_count, 0);
    assert_eq!(fx.log.append("u", "a").unwrap().message_num, 1);
}

#[test]
fn test_pointer_file_stays_within_limit() {
    let limits = Limits {
        pointer_size_limit: 8 * 1024,
        ..Limits::default()
    };
    let mut fx = fixture_with(limits);
    fx.log.start(&fx.project, "long conversation").unwrap();

    let long = "x".repeat(500);
    let mut evictions = 0;
    for _ in 0..60 {
        fx.clock.advance(TimeDelta::seconds(1));
        let receipt = fx.log.append(&long, &long).unwrap();
        if let Some(report) = receipt.eviction {
            evictions += 1;
            assert!(!report.still_over_limit);
            assert_eq!(report.kept, limits.retained_pointers);
        }
        assert!(pointer(&fx.project).size().unwrap() <= limits.pointer_size_limit);
    }
    assert!(evictions > 0);

    // Every exchange is still in the log.
    let records = week_log(&fx.project, start_time()).records().unwrap();
    assert_eq!(records.len(), 1 + 60 * 2);
}

#[test]
fn test_truncated_preview_resolves_to_full_text() {
    let mut fx = fixture();
    fx.log.start(&fx.project, "topic").unwrap();
    let long = "y".repeat(1_000);
    let receipt = fx.log.append(&long, "short").unwrap();
    assert!(receipt.user_preview.is_truncated());
    assert_eq!(receipt.user_preview.as_str().chars().count(), 203);

    let entry = pointer(&fx.project)
        .entries(&Limits::default())
        .unwrap()
        .into_iter()
        .find(|e| e.role() == Some(EntryRole::User))
        .unwrap();
    let reference = entry.reference.unwrap().to_string();

    let records = fx.log.resolve(&fx.project, &reference).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].pointer_text(), long);
}

#[test]
fn test_status_is_read_only() {
    let mut fx = fixture();
    fx.log.start(&fx.project, "topic").unwrap();
    fx.log.append("u", "a").unwrap();
    let before = pointer(&fx.project).read().unwrap();

    let first = fx.log.status(None).unwrap();
    let second = fx.log.status(Some(&fx.project)).unwrap();
    assert!(first.active);
    assert_eq!(first.session.as_ref().unwrap().message_count, 1);
    assert_eq!(first.project, second.project);
    assert_eq!(
        first.pointer.as_ref().unwrap().size_bytes,
        second.pointer.as_ref().unwrap().size_bytes
    );
    assert_eq!(first.log.as_ref().unwrap().record_count, 3);
    assert_eq!(pointer(&fx.project).read().unwrap(), before);
}

#[test]
fn test_status_without_session_or_project() {
    let fx = fixture();
    let report = fx.log.status(None).unwrap();
    assert!(!report.active);
    assert!(report.project.is_none());
    assert!(report.pointer.is_none());
}

#[test]
fn test_rotate_without_pointer_file_is_noop() {
    let fx = fixture();
    let receipt = fx.log.rotate(&fx.project).unwrap();
    assert!(!receipt.rotated());
    assert!(fs::read_dir(&fx.project).unwrap().next().is_none());
}

#[test]
fn test_rotate_requires_project_when_idle() {
    let fx = fixture();
    assert!(matches!(
        fx.log.rotate_or_active(None).unwrap_err(),
        Error::NoActiveProject
    ));
}

#[test]
fn test_weekly_rotation_keeps_four_backups() {
    let mut fx = fixture();
    fs::write(fx.project.join(".env"), "API_KEY=secret\n").unwrap();

    for _ in 0..6 {
        fx.log.start(&fx.project, "weekly").unwrap();
        fx.log.append("u", "a").unwrap();
        fx.log.finalize("done").unwrap();
        let receipt = fx.log.rotate_or_active(Some(&fx.project)).unwrap();
        assert!(receipt.rotated());
        fx.clock.advance(TimeDelta::days(7));
    }

    let status = fx.log.status(Some(&fx.project)).unwrap();
    assert_eq!(
        status.backups,
        vec![
            ".env.backup.2026W47",
            ".env.backup.2026W46",
            ".env.backup.2026W45",
            ".env.backup.2026W44",
        ]
    );
    assert_eq!(status.weeks.len(), 6);

    let content = pointer(&fx.project).read().unwrap();
    assert!(content.contains("API_KEY=secret"));
    assert!(!content.contains("CLAUDE_PTR_"));
}

#[test]
fn test_records_latest_week_with_limit() {
    let mut fx = fixture();
    assert!(fx.log.records(&fx.project, None, None).unwrap().is_none());

    fx.log.start(&fx.project, "topic").unwrap();
    for _ in 0..3 {
        fx.log.append("u", "a").unwrap();
    }

    let week = fx.log.records(&fx.project, None, Some(2)).unwrap().unwrap();
    assert_eq!(week.week, WeekStamp::of(start_time()));
    assert_eq!(week.total, 7);
    assert_eq!(week.records.len(), 2);
    assert_eq!(week.records[1].body.kind(), "assistant_message");
    assert_eq!(fx.log.weeks(&fx.project).unwrap(), vec![week.week]);
}
