//! The session log manager.
//!
//! A tracked conversation moves through two states:
//!
//! ```text
//!            start                 append
//!   Idle ─────────────▶ Active ◀──────────┐
//!     ▲                   │  └────────────┘
//!     └──── finalize ─────┘
//! ```
//!
//! `append` and `finalize` outside `Active` fail with
//! [`Error::NoActiveSession`] before touching any file. Rotation, status and
//! reference resolution take the project explicitly and work in either state.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use envtrail_store::journal;
use envtrail_store::{BackupSet, Limits, PointerFile, ProjectLayout, ProjectLock, WeekLog};
use envtrail_types::{
    ChatId, ContentHash, EntryRole, LogBody, LogRecord, LogReference, PointerEntry, Preview,
    WeekStamp, key_timestamp, session_banner, session_end_line,
};

use crate::reports::{
    AppendReceipt, FinalizeReceipt, RotateReceipt, SessionStatus, StartReceipt, StatusReport,
    WeekRecords,
};
use crate::{Clock, Config, Error, Result, SystemClock};

/// Number of newest pointer entries included in a status report.
const STATUS_RECENT_POINTERS: usize = 5;

/// State of the one session a `SessionLog` tracks.
#[derive(Debug, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Active(ActiveSession),
}

/// In-memory state of a started session.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub chat_id: ChatId,
    pub topic: String,
    pub layout: ProjectLayout,
    /// Chosen at start; a session crossing a week boundary keeps this file.
    pub log: WeekLog,
    pub message_count: u64,
    pub started_at: DateTime<Utc>,
}

impl ActiveSession {
    fn pointer(&self) -> PointerFile {
        PointerFile::new(self.layout.pointer_path())
    }

    fn log_relative(&self) -> String {
        self.layout
            .relative(self.log.path())
            .unwrap_or_else(|| self.log.path().to_string_lossy().into_owned())
    }

    /// Preview and cross-reference for one piece of pointer text.
    fn locate(&self, text: &str, limits: &Limits) -> (Preview, LogReference) {
        (
            Preview::new(text, limits.preview_chars),
            LogReference::new(self.log_relative(), ContentHash::of(text)),
        )
    }

    fn record(&self, at: DateTime<Utc>, body: LogBody) -> LogRecord {
        LogRecord::new(at, self.chat_id.clone(), self.message_count, body)
    }

    fn session_entry(&self, role: EntryRole, text: &str, limits: &Limits) -> PointerEntry {
        let (preview, reference) = self.locate(text, limits);
        PointerEntry::for_session(&self.chat_id, role, preview, reference)
    }
}

/// Mediates every write to a project's pointer file and weekly log.
pub struct SessionLog {
    config: Config,
    clock: Arc<dyn Clock>,
    state: SessionState,
}

impl SessionLog {
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            state: SessionState::Idle,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        match &self.state {
            SessionState::Active(session) => Some(session),
            SessionState::Idle => None,
        }
    }

    /// Resolve a caller-supplied project path against the configured base.
    pub fn resolve_project(&self, input: &str) -> Result<PathBuf> {
        let base = self.config.project_base_path();
        Ok(envtrail_core::resolve_project_dir(input, base.as_deref())?)
    }

    fn existing_project(dir: &Path) -> Result<ProjectLayout> {
        if !dir.is_dir() {
            return Err(Error::ProjectNotFound(dir.to_path_buf()));
        }
        Ok(ProjectLayout::new(envtrail_core::normalize_path(dir)))
    }

    fn lock(&self, layout: &ProjectLayout) -> Result<ProjectLock> {
        Ok(ProjectLock::acquire(layout, self.config.lock_timeout())?)
    }

    /// Begin tracking a conversation in `project_dir`.
    ///
    /// Cleanup of an oversized pointer file runs before the new entry is
    /// written. Starting while a session is active replaces it.
    pub fn start(&mut self, project_dir: &Path, topic: &str) -> Result<StartReceipt> {
        let layout = Self::existing_project(project_dir)?;

        let limits = self.config.limits;
        let started_at = self.clock.now();
        let week = WeekStamp::of(started_at);
        let session = ActiveSession {
            chat_id: ChatId::from_start(started_at),
            topic: topic.to_string(),
            log: WeekLog::for_week(&layout, week),
            layout,
            message_count: 0,
            started_at,
        };

        let _lock = self.lock(&session.layout)?;
        self.state = SessionState::Idle;
        session.log.ensure_dir()?;
        let pointer = session.pointer();
        let pointer_file_created = pointer.ensure_exists()?;
        let eviction = pointer.enforce_limit(&limits)?;

        session.log.append(&session.record(
            started_at,
            LogBody::SessionStart {
                topic: topic.to_string(),
                project_path: session.layout.root().to_string_lossy().into_owned(),
            },
        ))?;
        pointer.append_entry(&session.session_entry(
            EntryRole::SessionStart,
            &session_banner(topic),
            &limits,
        ))?;
        pointer.append_raw("\n")?;

        tracing::info!(
            chat_id = %session.chat_id,
            project = %session.layout.root().display(),
            topic,
            "session started"
        );

        let receipt = StartReceipt {
            chat_id: session.chat_id.clone(),
            topic: session.topic.clone(),
            project: session.layout.root().to_path_buf(),
            pointer_file: pointer.path().to_path_buf(),
            log_file: session.log.path().to_path_buf(),
            pointer_file_created,
            eviction,
        };
        self.state = SessionState::Active(session);
        Ok(receipt)
    }

    /// Record one user/assistant exchange.
    ///
    /// The counter advances once per exchange; both records and both pointer
    /// entries carry the same sequence number.
    pub fn append(&mut self, user_text: &str, assistant_text: &str) -> Result<AppendReceipt> {
        let limits = self.config.limits;
        let lock_timeout = self.config.lock_timeout();
        let now = self.clock.now();
        let SessionState::Active(session) = &mut self.state else {
            return Err(Error::NoActiveSession);
        };

        let _lock = ProjectLock::acquire(&session.layout, lock_timeout)?;
        session.message_count += 1;
        let message_num = session.message_count;

        session.log.append(&session.record(
            now,
            LogBody::UserMessage {
                content: user_text.to_string(),
            },
        ))?;
        session.log.append(&session.record(
            now,
            LogBody::AssistantMessage {
                content: assistant_text.to_string(),
            },
        ))?;

        let stamp = key_timestamp(now);
        let (user_preview, user_ref) = session.locate(user_text, &limits);
        let (assistant_preview, assistant_ref) = session.locate(assistant_text, &limits);

        let pointer = session.pointer();
        pointer.append_entry(&PointerEntry::for_message(
            &stamp,
            EntryRole::User,
            message_num,
            user_preview.clone(),
            user_ref,
        ))?;
        pointer.append_entry(&PointerEntry::for_message(
            &stamp,
            EntryRole::Assistant,
            message_num,
            assistant_preview.clone(),
            assistant_ref,
        ))?;
        pointer.append_raw("\n")?;
        let eviction = pointer.enforce_limit(&limits)?;

        tracing::debug!(chat_id = %session.chat_id, message_num, "exchange recorded");

        Ok(AppendReceipt {
            chat_id: session.chat_id.clone(),
            message_num,
            user_preview,
            assistant_preview,
            pointer_file: pointer.path().to_path_buf(),
            log_file: session.log.path().to_path_buf(),
            eviction,
        })
    }

    /// Close the session with a summary and return to `Idle`.
    ///
    /// If a write fails the session stays active so the caller can retry.
    pub fn finalize(&mut self, summary: &str) -> Result<FinalizeReceipt> {
        let limits = self.config.limits;
        let ended_at = self.clock.now();
        let session = self.active().ok_or(Error::NoActiveSession)?;
        let _lock = self.lock(&session.layout)?;

        let duration_minutes = elapsed_minutes(session.started_at, ended_at);
        let message_count = session.message_count;

        session.log.append(&session.record(
            ended_at,
            LogBody::SessionSummary {
                content: summary.to_string(),
            },
        ))?;
        session.log.append(&session.record(
            ended_at,
            LogBody::SessionEnd {
                duration_minutes,
                message_count,
                end_time: ended_at,
            },
        ))?;

        let pointer = session.pointer();
        pointer.append_entry(&session.session_entry(
            EntryRole::SessionSummary,
            summary,
            &limits,
        ))?;
        pointer.append_entry(&session.session_entry(
            EntryRole::SessionEnd,
            &session_end_line(duration_minutes, message_count),
            &limits,
        ))?;
        pointer.append_separator()?;
        let eviction = pointer.enforce_limit(&limits)?;

        let receipt = FinalizeReceipt {
            chat_id: session.chat_id.clone(),
            duration_minutes,
            message_count,
            summary: summary.to_string(),
            log_file: session.log.path().to_path_buf(),
            eviction,
        };
        tracing::info!(
            chat_id = %receipt.chat_id,
            duration_minutes,
            message_count,
            "session finalized"
        );

        self.state = SessionState::Idle;
        Ok(receipt)
    }

    /// Snapshot `project_dir`'s pointer file into this week's backup and
    /// clear its managed entries. Independent of the session state.
    pub fn rotate(&self, project_dir: &Path) -> Result<RotateReceipt> {
        let layout = Self::existing_project(project_dir)?;
        let project = layout.root().to_path_buf();
        if !PointerFile::new(layout.pointer_path()).exists() {
            return Ok(RotateReceipt {
                project,
                outcome: None,
            });
        }

        let _lock = self.lock(&layout)?;
        let week = WeekStamp::of(self.clock.now());
        let outcome = envtrail_store::rotate(&layout, week, &self.config.limits)?;
        Ok(RotateReceipt { project, outcome })
    }

    /// Rotate the explicit project, or the active session's project.
    pub fn rotate_or_active(&self, project_dir: Option<&Path>) -> Result<RotateReceipt> {
        match (project_dir, self.active()) {
            (Some(dir), _) => self.rotate(dir),
            (None, Some(session)) => self.rotate(session.layout.root()),
            (None, None) => Err(Error::NoActiveProject),
        }
    }

    /// Read-only view of the session and a project's files.
    ///
    /// Uses `project_dir` when given, else the active session's project.
    pub fn status(&self, project_dir: Option<&Path>) -> Result<StatusReport> {
        let now = self.clock.now();
        let session = self.active().map(|s| SessionStatus {
            chat_id: s.chat_id.clone(),
            topic: s.topic.clone(),
            project: s.layout.root().to_path_buf(),
            message_count: s.message_count,
            started_at: s.started_at,
            elapsed_minutes: elapsed_minutes(s.started_at, now),
            log_file: s.log.path().to_path_buf(),
        });

        let layout = match project_dir {
            Some(dir) => Some(Self::existing_project(dir)?),
            None => self.active().map(|s| s.layout.clone()),
        };

        let Some(layout) = layout else {
            return Ok(StatusReport {
                active: session.is_some(),
                session,
                project: None,
                pointer: None,
                log: None,
                backups: Vec::new(),
                weeks: Vec::new(),
            });
        };

        let log = match self.active() {
            Some(s) if s.layout == layout => s.log.clone(),
            _ => WeekLog::for_week(&layout, WeekStamp::of(now)),
        };
        let pointer = PointerFile::new(layout.pointer_path())
            .stats(&self.config.limits, STATUS_RECENT_POINTERS)?;

        Ok(StatusReport {
            active: session.is_some(),
            session,
            project: Some(layout.root().to_path_buf()),
            pointer: Some(pointer),
            log: Some(log.stats()?),
            backups: BackupSet::new(layout.clone()).list()?,
            weeks: journal::list_weeks(&layout)?,
        })
    }

    /// Full records behind a `<path>#<hash>` pointer reference.
    pub fn resolve(&self, project_dir: &Path, reference: &str) -> Result<Vec<LogRecord>> {
        let layout = Self::existing_project(project_dir)?;
        let reference: LogReference = reference.parse()?;
        Ok(journal::resolve(&layout, &reference)?)
    }

    pub fn weeks(&self, project_dir: &Path) -> Result<Vec<WeekStamp>> {
        let layout = Self::existing_project(project_dir)?;
        Ok(journal::list_weeks(&layout)?)
    }

    /// Records of one week's log (the latest week when `week` is `None`),
    /// keeping only the last `limit` when given.
    pub fn records(
        &self,
        project_dir: &Path,
        week: Option<WeekStamp>,
        limit: Option<usize>,
    ) -> Result<Option<WeekRecords>> {
        let layout = Self::existing_project(project_dir)?;
        let week = match week {
            Some(week) => week,
            None => match journal::list_weeks(&layout)?.pop() {
                Some(latest) => latest,
                None => return Ok(None),
            },
        };

        let log = WeekLog::for_week(&layout, week);
        if !log.exists() {
            return Ok(None);
        }
        let mut records = log.records()?;
        let total = records.len();
        if let Some(limit) = limit {
            records = records.split_off(total.saturating_sub(limit));
        }

        Ok(Some(WeekRecords {
            week,
            log_file: log.path().to_path_buf(),
            total,
            records,
        }))
    }
}

/// Whole minutes between two instants, rounded to nearest.
fn elapsed_minutes(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let ms = (to - from).num_milliseconds();
    (ms as f64 / 60_000.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    #[test]
    fn test_elapsed_minutes_rounds() {
        let start = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
        assert_eq!(elapsed_minutes(start, start), 0);
        assert_eq!(elapsed_minutes(start, start + TimeDelta::seconds(29)), 0);
        assert_eq!(elapsed_minutes(start, start + TimeDelta::seconds(30)), 1);
        assert_eq!(elapsed_minutes(start, start + TimeDelta::seconds(150)), 3);
    }

    #[test]
    fn test_new_log_is_idle() {
        let log = SessionLog::new(Config::default());
        assert!(matches!(log.state(), SessionState::Idle));
        assert!(log.active().is_none());
    }
}
