//! Results returned by [`SessionLog`](crate::SessionLog) operations.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use envtrail_store::journal::LogStats;
use envtrail_store::{EvictionReport, PointerStats, RotationOutcome};
use envtrail_types::{ChatId, LogRecord, Preview, WeekStamp};

#[derive(Debug, Clone, Serialize)]
pub struct StartReceipt {
    pub chat_id: ChatId,
    pub topic: String,
    pub project: PathBuf,
    pub pointer_file: PathBuf,
    pub log_file: PathBuf,
    pub pointer_file_created: bool,
    pub eviction: Option<EvictionReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppendReceipt {
    pub chat_id: ChatId,
    pub message_num: u64,
    pub user_preview: Preview,
    pub assistant_preview: Preview,
    pub pointer_file: PathBuf,
    pub log_file: PathBuf,
    pub eviction: Option<EvictionReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinalizeReceipt {
    pub chat_id: ChatId,
    pub duration_minutes: i64,
    pub message_count: u64,
    pub summary: String,
    pub log_file: PathBuf,
    pub eviction: Option<EvictionReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RotateReceipt {
    pub project: PathBuf,
    /// `None` when the project had no pointer file to rotate.
    #[serde(flatten)]
    pub outcome: Option<RotationOutcome>,
}

impl RotateReceipt {
    pub fn rotated(&self) -> bool {
        self.outcome.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub chat_id: ChatId,
    pub topic: String,
    pub project: PathBuf,
    pub message_count: u64,
    pub started_at: DateTime<Utc>,
    pub elapsed_minutes: i64,
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub active: bool,
    pub session: Option<SessionStatus>,
    pub project: Option<PathBuf>,
    pub pointer: Option<PointerStats>,
    pub log: Option<LogStats>,
    pub backups: Vec<String>,
    pub weeks: Vec<WeekStamp>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekRecords {
    pub week: WeekStamp,
    pub log_file: PathBuf,
    pub total: usize,
    pub records: Vec<LogRecord>,
}
