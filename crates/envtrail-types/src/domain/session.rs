use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp format shared by chat ids and per-message pointer keys.
const KEY_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Format a timestamp the way pointer keys embed it (`20261016T093000`).
pub fn key_timestamp(at: DateTime<Utc>) -> String {
    at.format(KEY_TIMESTAMP_FORMAT).to_string()
}

/// Session identifier derived from the session start time.
///
/// Sortable and unique at one-second resolution, which is enough for a single
/// caller driving one session at a time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(String);

impl ChatId {
    pub fn from_start(started_at: DateTime<Utc>) -> Self {
        Self(key_timestamp(started_at))
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role tag embedded in a pointer key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryRole {
    SessionStart,
    User,
    Assistant,
    SessionSummary,
    SessionEnd,
}

impl EntryRole {
    pub fn tag(self) -> &'static str {
        match self {
            EntryRole::SessionStart => "SESSION_START",
            EntryRole::User => "USER",
            EntryRole::Assistant => "ASSISTANT",
            EntryRole::SessionSummary => "SESSION_SUMMARY",
            EntryRole::SessionEnd => "SESSION_END",
        }
    }

    /// Roles written once per exchange carry a sequence number in their key.
    pub fn is_per_message(self) -> bool {
        matches!(self, EntryRole::User | EntryRole::Assistant)
    }

    pub fn all() -> [EntryRole; 5] {
        [
            EntryRole::SessionStart,
            EntryRole::User,
            EntryRole::Assistant,
            EntryRole::SessionSummary,
            EntryRole::SessionEnd,
        ]
    }
}

impl fmt::Display for EntryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
