//! Records of the weekly full-content log (`chat.jsonl`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ChatId, ContentHash};

/// One line of the full-content log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub chat_id: ChatId,
    pub message_num: u64,
    #[serde(flatten)]
    pub body: LogBody,
}

/// Type-specific part of a log record, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogBody {
    SessionStart {
        topic: String,
        project_path: String,
    },
    UserMessage {
        content: String,
    },
    AssistantMessage {
        content: String,
    },
    SessionSummary {
        content: String,
    },
    SessionEnd {
        duration_minutes: i64,
        message_count: u64,
        end_time: DateTime<Utc>,
    },
}

impl LogBody {
    pub fn kind(&self) -> &'static str {
        match self {
            LogBody::SessionStart { .. } => "session_start",
            LogBody::UserMessage { .. } => "user_message",
            LogBody::AssistantMessage { .. } => "assistant_message",
            LogBody::SessionSummary { .. } => "session_summary",
            LogBody::SessionEnd { .. } => "session_end",
        }
    }
}

impl LogRecord {
    pub fn new(
        timestamp: DateTime<Utc>,
        chat_id: ChatId,
        message_num: u64,
        body: LogBody,
    ) -> Self {
        Self {
            timestamp,
            chat_id,
            message_num,
            body,
        }
    }

    /// Text whose hash the matching pointer entry carries.
    pub fn pointer_text(&self) -> String {
        match &self.body {
            LogBody::SessionStart { topic, .. } => session_banner(topic),
            LogBody::UserMessage { content }
            | LogBody::AssistantMessage { content }
            | LogBody::SessionSummary { content } => content.clone(),
            LogBody::SessionEnd {
                duration_minutes,
                message_count,
                ..
            } => session_end_line(*duration_minutes, *message_count),
        }
    }

    pub fn content_hash(&self) -> ContentHash {
        ContentHash::of(&self.pointer_text())
    }

    pub fn to_line(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_line(line: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(line)?)
    }
}

/// Pointer text announcing a session.
pub fn session_banner(topic: &str) -> String {
    format!("=== Chat Session: {} ===", topic)
}

/// Pointer text closing a session.
pub fn session_end_line(duration_minutes: i64, message_count: u64) -> String {
    format!(
        "Duration: {}min, Messages: {}",
        duration_minutes, message_count
    )
}
