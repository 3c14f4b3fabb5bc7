//! Managed entries of the pointer file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{ChatId, ContentHash, EntryRole, Error, Preview};

/// Prefix of every managed pointer line.
pub const POINTER_PREFIX: &str = "CLAUDE_PTR_";

/// Prefix written by older tracker versions; still treated as managed.
pub const LEGACY_POINTER_PREFIX: &str = "CLAUDE_CHAT_";

/// Prefix of the reference comment that follows a pointer line.
pub const REFERENCE_PREFIX: &str = "# Log: ";

/// Whether a pointer-file line is owned by the session log.
pub fn is_managed_line(line: &str) -> bool {
    line.starts_with(POINTER_PREFIX) || line.starts_with(LEGACY_POINTER_PREFIX)
}

pub fn is_reference_line(line: &str) -> bool {
    line.starts_with(REFERENCE_PREFIX)
}

/// Location of a full record: log path relative to the project plus hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogReference {
    /// Relative path with `/` separators.
    pub path: String,
    pub hash: ContentHash,
}

impl LogReference {
    pub fn new(path: impl Into<String>, hash: ContentHash) -> Self {
        Self {
            path: path.into(),
            hash,
        }
    }
}

impl fmt::Display for LogReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.path, self.hash)
    }
}

impl FromStr for LogReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix(REFERENCE_PREFIX).unwrap_or(s);
        let (path, hash) = s
            .rsplit_once('#')
            .ok_or_else(|| Error::InvalidReference(s.to_string()))?;
        let hash = ContentHash::new(hash);
        if path.is_empty() || !hash.is_well_formed() {
            return Err(Error::InvalidReference(s.to_string()));
        }
        Ok(Self::new(path, hash))
    }
}

/// One managed entry: the pointer line and its reference line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerEntry {
    pub key: String,
    pub preview: Preview,
    pub reference: Option<LogReference>,
}

impl PointerEntry {
    /// Entry keyed by the session id (`SESSION_START`, `SESSION_SUMMARY`, `SESSION_END`).
    pub fn for_session(
        chat_id: &ChatId,
        role: EntryRole,
        preview: Preview,
        reference: LogReference,
    ) -> Self {
        Self {
            key: format!("{}_{}", chat_id, role.tag()),
            preview,
            reference: Some(reference),
        }
    }

    /// Entry keyed by write time, role and sequence number (`USER_3`, `ASSISTANT_3`).
    pub fn for_message(
        timestamp: &str,
        role: EntryRole,
        message_num: u64,
        preview: Preview,
        reference: LogReference,
    ) -> Self {
        Self {
            key: format!("{}_{}_{}", timestamp, role.tag(), message_num),
            preview,
            reference: Some(reference),
        }
    }

    /// Role parsed back from the key, if it carries one.
    pub fn role(&self) -> Option<EntryRole> {
        EntryRole::all().into_iter().find(|role| {
            let tag = role.tag();
            if role.is_per_message() {
                self.key
                    .rsplit_once('_')
                    .is_some_and(|(head, _)| head.ends_with(&format!("_{}", tag)))
            } else {
                self.key.ends_with(&format!("_{}", tag))
            }
        })
    }

    /// Pointer line plus reference line, newline-terminated.
    pub fn render(&self) -> String {
        let mut out = format!(
            "{}{}=\"{}\"\n",
            POINTER_PREFIX,
            self.key,
            self.preview.escaped()
        );
        if let Some(reference) = &self.reference {
            out.push_str(REFERENCE_PREFIX);
            out.push_str(&reference.to_string());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> LogReference {
        LogReference::new(".claude/logs/2026-W42/chat.jsonl", ContentHash::of("hello"))
    }

    #[test]
    fn test_render_message_entry() {
        let entry = PointerEntry::for_message(
            "20261016T093000",
            EntryRole::User,
            1,
            Preview::new("hello", 200),
            reference(),
        );
        assert_eq!(
            entry.render(),
            "CLAUDE_PTR_20261016T093000_USER_1=\"hello\"\n# Log: .claude/logs/2026-W42/chat.jsonl#2cf24dba5fb0a30e\n"
        );
        assert_eq!(entry.role(), Some(EntryRole::User));
    }

    #[test]
    fn test_session_entry_role() {
        let entry = PointerEntry::for_session(
            &ChatId::new("20261016T093000"),
            EntryRole::SessionSummary,
            Preview::new("done", 200),
            reference(),
        );
        assert_eq!(entry.key, "20261016T093000_SESSION_SUMMARY");
        assert_eq!(entry.role(), Some(EntryRole::SessionSummary));
    }

    #[test]
    fn test_parse_reference() {
        let parsed: LogReference = "# Log: .claude/logs/2026-W42/chat.jsonl#2cf24dba5fb0a30e"
            .parse()
            .unwrap();
        assert_eq!(parsed, reference());
    }

    #[test]
    fn test_parse_reference_rejects_bad_hash() {
        assert!("chat.jsonl#nothex".parse::<LogReference>().is_err());
        assert!("chat.jsonl".parse::<LogReference>().is_err());
        assert!("#2cf24dba5fb0a30e".parse::<LogReference>().is_err());
    }

    #[test]
    fn test_managed_line_detection() {
        assert!(is_managed_line("CLAUDE_PTR_x=\"y\""));
        assert!(is_managed_line("CLAUDE_CHAT_old=\"y\""));
        assert!(!is_managed_line("DATABASE_URL=postgres://"));
        assert!(!is_managed_line("# Log: a#b"));
        assert!(is_reference_line("# Log: a#b"));
    }
}
