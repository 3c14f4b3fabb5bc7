//! The bounded pointer file (`.env`).
//!
//! Managed entries are a `CLAUDE_PTR_<key>="<preview>"` line followed by a
//! `# Log: <path>#<hash>` line. Everything else in the file belongs to the
//! user and survives both eviction and rotation.

use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use envtrail_types::{
    LogReference, PointerEntry, Preview, is_managed_line, is_reference_line, unescape_value,
};

use crate::fsutil;
use crate::{Error, Limits, Result};

/// Written when the pointer file is created.
pub const POINTER_FILE_HEADER: &str = "# Project Environment Variables\n\n";

/// Line closing a finalized session.
pub const SESSION_SEPARATOR: &str = "# ===================================";

/// Header placed after the user's lines when the file is rotated.
pub const SECTION_HEADER: &str = "# === envtrail session history ===";

static POINTER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:CLAUDE_PTR_|CLAUDE_CHAT_)([A-Za-z0-9_.:\-]+)="(.*)"$"#)
        .expect("pointer line pattern is valid")
});

enum Line<'a> {
    Foreign(&'a str),
    Entry {
        pointer: &'a str,
        reference: Option<&'a str>,
    },
}

/// Group lines into managed entries (pointer + reference) and foreign lines.
fn classify(content: &str) -> Vec<Line<'_>> {
    let mut out = Vec::new();
    let mut lines = content.lines().peekable();
    while let Some(line) = lines.next() {
        if is_managed_line(line) {
            let reference = lines.next_if(|next| is_reference_line(next));
            out.push(Line::Entry {
                pointer: line,
                reference,
            });
        } else {
            out.push(Line::Foreign(line));
        }
    }
    out
}

fn parse_entry(
    pointer: &str,
    reference: Option<&str>,
    preview_chars: usize,
) -> Option<PointerEntry> {
    let caps = POINTER_LINE.captures(pointer)?;
    Some(PointerEntry {
        key: caps[1].to_string(),
        preview: Preview::from_stored(unescape_value(&caps[2]), preview_chars),
        reference: reference.and_then(|r| r.parse::<LogReference>().ok()),
    })
}

fn join_lines(lines: &[&str]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Result of compacting pointer-file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compaction {
    pub content: String,
    pub evicted: usize,
    pub kept: usize,
}

/// Keep every foreign line and the `retain` most recent managed entries.
///
/// Foreign lines come first, retained entries after them; the original
/// interleaving between the two groups is not preserved.
pub fn compact(content: &str, retain: usize) -> Compaction {
    let mut foreign = Vec::new();
    let mut entries = Vec::new();
    for line in classify(content) {
        match line {
            Line::Foreign(l) => foreign.push(l),
            Line::Entry { pointer, reference } => entries.push((pointer, reference)),
        }
    }

    let evicted = entries.len().saturating_sub(retain);
    let mut lines = foreign;
    for &(pointer, reference) in &entries[evicted..] {
        lines.push(pointer);
        if let Some(reference) = reference {
            lines.push(reference);
        }
    }

    Compaction {
        content: join_lines(&lines),
        evicted,
        kept: entries.len() - evicted,
    }
}

/// Content left after rotation: the user's own lines plus a fresh header.
///
/// Drops managed entries, stray reference lines, blank lines, separators and
/// earlier section headers.
pub fn strip_managed(content: &str) -> String {
    let kept: Vec<&str> = classify(content)
        .into_iter()
        .filter_map(|line| match line {
            Line::Foreign(l) => Some(l),
            Line::Entry { .. } => None,
        })
        .filter(|l| {
            !l.trim().is_empty()
                && !is_reference_line(l)
                && *l != SESSION_SEPARATOR
                && *l != SECTION_HEADER
        })
        .collect();

    let mut out = join_lines(&kept);
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(SECTION_HEADER);
    out.push_str("\n\n");
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct EvictionReport {
    pub size_before: u64,
    pub size_after: u64,
    pub evicted: usize,
    pub kept: usize,
    pub still_over_limit: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointerStats {
    pub path: PathBuf,
    pub exists: bool,
    pub size_bytes: u64,
    pub limit_bytes: u64,
    pub managed_count: usize,
    pub recent: Vec<PointerEntry>,
}

/// Handle on a project's pointer file.
#[derive(Debug, Clone)]
pub struct PointerFile {
    path: PathBuf,
}

impl PointerFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Create the file with its header if absent. Returns whether it was created.
    pub fn ensure_exists(&self) -> Result<bool> {
        if self.exists() {
            return Ok(false);
        }
        fs::write(&self.path, POINTER_FILE_HEADER).map_err(|e| Error::io(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), "created pointer file");
        Ok(true)
    }

    pub fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))
    }

    pub fn size(&self) -> Result<u64> {
        fsutil::file_size(&self.path)
    }

    pub fn append_entry(&self, entry: &PointerEntry) -> Result<()> {
        self.append_raw(&entry.render())
    }

    /// Appends `text`, first closing an unterminated last line so user
    /// content never runs into a managed line.
    pub fn append_raw(&self, text: &str) -> Result<()> {
        if fsutil::ends_with_newline(&self.path)? {
            fsutil::append(&self.path, text)
        } else {
            fsutil::append(&self.path, &format!("\n{}", text))
        }
    }

    /// Appends the block that closes a finalized session.
    pub fn append_separator(&self) -> Result<()> {
        self.append_raw(&format!("\n{}\n\n", SESSION_SEPARATOR))
    }

    /// Evict old entries when the file exceeds the size limit.
    ///
    /// Returns `None` when no eviction was needed.
    pub fn enforce_limit(&self, limits: &Limits) -> Result<Option<EvictionReport>> {
        if !self.exists() {
            return Ok(None);
        }
        let size_before = self.size()?;
        if size_before <= limits.pointer_size_limit {
            return Ok(None);
        }

        let content = self.read()?;
        let compaction = compact(&content, limits.retained_pointers);
        fsutil::write_atomic(&self.path, &compaction.content)?;
        let size_after = compaction.content.len() as u64;
        let still_over_limit = size_after > limits.pointer_size_limit;

        tracing::info!(
            path = %self.path.display(),
            size_before,
            size_after,
            evicted = compaction.evicted,
            "pointer file over limit, evicted old entries"
        );
        if still_over_limit {
            tracing::warn!(
                path = %self.path.display(),
                size_after,
                limit = limits.pointer_size_limit,
                "pointer file still over limit after eviction; unmanaged lines exceed it"
            );
        }

        Ok(Some(EvictionReport {
            size_before,
            size_after,
            evicted: compaction.evicted,
            kept: compaction.kept,
            still_over_limit,
        }))
    }

    /// All parseable managed entries, oldest first.
    pub fn entries(&self, limits: &Limits) -> Result<Vec<PointerEntry>> {
        if !self.exists() {
            return Ok(Vec::new());
        }
        let content = self.read()?;
        Ok(classify(&content)
            .into_iter()
            .filter_map(|line| match line {
                Line::Entry { pointer, reference } => {
                    parse_entry(pointer, reference, limits.preview_chars)
                }
                Line::Foreign(_) => None,
            })
            .collect())
    }

    /// Read-only summary with the `recent` newest entries.
    pub fn stats(&self, limits: &Limits, recent: usize) -> Result<PointerStats> {
        if !self.exists() {
            return Ok(PointerStats {
                path: self.path.clone(),
                exists: false,
                size_bytes: 0,
                limit_bytes: limits.pointer_size_limit,
                managed_count: 0,
                recent: Vec::new(),
            });
        }

        let content = self.read()?;
        let managed_count = content.lines().filter(|l| is_managed_line(l)).count();
        let mut entries = self.entries(limits)?;
        let skip = entries.len().saturating_sub(recent);
        let recent = entries.split_off(skip);

        Ok(PointerStats {
            path: self.path.clone(),
            exists: true,
            size_bytes: content.len() as u64,
            limit_bytes: limits.pointer_size_limit,
            managed_count,
            recent,
        })
    }
}
