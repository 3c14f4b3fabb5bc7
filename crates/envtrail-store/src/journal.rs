//! Append-only weekly log of full records (`chat.jsonl`).

use serde::Serialize;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use envtrail_types::{ContentHash, LogRecord, LogReference, WeekStamp};

use crate::fsutil;
use crate::{Error, ProjectLayout, Result};

#[derive(Debug, Clone, Serialize)]
pub struct LogStats {
    pub path: PathBuf,
    pub exists: bool,
    pub size_bytes: u64,
    pub record_count: usize,
}

/// Handle on one week's log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekLog {
    path: PathBuf,
}

impl WeekLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn for_week(layout: &ProjectLayout, week: WeekStamp) -> Self {
        Self::new(layout.log_path(week))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Create the week directory if needed.
    pub fn ensure_dir(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }
        Ok(())
    }

    pub fn append(&self, record: &LogRecord) -> Result<()> {
        let mut line = record.to_line()?;
        line.push('\n');
        fsutil::append(&self.path, &line)?;
        tracing::debug!(
            path = %self.path.display(),
            kind = record.body.kind(),
            message_num = record.message_num,
            "appended log record"
        );
        Ok(())
    }

    /// Every decodable record in file order. Undecodable lines are skipped.
    pub fn records(&self) -> Result<Vec<LogRecord>> {
        let file = fs::File::open(&self.path).map_err(|e| Error::io(&self.path, e))?;
        let mut records = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| Error::io(&self.path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            match LogRecord::from_line(&line) {
                Ok(record) => records.push(record),
                Err(err) => tracing::warn!(
                    path = %self.path.display(),
                    line = idx + 1,
                    error = %err,
                    "skipping undecodable log line"
                ),
            }
        }
        Ok(records)
    }

    /// Records whose pointer text hashes to `hash`.
    pub fn find_by_hash(&self, hash: &ContentHash) -> Result<Vec<LogRecord>> {
        Ok(self
            .records()?
            .into_iter()
            .filter(|record| &record.content_hash() == hash)
            .collect())
    }

    pub fn stats(&self) -> Result<LogStats> {
        if !self.exists() {
            return Ok(LogStats {
                path: self.path.clone(),
                exists: false,
                size_bytes: 0,
                record_count: 0,
            });
        }
        let content = fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))?;
        Ok(LogStats {
            path: self.path.clone(),
            exists: true,
            size_bytes: content.len() as u64,
            record_count: content.lines().filter(|l| !l.trim().is_empty()).count(),
        })
    }
}

/// Follow a pointer's reference back to the full record(s) in the project.
pub fn resolve(layout: &ProjectLayout, reference: &LogReference) -> Result<Vec<LogRecord>> {
    let path = layout.resolve_relative(&reference.path).ok_or_else(|| {
        Error::InvalidReference(format!("{} escapes the project directory", reference.path))
    })?;
    let log = WeekLog::new(path);
    if !log.exists() {
        return Ok(Vec::new());
    }
    log.find_by_hash(&reference.hash)
}

/// Week directories present under the project's log root, oldest first.
pub fn list_weeks(layout: &ProjectLayout) -> Result<Vec<WeekStamp>> {
    let root = layout.logs_root();
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut weeks = Vec::new();
    for entry in WalkDir::new(&root).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
            Error::io(path, e.into())
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if let Ok(week) = entry.file_name().to_string_lossy().parse::<WeekStamp>() {
            weeks.push(week);
        }
    }
    weeks.sort();
    Ok(weeks)
}
