use std::path::{Path, PathBuf};

use envtrail_types::WeekStamp;

pub const POINTER_FILE_NAME: &str = ".env";
pub const BACKUP_PREFIX: &str = ".env.backup.";
pub const LOG_FILE_NAME: &str = "chat.jsonl";
pub const LOCK_FILE_NAME: &str = "envtrail.lock";

/// Where a tracked project keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pointer_path(&self) -> PathBuf {
        self.root.join(POINTER_FILE_NAME)
    }

    /// `.claude` directory holding logs and the lock file.
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(".claude")
    }

    pub fn logs_root(&self) -> PathBuf {
        self.state_dir().join("logs")
    }

    pub fn week_dir(&self, week: WeekStamp) -> PathBuf {
        self.logs_root().join(week.dir_name())
    }

    pub fn log_path(&self, week: WeekStamp) -> PathBuf {
        self.week_dir(week).join(LOG_FILE_NAME)
    }

    pub fn backup_name(week: WeekStamp) -> String {
        format!("{}{}", BACKUP_PREFIX, week.backup_suffix())
    }

    pub fn backup_path(&self, week: WeekStamp) -> PathBuf {
        self.root.join(Self::backup_name(week))
    }

    pub fn lock_path(&self) -> PathBuf {
        self.state_dir().join(LOCK_FILE_NAME)
    }

    /// Project-relative `/`-joined path of a file inside the project.
    pub fn relative(&self, path: &Path) -> Option<String> {
        envtrail_core::relative_slash_path(&self.root, path)
    }

    /// Resolve a project-relative reference path, rejecting anything that
    /// would leave the project directory.
    pub fn resolve_relative(&self, rel: &str) -> Option<PathBuf> {
        let rel_path = Path::new(rel);
        if rel_path.is_absolute() {
            return None;
        }
        let mut out = self.root.clone();
        for part in rel.split('/') {
            match part {
                "" | "." => continue,
                ".." => return None,
                part => out.push(part),
            }
        }
        Some(out)
    }
}
