//! Weekly snapshots of the pointer file and their retention.

use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use envtrail_types::WeekStamp;

use crate::layout::BACKUP_PREFIX;
use crate::pointer::{PointerFile, strip_managed};
use crate::{Error, Limits, ProjectLayout, Result, fsutil};

/// Backup files of one project.
#[derive(Debug, Clone)]
pub struct BackupSet {
    layout: ProjectLayout,
}

impl BackupSet {
    pub fn new(layout: ProjectLayout) -> Self {
        Self { layout }
    }

    /// Backup file names, newest first.
    ///
    /// Names embed the year+week stamp, so descending name order is
    /// reverse-chronological.
    pub fn list(&self) -> Result<Vec<String>> {
        let root = self.layout.root();
        let mut names: Vec<String> = fs::read_dir(root)
            .map_err(|e| Error::io(root, e))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| is_backup_name(name))
            .collect();
        names.sort_by(|a, b| b.cmp(a));
        Ok(names)
    }

    /// Write a verbatim copy of the pointer content for `week`.
    ///
    /// A second rotation in the same week replaces that week's backup.
    pub fn write(&self, week: WeekStamp, content: &str) -> Result<PathBuf> {
        let path = self.layout.backup_path(week);
        fs::write(&path, content).map_err(|e| Error::io(&path, e))?;
        Ok(path)
    }

    /// Delete all but the `retain` newest backups; returns the deleted names.
    ///
    /// A backup that cannot be deleted is logged and skipped.
    pub fn prune(&self, retain: usize) -> Result<Vec<String>> {
        let mut removed = Vec::new();
        for name in self.list()?.into_iter().skip(retain) {
            let path = self.layout.root().join(&name);
            match fs::remove_file(&path) {
                Ok(()) => removed.push(name),
                Err(err) => tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to delete old backup"
                ),
            }
        }
        Ok(removed)
    }
}

/// `.env.backup.<year>W<week>`; other `.env.backup.*` files belong to the user.
fn is_backup_name(name: &str) -> bool {
    name.strip_prefix(BACKUP_PREFIX)
        .and_then(|suffix| {
            suffix
                .parse::<WeekStamp>()
                .ok()
                .filter(|week| week.backup_suffix() == suffix)
        })
        .is_some()
}

#[derive(Debug, Clone, Serialize)]
pub struct RotationOutcome {
    pub backup_file: String,
    pub size_before: u64,
    pub size_after: u64,
    pub pruned: Vec<String>,
}

/// Snapshot the pointer file into this week's backup, prune old backups and
/// strip managed entries from the live file.
///
/// Returns `None` when the project has no pointer file. The live file is only
/// rewritten after the backup has been written, and the rewrite is atomic, so
/// a failure at any step leaves it unchanged.
pub fn rotate(
    layout: &ProjectLayout,
    week: WeekStamp,
    limits: &Limits,
) -> Result<Option<RotationOutcome>> {
    let pointer = PointerFile::new(layout.pointer_path());
    if !pointer.exists() {
        return Ok(None);
    }

    let content = pointer.read()?;
    let backups = BackupSet::new(layout.clone());
    backups.write(week, &content)?;
    let pruned = backups.prune(limits.retained_backups)?;

    let remaining = strip_managed(&content);
    fsutil::write_atomic(pointer.path(), &remaining)?;

    let outcome = RotationOutcome {
        backup_file: ProjectLayout::backup_name(week),
        size_before: content.len() as u64,
        size_after: remaining.len() as u64,
        pruned,
    };
    tracing::info!(
        project = %layout.root().display(),
        backup = %outcome.backup_file,
        size_before = outcome.size_before,
        size_after = outcome.size_after,
        pruned = outcome.pruned.len(),
        "rotated pointer file"
    );
    Ok(Some(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::SECTION_HEADER;
    use tempfile::TempDir;

    fn week(n: u32) -> WeekStamp {
        WeekStamp { year: 2026, week: n }
    }

    #[test]
    fn test_rotate_without_pointer_file_is_noop() {
        let temp = TempDir::new().unwrap();
        let layout = ProjectLayout::new(temp.path());
        assert!(rotate(&layout, week(42), &Limits::default()).unwrap().is_none());
        assert!(BackupSet::new(layout).list().unwrap().is_empty());
    }

    #[test]
    fn test_rotate_backs_up_verbatim_and_strips_entries() {
        let temp = TempDir::new().unwrap();
        let layout = ProjectLayout::new(temp.path());
        let original = "KEEP=1\nCLAUDE_PTR_a_USER_1=\"hi\"\n# Log: x.jsonl#2cf24dba5fb0a30e\n";
        fs::write(layout.pointer_path(), original).unwrap();

        let outcome = rotate(&layout, week(42), &Limits::default())
            .unwrap()
            .unwrap();
        assert_eq!(outcome.backup_file, ".env.backup.2026W42");
        assert_eq!(outcome.size_before, original.len() as u64);

        let backup = fs::read_to_string(layout.backup_path(week(42))).unwrap();
        assert_eq!(backup, original);

        let live = fs::read_to_string(layout.pointer_path()).unwrap();
        assert_eq!(live, format!("KEEP=1\n\n{}\n\n", SECTION_HEADER));
        assert_eq!(outcome.size_after, live.len() as u64);
    }

    #[test]
    fn test_six_weekly_rotations_keep_four_newest() {
        let temp = TempDir::new().unwrap();
        let layout = ProjectLayout::new(temp.path());
        for n in 1..=6 {
            fs::write(layout.pointer_path(), format!("WEEK={}\n", n)).unwrap();
            rotate(&layout, week(n), &Limits::default()).unwrap();
        }
        let names = BackupSet::new(layout).list().unwrap();
        assert_eq!(
            names,
            vec![
                ".env.backup.2026W06",
                ".env.backup.2026W05",
                ".env.backup.2026W04",
                ".env.backup.2026W03",
            ]
        );
    }

    #[test]
    fn test_foreign_backup_files_are_ignored() {
        let temp = TempDir::new().unwrap();
        let layout = ProjectLayout::new(temp.path());
        let foreign = [
            ".env.backup.local",
            ".env.backup.prod",
            ".env.backup.staging",
            ".env.backup.test",
            ".env.backup.1-manual",
            ".env.backup.2026-W01",
        ];
        for name in foreign {
            fs::write(layout.root().join(name), "USER=1\n").unwrap();
        }
        fs::write(layout.pointer_path(), "KEEP=1\n").unwrap();

        let outcome = rotate(&layout, week(42), &Limits::default())
            .unwrap()
            .unwrap();
        assert!(outcome.pruned.is_empty());
        assert_eq!(
            BackupSet::new(layout.clone()).list().unwrap(),
            vec![".env.backup.2026W42"]
        );
        assert_eq!(
            fs::read_to_string(layout.backup_path(week(42))).unwrap(),
            "KEEP=1\n"
        );
        for name in foreign {
            assert!(layout.root().join(name).is_file(), "{} was removed", name);
        }
    }

    #[test]
    fn test_same_week_rotation_replaces_backup() {
        let temp = TempDir::new().unwrap();
        let layout = ProjectLayout::new(temp.path());
        fs::write(layout.pointer_path(), "FIRST=1\n").unwrap();
        rotate(&layout, week(10), &Limits::default()).unwrap();
        fs::write(layout.pointer_path(), "SECOND=1\n").unwrap();
        rotate(&layout, week(10), &Limits::default()).unwrap();

        let backups = BackupSet::new(layout.clone());
        assert_eq!(backups.list().unwrap().len(), 1);
        let content = fs::read_to_string(layout.backup_path(week(10))).unwrap();
        assert_eq!(content, "SECOND=1\n");
    }

    #[test]
    fn test_failed_backup_leaves_pointer_file_unchanged() {
        let temp = TempDir::new().unwrap();
        let layout = ProjectLayout::new(temp.path());
        let original = "KEEP=1\nCLAUDE_PTR_a_USER_1=\"hi\"\n";
        fs::write(layout.pointer_path(), original).unwrap();
        // A directory squatting on the backup name makes the backup write fail
        fs::create_dir(layout.backup_path(week(42))).unwrap();

        assert!(rotate(&layout, week(42), &Limits::default()).is_err());
        assert_eq!(fs::read_to_string(layout.pointer_path()).unwrap(), original);
    }
}
