//! Advisory lock serializing writers of one project.

use fs4::fs_std::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::{Error, ProjectLayout, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Exclusive lock on `<project>/.claude/envtrail.lock`, released on drop.
#[derive(Debug)]
pub struct ProjectLock {
    path: PathBuf,
    _file: File,
}

impl ProjectLock {
    pub fn acquire(layout: &ProjectLayout, timeout: Duration) -> Result<Self> {
        let state_dir = layout.state_dir();
        fs::create_dir_all(&state_dir).map_err(|e| Error::io(&state_dir, e))?;
        Self::acquire_path(&layout.lock_path(), timeout)
    }

    pub fn acquire_path(path: &Path, timeout: Duration) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| Error::io(path, e))?;

        let start = Instant::now();
        loop {
            match FileExt::try_lock_exclusive(&file) {
                Ok(true) => {
                    return Ok(Self {
                        path: path.to_path_buf(),
                        _file: file,
                    });
                }
                Ok(false) => {}
                Err(err) => return Err(Error::io(path, err)),
            }

            if start.elapsed() >= timeout {
                return Err(Error::LockTimeout {
                    path: path.to_path_buf(),
                    waited_ms: timeout.as_millis() as u64,
                });
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
