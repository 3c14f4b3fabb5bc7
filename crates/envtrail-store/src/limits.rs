use serde::{Deserialize, Serialize};

use envtrail_types::DEFAULT_PREVIEW_CHARS;

/// Pointer-file size above which eviction runs (50 KiB).
pub const DEFAULT_POINTER_SIZE_LIMIT: u64 = 50 * 1024;

/// Managed entries kept by an eviction pass.
pub const DEFAULT_RETAINED_POINTERS: usize = 10;

/// Backup files kept per project.
pub const DEFAULT_RETAINED_BACKUPS: usize = 4;

/// Retention limits for a project's pointer file and backups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub pointer_size_limit: u64,
    pub preview_chars: usize,
    pub retained_pointers: usize,
    pub retained_backups: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            pointer_size_limit: DEFAULT_POINTER_SIZE_LIMIT,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            retained_pointers: DEFAULT_RETAINED_POINTERS,
            retained_backups: DEFAULT_RETAINED_BACKUPS,
        }
    }
}
