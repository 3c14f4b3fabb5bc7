//! On-disk side of envtrail.
//!
//! A tracked project holds three kinds of files:
//! - `.env`: the pointer file, a bounded index of previews and references
//! - `.claude/logs/<YYYY>-W<WW>/chat.jsonl`: the append-only full-content log
//! - `.env.backup.<YYYY>W<WW>`: weekly snapshots of the pointer file
//!
//! The log is the durable record. The pointer file is disposable and is
//! compacted or rotated freely.

pub mod backup;
pub mod error;
pub mod journal;
pub mod layout;
pub mod limits;
pub mod lock;
pub mod pointer;

mod fsutil;

pub use backup::{BackupSet, RotationOutcome, rotate};
pub use error::{Error, Result};
pub use journal::WeekLog;
pub use layout::ProjectLayout;
pub use limits::Limits;
pub use lock::ProjectLock;
pub use pointer::{Compaction, EvictionReport, PointerFile, PointerStats};
