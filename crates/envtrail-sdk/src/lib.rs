//! envtrail-sdk: track agent conversations into per-project pointer files.
//!
//! # Overview
//!
//! A tracked project keeps a small `.env` file of previews, each pointing
//! at the full text in an append-only weekly JSONL log under
//! `.claude/logs/`. The pointer file stays under a size limit by evicting
//! old entries and is rotated into weekly backups; the log keeps everything.
//!
//! # Quickstart
//!
//! ```no_run
//! use envtrail_sdk::Client;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = Client::connect_default()?;
//! client.start_tracking("~/Development/my-app", "Fix login bug")?;
//! client.add_exchange("Why does login fail?", "The session token expired.")?;
//! let done = client.finalize("Refresh the token before it expires")?;
//! println!("{} exchanges in {} min", done.message_count, done.duration_minutes);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! This SDK is a facade over:
//! - `envtrail-types`: records, pointer entries, hashes and week stamps
//! - `envtrail-store`: the pointer file, weekly logs, backups and locking
//! - `envtrail-runtime`: the session state machine and configuration

pub mod client;
pub mod error;
pub mod mcp;
pub mod query;

pub use client::Client;
pub use error::{Error, Result};

pub mod types {
    pub use envtrail_runtime::{
        AppendReceipt, Config, FinalizeReceipt, RotateReceipt, SessionStatus, StartReceipt,
        StatusReport, WeekRecords,
    };
    pub use envtrail_store::{EvictionReport, Limits, PointerStats, RotationOutcome};
    pub use envtrail_types::{
        ChatId, ContentHash, LogBody, LogRecord, LogReference, PointerEntry, Preview, WeekStamp,
    };
}
