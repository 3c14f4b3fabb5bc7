pub mod clock;
pub mod config;
pub mod error;
pub mod reports;
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{Error, Result};
pub use reports::{
    AppendReceipt, FinalizeReceipt, RotateReceipt, SessionStatus, StartReceipt, StatusReport,
    WeekRecords,
};
pub use session::{ActiveSession, SessionLog, SessionState};
