//! Tool argument types.
//!
//! Each struct doubles as the MCP tool's input schema via `schemars`.

pub mod records;
pub mod tracking;

pub use records::{GetEnvTrackingStatusArgs, ResolveEnvPointerArgs, RotateEnvBackupArgs};
pub use tracking::{AddToEnvArgs, FinalizeEnvSessionArgs, StartEnvTrackingArgs};
