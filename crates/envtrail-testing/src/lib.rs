//! Testing infrastructure for envtrail integration tests.
//!
//! - `TestWorld`: isolated data directory and project directories, plus a
//!   configured `envtrail` command
//! - `fixtures`: recorded sessions written through the SDK
//! - `assertions`: checks on pointer files and CLI JSON output

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use fixtures::SessionScript;
pub use world::{CliResult, TestWorld};
