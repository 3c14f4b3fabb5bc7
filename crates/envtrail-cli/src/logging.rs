//! stderr logging for the CLI.
//!
//! stdout carries command output and the MCP channel, so log lines always go
//! to stderr.

use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::types::LogLevel;

pub const LOG_ENV_VAR: &str = "ENVTRAIL_LOG";

/// `ENVTRAIL_LOG` when set and valid, otherwise `level`.
pub fn filter_for(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

pub fn init(level: LogLevel) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}
