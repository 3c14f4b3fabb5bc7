use crate::types::{LogLevel, OutputFormat};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "envtrail")]
#[command(
    about = "Bounded .env pointer files backed by weekly JSONL conversation logs",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Data directory holding config.toml (default: $ENVTRAIL_PATH or the system config dir)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    /// Log verbosity on stderr; ENVTRAIL_LOG overrides it with a filter directive
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config.toml if none exists
    Init,

    /// Show pointer file, log and backup statistics for a project
    Status {
        #[arg(long)]
        project: String,
    },

    /// Back up the pointer file for this week and clear its session entries
    Rotate {
        #[arg(long)]
        project: String,
    },

    /// Print the full log records behind a `path#hash` pointer reference
    Resolve {
        #[arg(long)]
        project: String,

        reference: String,
    },

    /// Print records from a weekly log (latest week by default)
    Log {
        #[arg(long)]
        project: String,

        /// Week as YYYY-Www (e.g. 2026-W42)
        #[arg(long)]
        week: Option<String>,

        /// Only the last N records
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List the weeks that have a log
    Weeks {
        #[arg(long)]
        project: String,
    },

    Mcp {
        #[command(subcommand)]
        command: McpCommand,
    },
}

#[derive(Subcommand)]
pub enum McpCommand {
    /// Run the MCP server on stdio
    Serve,
}
