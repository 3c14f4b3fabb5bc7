//! Arguments for tools that read or rotate a project's files.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Back up the pointer file for this week and clear its session entries.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct RotateEnvBackupArgs {
    /// Project directory. Defaults to the active session's project.
    #[serde(default)]
    pub project_path: Option<String>,
}

/// Report tracking state and pointer/log/backup statistics.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetEnvTrackingStatusArgs {
    /// Project directory to inspect. Defaults to the active session's project.
    #[serde(default)]
    pub project_path: Option<String>,
}

/// Fetch the full log records behind a pointer's `# Log:` reference.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ResolveEnvPointerArgs {
    /// Reference as written in the pointer file, with or without the
    /// leading "# Log: " (e.g., ".claude/logs/2026-W42/chat.jsonl#2cf24dba5fb0a30e")
    pub reference: String,
    /// Project directory. Defaults to the active session's project.
    #[serde(default)]
    pub project_path: Option<String>,
}
