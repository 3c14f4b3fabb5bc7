//! Session lifecycle arguments.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Start tracking a conversation into a project's pointer file.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StartEnvTrackingArgs {
    /// Project directory. Absolute, `~/...`, or relative to the configured
    /// project base (e.g., "Development/my-app").
    pub project_path: String,
    /// Brief topic description for this chat session
    pub chat_topic: String,
}

/// Record one user/assistant exchange in the active session.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddToEnvArgs {
    /// User's message content
    pub user_message: String,
    /// Assistant's response content
    pub assistant_message: String,
}

/// Close the active session with a summary.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FinalizeEnvSessionArgs {
    /// Brief summary of the entire chat session
    pub session_summary: String,
}
