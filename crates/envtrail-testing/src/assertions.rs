//! Custom assertions for envtrail-specific validation.

use anyhow::{Context, Result};
use serde_json::Value;

/// Number of managed pointer lines (`CLAUDE_PTR_`/`CLAUDE_CHAT_`) in a pointer file.
pub fn managed_count(pointer_content: &str) -> usize {
    pointer_content
        .lines()
        .filter(|l| l.starts_with("CLAUDE_PTR_") || l.starts_with("CLAUDE_CHAT_"))
        .count()
}

/// Assert that every managed line is followed by its `# Log: ` reference line.
pub fn assert_entries_referenced(pointer_content: &str) -> Result<()> {
    let lines: Vec<&str> = pointer_content.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if !line.starts_with("CLAUDE_PTR_") {
            continue;
        }
        let next = lines
            .get(i + 1)
            .with_context(|| format!("Entry on line {} has no reference line", i + 1))?;
        if !next.starts_with("# Log: ") {
            anyhow::bail!("Entry on line {} is followed by {:?}", i + 1, next);
        }
    }
    Ok(())
}

/// Backup file names from `status --format json` output.
pub fn backup_names(status: &Value) -> Result<Vec<String>> {
    let backups = status["backups"]
        .as_array()
        .context("Expected 'backups' array in JSON")?;
    Ok(backups
        .iter()
        .filter_map(|b| b.as_str().map(String::from))
        .collect())
}

/// Assert an MCP response line is an error with `code`.
pub fn assert_rpc_error(response: &Value, code: i64) -> Result<()> {
    let actual = response["error"]["code"]
        .as_i64()
        .with_context(|| format!("Expected an error response, got {}", response))?;
    if actual != code {
        anyhow::bail!("Expected error code {}, got {}", code, actual);
    }
    Ok(())
}

/// Tool payload of a successful `tools/call` response.
pub fn tool_payload(response: &Value) -> Result<Value> {
    let text = response["result"]["content"][0]["text"]
        .as_str()
        .with_context(|| format!("Expected a tool result, got {}", response))?;
    Ok(serde_json::from_str(text)?)
}
