//! MCP JSON-RPC server.
//!
//! Newline-delimited JSON-RPC 2.0 over stdio, one request at a time.

use schemars::schema_for;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::io::{BufRead, Write};

use crate::Client;
use crate::query::{
    AddToEnvArgs, FinalizeEnvSessionArgs, GetEnvTrackingStatusArgs, ResolveEnvPointerArgs,
    RotateEnvBackupArgs, StartEnvTrackingArgs,
};

use super::error::{ErrorCode, McpError};
use super::tools::{
    handle_add_to_env, handle_finalize_env_session, handle_get_env_tracking_status,
    handle_resolve_env_pointer, handle_rotate_env_backup, handle_start_env_tracking,
};

const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

impl JsonRpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, error: McpError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

fn input_schema<T: schemars::JsonSchema>() -> Value {
    serde_json::to_value(schema_for!(T)).unwrap_or_else(|_| json!({ "type": "object" }))
}

fn parse_args<T: DeserializeOwned>(tool_name: &str, arguments: Value) -> Result<T, McpError> {
    serde_json::from_value(arguments).map_err(|e| McpError::from_validation(tool_name, e))
}

pub struct EnvTrailServer {
    client: Client,
}

impl EnvTrailServer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Handle one input line. Returns the serialized response, or `None` for
    /// blank lines and notifications.
    pub fn handle_line(&mut self, line: &str) -> Option<String> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let response = match serde_json::from_str::<Value>(trimmed) {
            Err(e) => {
                tracing::warn!(error = %e, "unparseable request");
                JsonRpcResponse::failure(Value::Null, McpError::parse_error(e))
            }
            Ok(value) => {
                let id = value.get("id").cloned().unwrap_or(Value::Null);
                match serde_json::from_value::<JsonRpcRequest>(value) {
                    Ok(request) => self.handle_request(request)?,
                    Err(e) => {
                        tracing::warn!(error = %e, "malformed request");
                        JsonRpcResponse::failure(id, McpError::invalid_request(e))
                    }
                }
            }
        };

        match serde_json::to_string(&response) {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize response");
                None
            }
        }
    }

    fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            if !request.method.starts_with("notifications/") {
                tracing::debug!(method = %request.method, "ignoring request without id");
            }
            return None;
        };
        tracing::debug!(method = %request.method, "request");

        Some(match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params),
            method => JsonRpcResponse::failure(id, McpError::method_not_found(method)),
        })
    }

    fn handle_initialize(&self, id: Value) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "envtrail",
                    "version": env!("CARGO_PKG_VERSION")
                },
                "instructions": "envtrail MCP Server - keeps a bounded .env pointer file per project with previews of each exchange, backed by weekly JSONL logs holding the full text. Call start_env_tracking once per conversation, add_to_env after each meaningful exchange, and finalize_env_session at the end."
            }),
        )
    }

    fn handle_list_tools(&self, id: Value) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "tools": [
                    {
                        "name": "start_env_tracking",
                        "description": "Start tracking this chat into the project's .env pointer file and weekly JSONL log. Starting again replaces the current session.",
                        "inputSchema": input_schema::<StartEnvTrackingArgs>(),
                    },
                    {
                        "name": "add_to_env",
                        "description": "Record one user/assistant exchange. Full text goes to the JSONL log; the .env file gets 200-character previews with '# Log: path#hash' references. Requires an active session.",
                        "inputSchema": input_schema::<AddToEnvArgs>(),
                    },
                    {
                        "name": "finalize_env_session",
                        "description": "Complete the chat session with a summary and stop tracking. Requires an active session.",
                        "inputSchema": input_schema::<FinalizeEnvSessionArgs>(),
                    },
                    {
                        "name": "rotate_env_backup",
                        "description": "Create this week's backup of the .env file, keep the 4 most recent backups, and clear session entries from the live file. User lines are kept.",
                        "inputSchema": input_schema::<RotateEnvBackupArgs>(),
                    },
                    {
                        "name": "get_env_tracking_status",
                        "description": "Check tracking status and the project's .env, log and backup statistics. Read-only.",
                        "inputSchema": input_schema::<GetEnvTrackingStatusArgs>(),
                    },
                    {
                        "name": "resolve_env_pointer",
                        "description": "Follow a '# Log: path#hash' reference from the .env file to the full log records. Read-only.",
                        "inputSchema": input_schema::<ResolveEnvPointerArgs>(),
                    }
                ]
            }),
        )
    }

    fn handle_call_tool(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::failure(id, McpError::invalid_params("Missing params"));
        };
        let Some(tool_name) = params.get("name").and_then(|v| v.as_str()) else {
            return JsonRpcResponse::failure(id, McpError::invalid_params("Missing tool name"));
        };
        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        match self.call_tool(tool_name, arguments) {
            Ok(content) => JsonRpcResponse::success(
                id,
                json!({
                    "content": [
                        {
                            "type": "text",
                            "text": serde_json::to_string(&content).unwrap_or_else(|_| content.to_string())
                        }
                    ]
                }),
            ),
            Err(e) => {
                tracing::info!(tool = tool_name, code = e.code.code(), message = %e.message, "tool call failed");
                JsonRpcResponse::failure(id, e)
            }
        }
    }

    fn call_tool(&mut self, tool_name: &str, arguments: Value) -> Result<Value, McpError> {
        let client = &mut self.client;
        let result = match tool_name {
            "start_env_tracking" => {
                handle_start_env_tracking(client, parse_args(tool_name, arguments)?)
            }
            "add_to_env" => handle_add_to_env(client, parse_args(tool_name, arguments)?),
            "finalize_env_session" => {
                handle_finalize_env_session(client, parse_args(tool_name, arguments)?)
            }
            "rotate_env_backup" => {
                handle_rotate_env_backup(client, parse_args(tool_name, arguments)?)
            }
            "get_env_tracking_status" => {
                handle_get_env_tracking_status(client, parse_args(tool_name, arguments)?)
            }
            "resolve_env_pointer" => {
                handle_resolve_env_pointer(client, parse_args(tool_name, arguments)?)
            }
            _ => {
                return Err(McpError::new(
                    ErrorCode::InvalidParams,
                    format!("Unknown tool: {}", tool_name),
                )
                .with_data(json!({ "tool": tool_name })));
            }
        };
        result.map_err(|e| McpError::from_tool(tool_name, &e))
    }
}

/// Serve requests read from `input`, writing one response line per request.
pub fn serve<R: BufRead, W: Write>(client: Client, input: R, mut output: W) -> anyhow::Result<()> {
    let mut server = EnvTrailServer::new(client);
    for line in input.lines() {
        let line = line?;
        if let Some(response) = server.handle_line(&line) {
            writeln!(output, "{}", response)?;
            output.flush()?;
        }
    }
    tracing::debug!("input closed, shutting down");
    Ok(())
}

/// Run the MCP server over stdio.
pub fn run_server(client: Client) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    serve(client, stdin.lock(), stdout.lock())
}
