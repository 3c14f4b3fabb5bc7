//! JSON-RPC error codes and their mapping from SDK errors.

use serde::Serialize;
use serde_json::{Value, json};

use crate::Error;

/// JSON-RPC error codes used by the server.
///
/// Standard codes are negative 32xxx; `-32001` and `-32002` are
/// server-defined codes for session and project failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    NoActiveSession,
    ProjectNotFound,
}

impl ErrorCode {
    pub fn code(self) -> i32 {
        match self {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
            ErrorCode::NoActiveSession => -32001,
            ErrorCode::ProjectNotFound => -32002,
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.code())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct McpError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl McpError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self::new(ErrorCode::ParseError, format!("Parse error: {}", detail))
    }

    pub fn invalid_request(detail: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidRequest,
            format!("Invalid request: {}", detail),
        )
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            ErrorCode::MethodNotFound,
            format!("Method not found: {}", method),
        )
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParams, message)
    }

    /// Convert serde deserialization error to an invalid-params error.
    pub fn from_validation(tool_name: &str, error: serde_json::Error) -> Self {
        let detail = error.to_string();

        if let Some(field) = missing_field(&detail) {
            return Self::invalid_params(format!(
                "Invalid params: missing required field \"{}\"",
                field
            ))
            .with_data(json!({
                "missing": [field],
                "tool": tool_name,
            }));
        }

        Self::invalid_params(format!("Invalid params: {}", detail)).with_data(json!({
            "tool": tool_name,
            "detail": detail,
        }))
    }

    /// Map a failed tool call to its JSON-RPC error.
    pub fn from_tool(tool_name: &str, error: &Error) -> Self {
        use envtrail_runtime::Error as RuntimeError;

        let code = match error {
            Error::Session(RuntimeError::NoActiveSession) => ErrorCode::NoActiveSession,
            Error::Session(RuntimeError::ProjectNotFound(_)) => ErrorCode::ProjectNotFound,
            Error::Session(RuntimeError::InvalidReference(_)) | Error::InvalidInput(_) => {
                ErrorCode::InvalidParams
            }
            Error::Session(_) | Error::Internal(_) => ErrorCode::InternalError,
        };

        Self::new(code, error.to_string()).with_data(json!({
            "tool": tool_name,
            "kind": error.kind(),
        }))
    }
}

impl std::fmt::Display for McpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code.code())
    }
}

impl std::error::Error for McpError {}

/// Field name from a serde "missing field `name`" message.
fn missing_field(detail: &str) -> Option<&str> {
    let rest = detail.strip_prefix("missing field `")?;
    let end = rest.find('`')?;
    Some(&rest[..end])
}
