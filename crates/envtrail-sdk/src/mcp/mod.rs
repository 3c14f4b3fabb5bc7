//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes session tracking as tools over JSON-RPC on stdio, so an agent can
//! record its own conversation into the project it is working on.

pub mod error;
mod server;
mod tools;

pub use error::{ErrorCode, McpError};
pub use server::{EnvTrailServer, run_server, serve};
