use crate::context::ExecutionContext;
use anyhow::Result;
use envtrail_sdk::mcp;

pub fn handle_serve(ctx: &ExecutionContext) -> Result<()> {
    let client = ctx.client()?;
    tracing::info!(data_dir = %ctx.data_dir().display(), "starting MCP server on stdio");
    mcp::run_server(client)
}
