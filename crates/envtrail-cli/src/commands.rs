use super::args::{Cli, Commands, McpCommand};
use super::handlers;
use crate::context::ExecutionContext;
use crate::logging;
use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);
    let ctx = ExecutionContext::new(cli.data_dir.as_deref(), cli.format)?;
    tracing::debug!(data_dir = %ctx.data_dir().display(), "resolved data directory");

    match cli.command {
        Commands::Init => handlers::init::handle(&ctx),
        Commands::Status { project } => handlers::status::handle(&ctx, &project),
        Commands::Rotate { project } => handlers::rotate::handle(&ctx, &project),
        Commands::Resolve { project, reference } => {
            handlers::resolve::handle(&ctx, &project, &reference)
        }
        Commands::Log {
            project,
            week,
            limit,
        } => handlers::log::handle(&ctx, &project, week.as_deref(), limit),
        Commands::Weeks { project } => handlers::weeks::handle(&ctx, &project),
        Commands::Mcp { command } => match command {
            McpCommand::Serve => handlers::mcp::handle_serve(&ctx),
        },
    }
}
