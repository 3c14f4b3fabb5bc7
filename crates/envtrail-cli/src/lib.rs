mod args;
mod commands;
pub mod context;
mod handlers;
pub mod logging;
pub mod types;
mod views;

pub use args::{Cli, Commands, McpCommand};
pub use commands::run;
