use crate::context::ExecutionContext;
use crate::views::{Palette, records};
use anyhow::Result;

pub fn handle(
    ctx: &ExecutionContext,
    project: &str,
    week: Option<&str>,
    limit: Option<usize>,
) -> Result<()> {
    let client = ctx.client()?;
    let found = client.records(project, week, limit)?;

    if ctx.is_json() {
        return ctx.print_json(&found);
    }
    match found {
        Some(week) => records::print_week(&week, Palette::new(ctx.color)),
        None => println!("No log records found"),
    }
    Ok(())
}
