use crate::context::ExecutionContext;
use crate::views::{Palette, status};
use anyhow::Result;

pub fn handle(ctx: &ExecutionContext, project: &str) -> Result<()> {
    let client = ctx.client()?;
    let report = client.status(Some(project))?;

    if ctx.is_json() {
        return ctx.print_json(&report);
    }
    status::print_status(&report, Palette::new(ctx.color));
    Ok(())
}
