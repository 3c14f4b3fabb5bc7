use crate::context::ExecutionContext;
use crate::views::{Palette, rotate};
use anyhow::Result;

pub fn handle(ctx: &ExecutionContext, project: &str) -> Result<()> {
    let client = ctx.client()?;
    let receipt = client.rotate(Some(project))?;

    if ctx.is_json() {
        return ctx.print_json(&receipt);
    }
    rotate::print_rotation(&receipt, Palette::new(ctx.color));
    Ok(())
}
