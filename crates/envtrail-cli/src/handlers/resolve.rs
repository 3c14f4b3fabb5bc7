use crate::context::ExecutionContext;
use crate::views::{Palette, records};
use anyhow::{Result, bail};

pub fn handle(ctx: &ExecutionContext, project: &str, reference: &str) -> Result<()> {
    let client = ctx.client()?;
    let found = client.resolve(Some(project), reference)?;

    if ctx.is_json() {
        return ctx.print_json(&found);
    }
    if found.is_empty() {
        bail!("No log record matches {}", reference);
    }
    records::print_records(&found, Palette::new(ctx.color));
    Ok(())
}
