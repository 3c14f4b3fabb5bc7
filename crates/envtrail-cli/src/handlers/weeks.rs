use crate::context::ExecutionContext;
use anyhow::Result;

pub fn handle(ctx: &ExecutionContext, project: &str) -> Result<()> {
    let client = ctx.client()?;
    let weeks = client.weeks(project)?;

    if ctx.is_json() {
        return ctx.print_json(&weeks);
    }
    if weeks.is_empty() {
        println!("No weekly logs yet");
    }
    for week in weeks {
        println!("{}", week);
    }
    Ok(())
}
