use crate::context::ExecutionContext;
use anyhow::Result;
use envtrail_runtime::Config;
use serde_json::json;

pub fn handle(ctx: &ExecutionContext) -> Result<()> {
    let config_path = Config::path_in(ctx.data_dir());
    let created = if config_path.exists() {
        // Validate the existing file rather than overwrite it.
        Config::load_from(&config_path)?;
        false
    } else {
        Config::default().save_to(&config_path)?;
        tracing::info!(path = %config_path.display(), "wrote default config");
        true
    };

    if ctx.is_json() {
        return ctx.print_json(&json!({
            "config_path": config_path,
            "created": created,
        }));
    }

    if created {
        println!("Created {}", config_path.display());
    } else {
        println!("Config already exists at {}", config_path.display());
    }
    Ok(())
}
