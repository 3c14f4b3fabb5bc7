use anyhow::Result;
use is_terminal::IsTerminal;
use std::path::{Path, PathBuf};

use envtrail_sdk::Client;

use crate::types::OutputFormat;

/// Settings shared by every command handler.
pub struct ExecutionContext {
    data_dir: PathBuf,
    pub format: OutputFormat,
    pub color: bool,
}

impl ExecutionContext {
    pub fn new(data_dir: Option<&str>, format: OutputFormat) -> Result<Self> {
        let data_dir = envtrail_core::resolve_data_dir(data_dir)?;
        let color = format == OutputFormat::Plain
            && std::io::stdout().is_terminal()
            && std::env::var_os("NO_COLOR").is_none();
        Ok(Self {
            data_dir,
            format,
            color,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn client(&self) -> Result<Client> {
        Ok(Client::connect(&self.data_dir)?)
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Print `view` as pretty JSON.
    pub fn print_json<T: serde::Serialize>(&self, view: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(view)?);
        Ok(())
    }
}
