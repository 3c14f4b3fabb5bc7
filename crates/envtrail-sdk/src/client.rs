use std::path::{Path, PathBuf};
use std::sync::Arc;

use envtrail_runtime::{
    AppendReceipt, Clock, Config, FinalizeReceipt, RotateReceipt, SessionLog, StartReceipt,
    StatusReport, WeekRecords,
};
use envtrail_types::{LogRecord, WeekStamp};

use crate::error::{Error, Result};

/// Entry point for tracking conversations into project pointer files.
///
/// Owns the single [`SessionLog`] of this process. Project arguments are
/// strings as a caller would type them: absolute, `~/...`, or relative to the
/// configured `project_base`.
pub struct Client {
    data_dir: PathBuf,
    log: SessionLog,
}

impl Client {
    /// Open with the config found in `data_dir` (defaults when absent).
    pub fn connect(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        let config = Config::load(&data_dir)?;
        tracing::debug!(data_dir = %data_dir.display(), "loaded config");
        Ok(Self::with_config(data_dir, config))
    }

    /// Open the data directory resolved from `ENVTRAIL_PATH` or the platform
    /// default.
    pub fn connect_default() -> Result<Self> {
        let data_dir = envtrail_core::resolve_data_dir(None)?;
        Self::connect(data_dir)
    }

    pub fn with_config(data_dir: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            data_dir: data_dir.into(),
            log: SessionLog::new(config),
        }
    }

    /// Replace the time source. Drops any active session.
    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        let config = self.log.config().clone();
        Self {
            data_dir: self.data_dir,
            log: SessionLog::with_clock(config, clock),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config(&self) -> &Config {
        self.log.config()
    }

    pub fn session_log(&self) -> &SessionLog {
        &self.log
    }

    pub fn is_tracking(&self) -> bool {
        self.log.active().is_some()
    }

    /// Resolve a caller-supplied project path.
    pub fn project(&self, input: &str) -> Result<PathBuf> {
        if input.trim().is_empty() {
            return Err(Error::InvalidInput("project path is empty".to_string()));
        }
        Ok(self.log.resolve_project(input)?)
    }

    fn project_or_active(&self, input: Option<&str>) -> Result<PathBuf> {
        match input {
            Some(input) => self.project(input),
            None => self
                .log
                .active()
                .map(|session| session.layout.root().to_path_buf())
                .ok_or(Error::Session(envtrail_runtime::Error::NoActiveProject)),
        }
    }

    pub fn start_tracking(&mut self, project: &str, topic: &str) -> Result<StartReceipt> {
        let dir = self.project(project)?;
        Ok(self.log.start(&dir, topic)?)
    }

    pub fn add_exchange(&mut self, user_text: &str, assistant_text: &str) -> Result<AppendReceipt> {
        Ok(self.log.append(user_text, assistant_text)?)
    }

    pub fn finalize(&mut self, summary: &str) -> Result<FinalizeReceipt> {
        Ok(self.log.finalize(summary)?)
    }

    /// Rotate `project`, or the active session's project when `None`.
    pub fn rotate(&self, project: Option<&str>) -> Result<RotateReceipt> {
        let dir = project.map(|p| self.project(p)).transpose()?;
        Ok(self.log.rotate_or_active(dir.as_deref())?)
    }

    pub fn status(&self, project: Option<&str>) -> Result<StatusReport> {
        let dir = project.map(|p| self.project(p)).transpose()?;
        Ok(self.log.status(dir.as_deref())?)
    }

    /// Full records behind a pointer reference in `project` (or the active
    /// session's project).
    pub fn resolve(&self, project: Option<&str>, reference: &str) -> Result<Vec<LogRecord>> {
        let dir = self.project_or_active(project)?;
        Ok(self.log.resolve(&dir, reference)?)
    }

    pub fn weeks(&self, project: &str) -> Result<Vec<WeekStamp>> {
        let dir = self.project(project)?;
        Ok(self.log.weeks(&dir)?)
    }

    /// Records of one week (`YYYY-Www` or `YYYYWww`), latest week when `None`.
    pub fn records(
        &self,
        project: &str,
        week: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Option<WeekRecords>> {
        let dir = self.project(project)?;
        let week = week
            .map(|w| {
                w.parse::<WeekStamp>()
                    .map_err(|e| Error::InvalidInput(e.to_string()))
            })
            .transpose()?;
        Ok(self.log.records(&dir, week, limit)?)
    }
}
