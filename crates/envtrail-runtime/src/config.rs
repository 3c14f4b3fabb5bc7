use crate::Result;
use envtrail_store::Limits;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_LOCK_TIMEOUT_MS: u64 = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base directory for relative project paths; the home directory when unset.
    pub project_base: Option<String>,
    /// How long a writer waits for another writer's project lock.
    pub lock_timeout_ms: u64,
    pub limits: Limits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_base: None,
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
            limits: Limits::default(),
        }
    }
}

impl Config {
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::load_from(&Self::path_in(data_dir))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE_NAME)
    }

    pub fn project_base_path(&self) -> Option<PathBuf> {
        self.project_base
            .as_deref()
            .map(envtrail_core::expand_tilde)
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default_keeps_documented_limits() {
        let config = Config::default();
        assert_eq!(config.limits.pointer_size_limit, 50 * 1024);
        assert_eq!(config.limits.preview_chars, 200);
        assert_eq!(config.limits.retained_pointers, 10);
        assert_eq!(config.limits.retained_backups, 4);
        assert_eq!(config.lock_timeout(), Duration::from_millis(2000));
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = Config::path_in(temp_dir.path());

        let mut config = Config::default();
        config.project_base = Some("/srv/projects".to_string());
        config.limits.retained_backups = 8;
        config.save_to(&config_path)?;

        let loaded = Config::load(temp_dir.path())?;
        assert_eq!(loaded, config);
        assert_eq!(loaded.project_base_path(), Some(PathBuf::from("/srv/projects")));

        Ok(())
    }

    #[test]
    fn test_partial_config_fills_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = Config::path_in(temp_dir.path());
        std::fs::write(&config_path, "[limits]\npreview_chars = 80\n")?;

        let config = Config::load_from(&config_path)?;
        assert_eq!(config.limits.preview_chars, 80);
        assert_eq!(config.limits.retained_pointers, 10);
        assert_eq!(config.lock_timeout_ms, 2000);

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = Config::load_from(&temp_dir.path().join("nonexistent.toml"))?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = Config::path_in(temp_dir.path());
        std::fs::write(&config_path, "lock_timeout_ms = \"soon\"\n").unwrap();
        assert!(matches!(
            Config::load_from(&config_path),
            Err(crate::Error::Config(_))
        ));
    }
}
