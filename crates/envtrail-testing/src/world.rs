//! TestWorld pattern for declarative integration test setup.

use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use envtrail_runtime::Config;
use envtrail_sdk::Client;

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use envtrail_testing::TestWorld;
///
/// let world = TestWorld::new().with_project("app");
/// let result = world.run(&["status", "--project", "app"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    data_dir: PathBuf,
    projects_root: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment.
    ///
    /// Relative project paths resolve under [`projects_root`](Self::projects_root).
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base_path = temp_dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp dir");
        let data_dir = base_path.join(".envtrail");
        let projects_root = base_path.join("projects");

        std::fs::create_dir_all(&projects_root).expect("Failed to create projects dir");
        let config = Config {
            project_base: Some(projects_root.to_string_lossy().into_owned()),
            ..Config::default()
        };
        config
            .save_to(&Config::path_in(&data_dir))
            .expect("Failed to write config");

        Self {
            temp_dir,
            data_dir,
            projects_root,
            env_vars: HashMap::new(),
        }
    }

    /// Get the data directory path (.envtrail).
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn projects_root(&self) -> &Path {
        &self.projects_root
    }

    /// Get the temp directory root.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of a project under the projects root.
    pub fn project(&self, name: &str) -> PathBuf {
        self.projects_root.join(name)
    }

    /// Create a project directory.
    pub fn with_project(self, name: &str) -> Self {
        std::fs::create_dir_all(self.project(name)).expect("Failed to create project dir");
        self
    }

    /// Write a file inside a project, creating parent directories.
    pub fn write_file(&self, project: &str, rel: &str, content: &str) -> Result<PathBuf> {
        let path = self.project(project).join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    pub fn read_file(&self, project: &str, rel: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.project(project).join(rel))?)
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// SDK client over this world's data directory.
    pub fn client(&self) -> Result<Client> {
        Ok(Client::connect(&self.data_dir)?)
    }

    /// Configure a CLI command with this test environment's settings.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--data-dir").arg(self.data_dir());
        cmd.current_dir(self.temp_dir.path());
        cmd.env_remove("ENVTRAIL_LOG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// A configured `envtrail` command, ready for more args or stdin.
    #[allow(deprecated)]
    pub fn command(&self) -> Result<Command> {
        let mut cmd = Command::cargo_bin("envtrail")
            .map_err(|e| anyhow::anyhow!("Failed to find envtrail binary: {}", e))?;
        self.configure_command(&mut cmd);
        Ok(cmd)
    }

    /// Execute the CLI with `args` and capture its output.
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = self.command()?;
        cmd.args(args);
        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Execute the CLI with `args`, feeding `stdin` to it.
    pub fn run_with_stdin(&self, args: &[&str], stdin: &str) -> Result<CliResult> {
        let mut cmd = self.command()?;
        cmd.args(args).write_stdin(stdin.to_string());
        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    /// Check if the command succeeded.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    /// Parse each stdout line as a JSON value (MCP responses).
    pub fn json_lines(&self) -> Result<Vec<serde_json::Value>> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).map_err(Into::into))
            .collect()
    }

    /// Get stdout as a string.
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Get stderr as a string.
    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
