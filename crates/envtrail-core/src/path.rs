use std::path::{Component, Path, PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Config(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Config(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

/// Resolve the data directory (config.toml lives here) based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. ENVTRAIL_PATH environment variable (with tilde expansion)
/// 3. System config directory
/// 4. ~/.envtrail (fallback for systems without a standard config directory)
pub fn resolve_data_dir(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("ENVTRAIL_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(config_dir) = dirs::config_dir() {
        return Ok(config_dir.join("envtrail"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".envtrail"));
    }

    Err(Error::Config(
        "Could not determine data directory: no HOME directory or system config directory found"
            .to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

/// Resolve a project path given by a caller.
///
/// Absolute paths (after tilde expansion) are used as-is; relative paths are
/// joined onto `base`, which defaults to the home directory.
pub fn resolve_project_dir(input: &str, base: Option<&Path>) -> Result<PathBuf> {
    let expanded = expand_tilde(input);
    if expanded.is_absolute() {
        return Ok(expanded);
    }

    let base = match base {
        Some(base) => base.to_path_buf(),
        None => dirs::home_dir().ok_or_else(|| {
            Error::Config("Could not resolve relative project path: no home directory".to_string())
        })?,
    };
    Ok(base.join(expanded))
}

/// Normalize a path for comparison (resolve to absolute, canonicalize if possible)
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}

/// Path of `target` relative to `base`, joined with `/` on every platform.
///
/// Returns `None` when `target` is not under `base`.
pub fn relative_slash_path(base: &Path, target: &Path) -> Option<String> {
    let rel = target.strip_prefix(base).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}
