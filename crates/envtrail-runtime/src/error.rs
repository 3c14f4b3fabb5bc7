use std::fmt;
use std::path::PathBuf;

/// Result type for envtrail-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// The target project directory does not exist
    ProjectNotFound(PathBuf),

    /// `append`/`finalize` called without a started session
    NoActiveSession,

    /// Rotation requested with neither a project nor an active session
    NoActiveProject,

    /// Filesystem or record failure in the storage layer
    Store(envtrail_store::Error),

    /// IO operation failed outside the storage layer
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// A pointer reference could not be parsed or followed
    InvalidReference(String),
}

impl Error {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::ProjectNotFound(_) => "project_not_found",
            Error::NoActiveSession => "no_active_session",
            Error::NoActiveProject => "no_active_project",
            Error::Store(_) | Error::Io(_) => "filesystem",
            Error::Config(_) => "config",
            Error::InvalidReference(_) => "invalid_reference",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ProjectNotFound(path) => {
                write!(f, "Project directory not found: {}", path.display())
            }
            Error::NoActiveSession => write!(
                f,
                "No active tracking session. Start one with start_env_tracking first."
            ),
            Error::NoActiveProject => write!(
                f,
                "No project to rotate. Pass a project path or start tracking first."
            ),
            Error::Store(err) => write!(f, "Storage error: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::InvalidReference(msg) => write!(f, "Invalid reference: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Store(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::ProjectNotFound(_)
            | Error::NoActiveSession
            | Error::NoActiveProject
            | Error::Config(_)
            | Error::InvalidReference(_) => None,
        }
    }
}

impl From<envtrail_store::Error> for Error {
    fn from(err: envtrail_store::Error) -> Self {
        match err {
            envtrail_store::Error::InvalidReference(msg) => Error::InvalidReference(msg),
            other => Error::Store(other),
        }
    }
}

impl From<envtrail_types::Error> for Error {
    fn from(err: envtrail_types::Error) -> Self {
        match err {
            envtrail_types::Error::InvalidReference(msg) => Error::InvalidReference(msg),
            other => Error::Config(other.to_string()),
        }
    }
}

impl From<envtrail_core::Error> for Error {
    fn from(err: envtrail_core::Error) -> Self {
        match err {
            envtrail_core::Error::Io(err) => Error::Io(err),
            envtrail_core::Error::Config(msg) => Error::Config(msg),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
