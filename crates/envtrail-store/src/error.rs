use std::fmt;
use std::path::PathBuf;

/// Result type for envtrail-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the storage layer
#[derive(Debug)]
pub enum Error {
    /// A read or write failed; carries the path it failed on
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A record could not be encoded or decoded
    Record(envtrail_types::Error),

    /// Another writer held the project lock for too long
    LockTimeout { path: PathBuf, waited_ms: u64 },

    /// A log reference pointed outside the project or was malformed
    InvalidReference(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io { path, source } => write!(f, "IO error at {}: {}", path.display(), source),
            Error::Record(err) => write!(f, "Record error: {}", err),
            Error::LockTimeout { path, waited_ms } => write!(
                f,
                "Timed out after {}ms waiting for lock {}",
                waited_ms,
                path.display()
            ),
            Error::InvalidReference(msg) => write!(f, "Invalid log reference: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::Record(err) => Some(err),
            Error::LockTimeout { .. } | Error::InvalidReference(_) => None,
        }
    }
}

impl From<envtrail_types::Error> for Error {
    fn from(err: envtrail_types::Error) -> Self {
        match err {
            envtrail_types::Error::InvalidReference(msg) => Error::InvalidReference(msg),
            other => Error::Record(other),
        }
    }
}
