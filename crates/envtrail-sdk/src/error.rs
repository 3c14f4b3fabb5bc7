use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// A session operation failed; carries the runtime's error kind.
    Session(envtrail_runtime::Error),
    InvalidInput(String),
    Internal(anyhow::Error),
}

impl Error {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Session(err) => err.kind(),
            Error::InvalidInput(_) => "invalid_input",
            Error::Internal(_) => "internal",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Session(err) => write!(f, "{}", err),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Error::Internal(err) => write!(f, "Internal error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Session(err) => Some(err),
            Error::Internal(err) => Some(err.as_ref()),
            Error::InvalidInput(_) => None,
        }
    }
}

impl From<envtrail_runtime::Error> for Error {
    fn from(err: envtrail_runtime::Error) -> Self {
        Error::Session(err)
    }
}

impl From<envtrail_core::Error> for Error {
    fn from(err: envtrail_core::Error) -> Self {
        Error::Session(err.into())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal(err)
    }
}
