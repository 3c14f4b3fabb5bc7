use std::fmt;

/// Result type for envtrail-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug)]
pub enum Error {
    /// A week stamp did not match `YYYY-Www`
    InvalidWeekStamp(String),

    /// A log reference did not match `<path>#<hash>`
    InvalidReference(String),

    /// A log line could not be decoded
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidWeekStamp(s) => write!(f, "Invalid week stamp: {}", s),
            Error::InvalidReference(s) => write!(f, "Invalid log reference: {}", s),
            Error::Json(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(err) => Some(err),
            Error::InvalidWeekStamp(_) | Error::InvalidReference(_) => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
