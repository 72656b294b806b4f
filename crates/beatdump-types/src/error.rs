use std::fmt;

/// Result type for beatdump-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Timestamp could not be parsed as ISO-8601 / RFC 3339
    InvalidTimestamp(String),

    /// Range bounds are out of order
    InvalidRange(String),

    /// Step or cut-off duration is zero or negative
    InvalidDuration(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidTimestamp(msg) => write!(f, "Invalid timestamp: {}", msg),
            Error::InvalidRange(msg) => write!(f, "Invalid time range: {}", msg),
            Error::InvalidDuration(msg) => write!(f, "Invalid duration: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
