use std::fmt;

/// Result type for beatdump-fetch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the fetch layer
///
/// Per-increment faults are not errors: they surface as
/// [`crate::SkipReason`] inside a [`crate::FetchReport`].
#[derive(Debug)]
pub enum Error {
    /// Fetch settings violate a precondition (zero step or limit, ...)
    InvalidSettings(String),

    /// HTTP client could not be constructed
    Client(String),

    /// Response body is not a search result
    Malformed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSettings(msg) => write!(f, "Invalid fetch settings: {}", msg),
            Error::Client(msg) => write!(f, "HTTP client error: {}", msg),
            Error::Malformed(msg) => write!(f, "Malformed search response: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
