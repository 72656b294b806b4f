use std::fmt;
use std::path::PathBuf;

/// Result type for beatdump-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Range or duration rejected by the types layer
    Types(beatdump_types::Error),

    /// Fetcher could not be set up
    Fetch(beatdump_fetch::Error),

    /// Writing an output file failed
    Write { path: PathBuf, source: std::io::Error },

    /// Serializing a CSV row failed
    Csv { path: PathBuf, source: csv::Error },

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// A chunk failed and the run was aborted
    Chunk { range: String, source: Box<Error> },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Types(err) => write!(f, "{}", err),
            Error::Fetch(err) => write!(f, "Fetch error: {}", err),
            Error::Write { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            Error::Csv { path, source } => {
                write!(f, "Failed to write CSV {}: {}", path.display(), source)
            }
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Chunk { range, source } => write!(f, "Chunk {} failed: {}", range, source),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Types(err) => Some(err),
            Error::Fetch(err) => Some(err),
            Error::Write { source, .. } => Some(source),
            Error::Csv { source, .. } => Some(source),
            Error::Io(err) => Some(err),
            Error::Chunk { source, .. } => Some(source.as_ref()),
            Error::Config(_) => None,
        }
    }
}

impl From<beatdump_types::Error> for Error {
    fn from(err: beatdump_types::Error) -> Self {
        Error::Types(err)
    }
}

impl From<beatdump_fetch::Error> for Error {
    fn from(err: beatdump_fetch::Error) -> Self {
        Error::Fetch(err)
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
