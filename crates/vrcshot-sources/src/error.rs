use std::fmt;
use std::path::PathBuf;

/// Result type for vrcshot-sources operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the sources layer
#[derive(Debug)]
pub enum Error {
    /// IO operation failed
    Io(std::io::Error),

    /// A configured input directory does not exist or is not a directory.
    /// Surfaced as its own condition so callers can report "not configured /
    /// not found" instead of a generic IO failure.
    DirectoryMissing(PathBuf),

    /// Directory traversal error
    WalkDir(walkdir::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::DirectoryMissing(path) => {
                write!(f, "Directory not found: {}", path.display())
            }
            Error::WalkDir(err) => write!(f, "Directory traversal error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::DirectoryMissing(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDir(err)
    }
}
