use std::fmt;

/// Result type for vrcshot-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug)]
pub enum Error {
    /// Timestamp string did not match an accepted format
    Timestamp(String),

    /// Identifier string failed validation (world, instance, player)
    InvalidId(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Timestamp(s) => write!(f, "Invalid timestamp: {}", s),
            Error::InvalidId(s) => write!(f, "Invalid identifier: {}", s),
        }
    }
}

impl std::error::Error for Error {}
