use std::fmt;

/// Result type for vrcshot-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Log ledger error
    Store(vrcshot_logstore::Error),

    /// Derived index error
    Index(vrcshot_index::Error),

    /// Input discovery/parsing error
    Sources(vrcshot_sources::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// A sync run is already in flight; the request was rejected, not queued
    SyncInFlight,

    /// Filesystem watcher error
    Watch(notify::Error),

    /// Invalid operation or state
    InvalidOperation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Store(err) => write!(f, "Log store error: {}", err),
            Error::Index(err) => write!(f, "Index error: {}", err),
            Error::Sources(err) => write!(f, "Source error: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::SyncInFlight => write!(f, "A sync is already running"),
            Error::Watch(err) => write!(f, "Watcher error: {}", err),
            Error::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Store(err) => Some(err),
            Error::Index(err) => Some(err),
            Error::Sources(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Watch(err) => Some(err),
            Error::Config(_) | Error::SyncInFlight | Error::InvalidOperation(_) => None,
        }
    }
}

impl From<vrcshot_logstore::Error> for Error {
    fn from(err: vrcshot_logstore::Error) -> Self {
        Error::Store(err)
    }
}

impl From<vrcshot_index::Error> for Error {
    fn from(err: vrcshot_index::Error) -> Self {
        Error::Index(err)
    }
}

impl From<vrcshot_sources::Error> for Error {
    fn from(err: vrcshot_sources::Error) -> Self {
        Error::Sources(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<notify::Error> for Error {
    fn from(err: notify::Error) -> Self {
        Error::Watch(err)
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
