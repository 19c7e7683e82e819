//! Error types for cachebench

use std::fmt;

/// Result type alias for cachebench operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up a benchmark run.
///
/// Nothing inside the timed loop can fail; every variant here is reported
/// before the first operation is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Backend name did not match any known cache
    UnknownBackend(String),

    /// Benchmark configuration rejected by validation
    InvalidConfig(String),

    /// Backend refused to construct with the given parameters
    Backend(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownBackend(name) => write!(f, "Undefined cache type: {:?}", name),
            Error::InvalidConfig(msg) => write!(f, "Invalid benchmark config: {}", msg),
            Error::Backend(msg) => write!(f, "Failed to create cache: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
