//! Error types for netstate

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// netstate errors
///
/// Only structural failures live here: a snapshot file that cannot be
/// loaded at all, or a transport that failed outright. Problems local to
/// one command's comparison are recorded as skip diagnostics on the
/// report instead (see [`crate::compare::SkipReason`]).
#[derive(Error, Debug)]
pub enum Error {
    #[error("Snapshot format error: {0}")]
    Format(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
