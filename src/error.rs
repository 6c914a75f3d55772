use std::io;
use thiserror::Error;

/// Custom error type for sysglance
#[derive(Error, Debug)]
pub enum GlanceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Source query failed: {0}")]
    SourceQueryFailed(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for sysglance
pub type Result<T> = std::result::Result<T, GlanceError>;

impl GlanceError {
    /// A backend (sensor library, GPU library, external command) is not
    /// installed or not permitted.
    pub fn source_unavailable<S: Into<String>>(msg: S) -> Self {
        GlanceError::SourceUnavailable(msg.into())
    }

    /// A backend is present but one specific query failed.
    pub fn source_query_failed<S: Into<String>>(msg: S) -> Self {
        GlanceError::SourceQueryFailed(msg.into())
    }

    /// An external command exceeded its deadline.
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        GlanceError::Timeout(msg.into())
    }

    /// Create a parse error
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        GlanceError::Parse(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        GlanceError::Other(msg.into())
    }
}
