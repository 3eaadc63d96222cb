//! Error types for timetrace.

use thiserror::Error;

/// Fatal extraction failures. Field-level problems never end up here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("No VEVENT blocks found in calendar input")]
    NoEvents,
}

/// Errors that can occur in timetrace operations.
#[derive(Error, Debug)]
pub enum TimetraceError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for timetrace operations.
pub type TimetraceResult<T> = Result<T, TimetraceError>;
