//! Error types for the calgrid engine.

use thiserror::Error;

/// Errors that can occur in calgrid operations.
#[derive(Error, Debug)]
pub enum CalGridError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid recurrence rule: {0}")]
    InvalidRecurrence(String),

    #[error("Invalid query window: {0}")]
    InvalidWindow(String),

    #[error("Query window spans {days} days, maximum is {max_days}")]
    WindowTooLarge { days: i64, max_days: i64 },

    #[error("Event source error: {0}")]
    Source(String),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for calgrid operations.
pub type CalGridResult<T> = Result<T, CalGridError>;
