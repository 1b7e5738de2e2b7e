//! Error types for venuecal.

use thiserror::Error;

/// Errors that can occur in venuecal operations.
#[derive(Error, Debug)]
pub enum VenueCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time '{time}' for event '{id}'. Expected HH:MM")]
    InvalidTime { id: String, time: String },

    #[error("Invalid month '{0}'. Expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Could not write record for {date}: {source}")]
    Write {
        date: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for venuecal operations.
pub type VenueCalResult<T> = Result<T, VenueCalError>;
