//! Error types for feed operations

use thiserror::Error;

/// Errors from an earthquake feed. Both variants abort the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedError {
    /// Endpoint unreachable or returned a non-success status.
    #[error("Feed unavailable: {message}")]
    Unavailable { message: String },

    /// Response body did not match the event schema.
    #[error("Feed parse error: {message}")]
    Parse { message: String },
}

impl FeedError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable { message: message.into() }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse { message: message.into() }
    }
}
