//! Domain error types.

use thiserror::Error;

/// Errors raised when constructing value objects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    #[error("ConnectionId cannot be empty")]
    ConnectionIdEmpty,

    #[error("ConnectionId cannot exceed {max} characters (got {actual})")]
    ConnectionIdTooLong { max: usize, actual: usize },
}

/// Errors raised by the transport when writing to a connection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection is closed")]
    Closed,

    #[error("failed to send message: {0}")]
    Send(String),

    #[error("write timed out")]
    Timeout,
}

/// Errors raised when talking to the broadcast coordinator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HubError {
    #[error("broadcast hub is not running")]
    Closed,
}
