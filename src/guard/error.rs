//! Guard error types

use std::convert::Infallible;
use std::time::Duration;
use thiserror::Error;

use crate::runtime::TaskFailure;

/// Error types for guarded operations.
///
/// `E` is the wrapped operation's own error type. Operations that cannot fail
/// on their own use the default, [`Infallible`].
#[derive(Debug, Error)]
pub enum GuardError<E = Infallible> {
    /// The operation did not settle within its bound.
    #[error("Operation timed out: {operation} after {duration:?}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Bad configuration passed to a helper
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Panic or loss of the worker running off-thread work
    #[error("Worker failure: {0}")]
    WorkerFailure(String),

    /// The operation's own failure, passed through unchanged
    #[error("Operation failed: {0}")]
    Propagated(#[source] E),
}

/// Convenience result alias for guarded operations
pub type GuardResult<T, E = Infallible> = Result<T, GuardError<E>>;

impl<E> GuardError<E> {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, GuardError::Timeout { .. })
    }

    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, GuardError::InvalidArgument(_))
    }

    #[must_use]
    pub fn is_worker_failure(&self) -> bool {
        matches!(self, GuardError::WorkerFailure(_))
    }

    /// The wrapped operation's error, if that is what this is.
    pub fn into_propagated(self) -> Option<E> {
        match self {
            GuardError::Propagated(e) => Some(e),
            _ => None,
        }
    }
}

impl<E> From<TaskFailure> for GuardError<E> {
    fn from(failure: TaskFailure) -> Self {
        GuardError::WorkerFailure(failure.to_string())
    }
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
