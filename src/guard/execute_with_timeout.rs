//! Bounded-time execution.
//!
//! A timeout here means "stop waiting", not "stop the work". The wrapped
//! future is dropped when the timer wins, which cancels it at its current
//! await point, but anything it already handed off (spawned tasks, blocking
//! threads, requests in flight on another service) keeps running to
//! completion and its result is discarded.

use log::warn;
use std::future::Future;
use std::time::Duration;

use crate::guard::error::{GuardError, GuardResult};

/// Race `op` against a timer of length `timeout`.
///
/// - `op` settles first: its value, or its own error as
///   [`GuardError::Propagated`].
/// - Timer fires first: [`GuardError::Timeout`] carrying `timeout`.
/// - `timeout` is zero: [`GuardError::InvalidArgument`], `op` is never polled.
///
/// `op` is polled before the timer is checked, so an operation that is
/// already complete always wins.
pub async fn execute_with_timeout<F, T, E>(op: F, timeout: Duration) -> GuardResult<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    execute_named_with_timeout("operation", op, timeout).await
}

/// [`execute_with_timeout`] with a label that is reported in the timeout error.
pub async fn execute_named_with_timeout<F, T, E>(
    operation: &str,
    op: F,
    timeout: Duration,
) -> GuardResult<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    if timeout.is_zero() {
        return Err(GuardError::InvalidArgument(format!(
            "timeout for {operation} must be greater than zero"
        )));
    }

    match tokio::time::timeout(timeout, op).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(GuardError::Propagated(e)),
        Err(_) => {
            warn!("{operation} timed out after {timeout:?}");
            Err(GuardError::Timeout {
                operation: operation.to_string(),
                duration: timeout,
            })
        }
    }
}
