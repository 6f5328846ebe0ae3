//! Async task handle for work handed to another execution context.
//!
//! Channel-based design: the spawned side owns the sender, the caller owns
//! the receiver, and nothing else is shared between them.

use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::oneshot;

/// Outcome carried back over the channel: the value, or the panic payload.
type Outcome<T> = Result<T, Box<dyn Any + Send + 'static>>;

/// Why an [`AsyncTask`] could not produce its value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskFailure {
    /// The work panicked; the panic message is preserved when it is a string.
    #[error("task panicked: {0}")]
    Panicked(String),

    /// The worker went away without reporting (runtime shutdown).
    #[error("task was dropped before completing")]
    Dropped,
}

/// A handle to work running on another execution context.
///
/// Uses oneshot channel internally for one-time communication. Panics inside
/// the work are caught at the worker boundary and surface as
/// [`TaskFailure::Panicked`] instead of tearing down the pool.
///
/// Dropping the handle does not stop the work; it only discards the result.
pub struct AsyncTask<T> {
    rx: oneshot::Receiver<Outcome<T>>,
}

impl<T> AsyncTask<T>
where
    T: Send + 'static,
{
    fn new(rx: oneshot::Receiver<Outcome<T>>) -> Self {
        Self { rx }
    }

    /// Spawn a blocking operation on the blocking thread pool.
    #[inline]
    pub fn spawn<F>(f: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        tokio::task::spawn_blocking(move || {
            let _ = tx.send(panic::catch_unwind(AssertUnwindSafe(f)));
        });
        Self::new(rx)
    }

    /// Spawn an async operation as its own task.
    #[inline]
    pub fn spawn_async<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        tokio::task::spawn(async move {
            let _ = tx.send(AssertUnwindSafe(future).catch_unwind().await);
        });
        Self::new(rx)
    }
}

impl<T> Future for AsyncTask<T> {
    type Output = Result<T, TaskFailure>;

    #[inline]
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| match received {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(payload)) => Err(TaskFailure::Panicked(panic_message(payload.as_ref()))),
            Err(_) => Err(TaskFailure::Dropped),
        })
    }
}

/// Best-effort extraction of a panic message.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
