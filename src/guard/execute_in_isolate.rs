//! Off-thread execution of pure functions.
//!
//! The function is taken as a plain `fn` pointer, so it cannot capture any
//! of the caller's state; the input is moved across by value and the result
//! comes back over a channel. This is the whole contract between the caller
//! and the worker.
//!
//! Marshalling is a move, so the overhead is a thread-pool hand-off. That
//! still makes it a poor fit for many tiny calls.

use log::{debug, warn};

use crate::guard::error::{GuardError, GuardResult};
use crate::runtime::AsyncTask;

/// Run `f(input)` on the blocking pool and await the result.
///
/// The calling task is suspended, never blocked, while `f` runs. A panic in
/// `f` comes back as [`GuardError::WorkerFailure`].
pub async fn execute_in_isolate<I, O>(f: fn(I) -> O, input: I) -> GuardResult<O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    debug!("Handing work to isolate");
    AsyncTask::spawn(move || f(input)).await.map_err(|failure| {
        warn!("Isolate failed: {failure}");
        GuardError::from(failure)
    })
}

/// Like [`execute_in_isolate`] for functions that report their own errors.
///
/// An `Err` from `f` comes back unchanged as [`GuardError::Propagated`].
pub async fn try_execute_in_isolate<I, O, E>(
    f: fn(I) -> Result<O, E>,
    input: I,
) -> GuardResult<O, E>
where
    I: Send + 'static,
    O: Send + 'static,
    E: Send + 'static,
{
    debug!("Handing fallible work to isolate");
    match AsyncTask::spawn(move || f(input)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(GuardError::Propagated(e)),
        Err(failure) => {
            warn!("Isolate failed: {failure}");
            Err(GuardError::from(failure))
        }
    }
}

/// Apply `f` to every item on the blocking pool, preserving order.
///
/// The whole list moves to one worker; it is not chunked.
pub async fn map_in_isolate<T, U>(f: fn(T) -> U, items: Vec<T>) -> GuardResult<Vec<U>>
where
    T: Send + 'static,
    U: Send + 'static,
{
    debug!("Handing {} items to isolate", items.len());
    AsyncTask::spawn(move || items.into_iter().map(f).collect::<Vec<U>>())
        .await
        .map_err(|failure| {
            warn!("Isolate failed: {failure}");
            GuardError::from(failure)
        })
}
