//! Chunked collection processing.
//!
//! Work stays on the caller's task. Between slices the task yields, so other
//! work pending on the same runtime can interleave. Output never depends on
//! the chunk size; only the yielding cadence does.

use log::debug;
use std::convert::Infallible;

use crate::guard::error::{GuardError, GuardResult};
use crate::runtime::yield_to_main_thread;

/// Bookkeeping for a finished chunk job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ChunkReport {
    pub chunks: u64,
    pub items: u64,
}

/// Map `transform` over `items` in slices of at most `chunk_size`.
///
/// A `chunk_size` of 0 fails with [`GuardError::InvalidArgument`] before any
/// item is touched.
pub async fn process_list_in_chunks<T, U, F>(
    items: impl IntoIterator<Item = T>,
    transform: F,
    chunk_size: usize,
) -> GuardResult<Vec<U>>
where
    F: Fn(T) -> U,
{
    try_process_list_in_chunks(items, |item| Ok::<U, Infallible>(transform(item)), chunk_size)
        .await
}

/// Fallible form of [`process_list_in_chunks`].
///
/// The first `Err` aborts the job and comes back as
/// [`GuardError::Propagated`]; whatever was computed before it is dropped.
pub async fn try_process_list_in_chunks<T, U, E, F>(
    items: impl IntoIterator<Item = T>,
    transform: F,
    chunk_size: usize,
) -> GuardResult<Vec<U>, E>
where
    F: Fn(T) -> Result<U, E>,
{
    run_chunks(items, transform, chunk_size)
        .await
        .map(|(output, _)| output)
}

pub(crate) async fn run_chunks<T, U, E, F>(
    items: impl IntoIterator<Item = T>,
    transform: F,
    chunk_size: usize,
) -> GuardResult<(Vec<U>, ChunkReport), E>
where
    F: Fn(T) -> Result<U, E>,
{
    if chunk_size == 0 {
        return Err(GuardError::InvalidArgument(
            "chunk_size must be at least 1".to_string(),
        ));
    }

    let mut items = items.into_iter().peekable();
    let mut output = Vec::with_capacity(items.size_hint().0);
    let mut report = ChunkReport::default();

    while items.peek().is_some() {
        for item in items.by_ref().take(chunk_size) {
            output.push(transform(item).map_err(GuardError::Propagated)?);
        }
        report.chunks += 1;
        debug!("Chunk {} done, {} items so far", report.chunks, output.len());

        if items.peek().is_some() {
            yield_to_main_thread().await;
        }
    }

    report.items = output.len() as u64;
    Ok((output, report))
}
