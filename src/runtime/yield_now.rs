//! Cooperative yield point.

/// Suspend the caller once and resume on a later scheduler turn.
///
/// Other tasks already pending on the same runtime get to run before the
/// caller resumes. Never blocks the thread and cannot fail.
#[inline]
pub async fn yield_to_main_thread() {
    tokio::task::yield_now().await;
}
