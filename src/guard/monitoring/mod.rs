//! Monitoring service
//!
//! Tracks whether monitoring is active, keeps coarse counters for the guard
//! operations, and runs a heartbeat watchdog that notices when the runtime
//! stops scheduling tasks on time (the ANR condition).
//!
//! The service is an ordinary value: construct one, wrap it in an `Arc`, and
//! hand it to every `AsyncGuard` that should report into it.

mod stats;

pub use stats::PerformanceStats;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};

use crate::guard::config::GuardConfig;
use crate::guard::process_list_in_chunks::ChunkReport;

/// Counters shared between the service and its watchdog task.
#[derive(Default)]
struct MonitorState {
    active: AtomicBool,
    operations_completed: AtomicU64,
    operation_failures: AtomicU64,
    timeouts_triggered: AtomicU64,
    chunk_jobs_run: AtomicU64,
    chunks_processed: AtomicU64,
    items_processed: AtomicU64,
    isolate_tasks_run: AtomicU64,
    worker_failures: AtomicU64,
    yields: AtomicU64,
    stalls_detected: AtomicU64,
    max_heartbeat_lag_ms: AtomicU64,
}

impl MonitorState {
    fn counters(&self) -> [&AtomicU64; 11] {
        [
            &self.operations_completed,
            &self.operation_failures,
            &self.timeouts_triggered,
            &self.chunk_jobs_run,
            &self.chunks_processed,
            &self.items_processed,
            &self.isolate_tasks_run,
            &self.worker_failures,
            &self.yields,
            &self.stalls_detected,
            &self.max_heartbeat_lag_ms,
        ]
    }

    fn reset(&self) {
        for counter in self.counters() {
            counter.store(0, Ordering::Relaxed);
        }
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn bump(&self, counter: &AtomicU64, by: u64) {
        if self.is_active() {
            counter.fetch_add(by, Ordering::Relaxed);
        }
    }

    fn record_lag(&self, lag: Duration, threshold: Duration) {
        if !self.is_active() {
            return;
        }
        let lag_ms = u64::try_from(lag.as_millis()).unwrap_or(u64::MAX);
        self.max_heartbeat_lag_ms.fetch_max(lag_ms, Ordering::Relaxed);
        if lag > threshold {
            self.stalls_detected.fetch_add(1, Ordering::Relaxed);
            warn!("Main thread stalled: heartbeat {lag:?} late (threshold {threshold:?})");
        }
    }
}

/// Process-level diagnostics for guarded operations.
pub struct MonitoringService {
    state: Arc<MonitorState>,
    heartbeat_interval: Duration,
    stall_threshold: Duration,
    initialized_at: Mutex<Option<DateTime<Utc>>>,
    watchdog: Mutex<Option<JoinHandle<()>>>,
}

impl MonitoringService {
    #[must_use]
    pub fn new(config: &GuardConfig) -> Self {
        Self {
            state: Arc::new(MonitorState::default()),
            heartbeat_interval: config.heartbeat_interval,
            stall_threshold: config.stall_threshold,
            initialized_at: Mutex::new(None),
            watchdog: Mutex::new(None),
        }
    }

    /// Start monitoring. Calling it again while active does nothing.
    ///
    /// Starting from the inactive state clears the counters. The heartbeat
    /// watchdog needs a tokio runtime; outside one, counters still work but
    /// stalls are not detected.
    pub fn initialize(&self) {
        let mut watchdog = lock(&self.watchdog);
        if self.state.active.load(Ordering::Acquire) {
            debug!("Monitoring already active");
            return;
        }

        self.state.reset();
        *lock(&self.initialized_at) = Some(Utc::now());
        self.state.active.store(true, Ordering::Release);

        match Handle::try_current() {
            Ok(handle) => {
                *watchdog = Some(handle.spawn(heartbeat(
                    Arc::clone(&self.state),
                    self.heartbeat_interval,
                    self.stall_threshold,
                )));
            }
            Err(_) => warn!("No tokio runtime; main-thread stall detection disabled"),
        }
        info!(
            "Monitoring started (heartbeat {:?}, stall threshold {:?})",
            self.heartbeat_interval, self.stall_threshold
        );
    }

    /// Stop monitoring and the watchdog. Counters keep their last values.
    pub fn dispose(&self) {
        let mut watchdog = lock(&self.watchdog);
        if !self.state.active.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(handle) = watchdog.take() {
            handle.abort();
        }
        info!("Monitoring stopped");
    }

    #[must_use]
    pub fn is_monitoring(&self) -> bool {
        self.state.is_active()
    }

    /// Snapshot of the counters. Safe to call at any point in the lifecycle.
    #[must_use]
    pub fn get_performance_stats(&self) -> PerformanceStats {
        let s = &self.state;
        PerformanceStats {
            is_monitoring: s.is_active(),
            initialized_at: *lock(&self.initialized_at),
            operations_completed: s.operations_completed.load(Ordering::Relaxed),
            operation_failures: s.operation_failures.load(Ordering::Relaxed),
            timeouts_triggered: s.timeouts_triggered.load(Ordering::Relaxed),
            chunk_jobs_run: s.chunk_jobs_run.load(Ordering::Relaxed),
            chunks_processed: s.chunks_processed.load(Ordering::Relaxed),
            items_processed: s.items_processed.load(Ordering::Relaxed),
            isolate_tasks_run: s.isolate_tasks_run.load(Ordering::Relaxed),
            worker_failures: s.worker_failures.load(Ordering::Relaxed),
            yields: s.yields.load(Ordering::Relaxed),
            stalls_detected: s.stalls_detected.load(Ordering::Relaxed),
            max_heartbeat_lag_ms: s.max_heartbeat_lag_ms.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn record_completed(&self) {
        self.state.bump(&self.state.operations_completed, 1);
    }

    pub(crate) fn record_failure(&self) {
        self.state.bump(&self.state.operation_failures, 1);
    }

    pub(crate) fn record_timeout(&self) {
        self.state.bump(&self.state.timeouts_triggered, 1);
    }

    pub(crate) fn record_chunk_job(&self, report: ChunkReport) {
        self.state.bump(&self.state.chunk_jobs_run, 1);
        self.state.bump(&self.state.chunks_processed, report.chunks);
        self.state.bump(&self.state.items_processed, report.items);
        // one yield between each pair of chunks
        self.state.bump(&self.state.yields, report.chunks.saturating_sub(1));
    }

    pub(crate) fn record_isolate(&self) {
        self.state.bump(&self.state.isolate_tasks_run, 1);
    }

    pub(crate) fn record_worker_failure(&self) {
        self.state.bump(&self.state.worker_failures, 1);
    }

    pub(crate) fn record_yield(&self) {
        self.state.bump(&self.state.yields, 1);
    }
}

impl Default for MonitoringService {
    fn default() -> Self {
        Self::new(&GuardConfig::default())
    }
}

impl Drop for MonitoringService {
    fn drop(&mut self) {
        if let Some(handle) = lock(&self.watchdog).take() {
            handle.abort();
        }
    }
}

/// Sleep for one interval, then see how late the wake-up was.
async fn heartbeat(state: Arc<MonitorState>, interval: Duration, threshold: Duration) {
    loop {
        let started = Instant::now();
        sleep(interval).await;
        let lag = started.elapsed().saturating_sub(interval);
        state.record_lag(lag, threshold);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
