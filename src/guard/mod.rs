//! Guarded execution
//!
//! Free functions for each guard operation, plus [`AsyncGuard`], which binds
//! them to a [`GuardConfig`] and reports every outcome to an injected
//! [`MonitoringService`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use anr_guard::{AsyncGuard, GuardConfig, MonitoringService, OperationKind};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GuardConfig::default();
//!     let monitor = Arc::new(MonitoringService::new(&config));
//!     monitor.initialize();
//!
//!     let guard = AsyncGuard::new(config, Arc::clone(&monitor));
//!     let doubled = guard.process_list(vec![1, 2, 3], |x| x * 2).await?;
//!     let tip = guard
//!         .execute_with_timeout_for(OperationKind::Network, async {
//!             Ok::<_, std::io::Error>("BUY AAPL")
//!         })
//!         .await?;
//!
//!     println!("{doubled:?} {tip} {:?}", monitor.get_performance_stats());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod execute_in_isolate;
pub mod execute_with_timeout;
pub mod monitoring;
pub mod process_list_in_chunks;

pub use config::{GuardConfig, OperationKind};
pub use error::{ConfigError, GuardError, GuardResult};
pub use execute_in_isolate::{execute_in_isolate, map_in_isolate, try_execute_in_isolate};
pub use execute_with_timeout::{execute_named_with_timeout, execute_with_timeout};
pub use monitoring::{MonitoringService, PerformanceStats};
pub use process_list_in_chunks::{process_list_in_chunks, try_process_list_in_chunks};

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::guard::process_list_in_chunks::run_chunks;
use crate::runtime::yield_to_main_thread;

/// Guard operations bound to a config and a monitor.
///
/// Cloning is cheap (Arc clone of the monitor); clones report into the same
/// counters. Independent calls share nothing else.
#[derive(Clone)]
pub struct AsyncGuard {
    config: GuardConfig,
    monitor: Arc<MonitoringService>,
}

impl AsyncGuard {
    #[must_use]
    pub fn new(config: GuardConfig, monitor: Arc<MonitoringService>) -> Self {
        Self { config, monitor }
    }

    /// Guard with its own, not yet initialised, monitor.
    #[must_use]
    pub fn with_config(config: GuardConfig) -> Self {
        let monitor = Arc::new(MonitoringService::new(&config));
        Self::new(config, monitor)
    }

    #[must_use]
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    #[must_use]
    pub fn monitor(&self) -> &Arc<MonitoringService> {
        &self.monitor
    }

    // ========================================================================
    // Bounded time
    // ========================================================================

    /// See [`execute_with_timeout`](execute_with_timeout::execute_with_timeout).
    pub async fn execute_with_timeout<F, T, E>(
        &self,
        op: F,
        timeout: Duration,
    ) -> GuardResult<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let result = execute_with_timeout(op, timeout).await;
        self.observe(&result);
        result
    }

    /// Bounded-time execution with the configured timeout for `kind`.
    pub async fn execute_with_timeout_for<F, T, E>(
        &self,
        kind: OperationKind,
        op: F,
    ) -> GuardResult<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let timeout = self.config.timeout_for(kind);
        let result = execute_named_with_timeout(kind.as_str(), op, timeout).await;
        self.observe(&result);
        result
    }

    // ========================================================================
    // Off-thread
    // ========================================================================

    /// See [`execute_in_isolate`](execute_in_isolate::execute_in_isolate).
    pub async fn execute_in_isolate<I, O>(&self, f: fn(I) -> O, input: I) -> GuardResult<O>
    where
        I: Send + 'static,
        O: Send + 'static,
    {
        self.monitor.record_isolate();
        let result = execute_in_isolate(f, input).await;
        self.observe(&result);
        result
    }

    /// See [`try_execute_in_isolate`](execute_in_isolate::try_execute_in_isolate).
    pub async fn try_execute_in_isolate<I, O, E>(
        &self,
        f: fn(I) -> Result<O, E>,
        input: I,
    ) -> GuardResult<O, E>
    where
        I: Send + 'static,
        O: Send + 'static,
        E: Send + 'static,
    {
        self.monitor.record_isolate();
        let result = try_execute_in_isolate(f, input).await;
        self.observe(&result);
        result
    }

    /// Map `f` over `items` wholly on a worker.
    pub async fn run_isolated_list<T, U>(
        &self,
        items: Vec<T>,
        f: fn(T) -> U,
    ) -> GuardResult<Vec<U>>
    where
        T: Send + 'static,
        U: Send + 'static,
    {
        self.monitor.record_isolate();
        let result = map_in_isolate(f, items).await;
        self.observe(&result);
        result
    }

    // ========================================================================
    // Chunked
    // ========================================================================

    /// See [`process_list_in_chunks`](process_list_in_chunks::process_list_in_chunks).
    pub async fn process_list_in_chunks<T, U, F>(
        &self,
        items: impl IntoIterator<Item = T>,
        transform: F,
        chunk_size: usize,
    ) -> GuardResult<Vec<U>>
    where
        F: Fn(T) -> U,
    {
        self.try_process_list_in_chunks(
            items,
            |item| Ok::<U, Infallible>(transform(item)),
            chunk_size,
        )
        .await
    }

    /// See [`try_process_list_in_chunks`](process_list_in_chunks::try_process_list_in_chunks).
    pub async fn try_process_list_in_chunks<T, U, E, F>(
        &self,
        items: impl IntoIterator<Item = T>,
        transform: F,
        chunk_size: usize,
    ) -> GuardResult<Vec<U>, E>
    where
        F: Fn(T) -> Result<U, E>,
    {
        let result = run_chunks(items, transform, chunk_size).await;
        self.observe(&result);
        result.map(|(output, report)| {
            self.monitor.record_chunk_job(report);
            output
        })
    }

    /// Chunked processing with a chunk size picked from the list length.
    pub async fn process_list<T, U, F>(&self, items: Vec<T>, transform: F) -> GuardResult<Vec<U>>
    where
        F: Fn(T) -> U,
    {
        let chunk_size = self.config.optimal_chunk_size(items.len());
        self.process_list_in_chunks(items, transform, chunk_size).await
    }

    // ========================================================================
    // Cooperative yield
    // ========================================================================

    pub async fn yield_to_main_thread(&self) {
        self.monitor.record_yield();
        yield_to_main_thread().await;
    }

    fn observe<T, E>(&self, result: &GuardResult<T, E>) {
        match result {
            Ok(_) => self.monitor.record_completed(),
            Err(GuardError::Timeout { .. }) => self.monitor.record_timeout(),
            Err(GuardError::WorkerFailure(_)) => self.monitor.record_worker_failure(),
            Err(GuardError::InvalidArgument(_) | GuardError::Propagated(_)) => {
                self.monitor.record_failure();
            }
        }
    }
}
