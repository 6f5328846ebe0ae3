//! `anr_guard` - keep interactive clients responsive
//!
//! Small async helpers that stop long work from starving the thread an
//! interactive client schedules its UI on:
//!
//! - bounded-time execution ([`execute_with_timeout`])
//! - off-thread execution of pure functions ([`execute_in_isolate`])
//! - chunked list processing with cooperative yields
//!   ([`process_list_in_chunks`])
//! - an explicit yield point ([`yield_to_main_thread`])
//!
//! [`AsyncGuard`] bundles them with a [`GuardConfig`] and reports outcomes to
//! an injected [`MonitoringService`].

// Module declarations
pub mod guard;
pub mod runtime;

// Re-export runtime types
pub use runtime::{AsyncTask, TaskFailure, yield_to_main_thread};

// Re-export guard types
pub use guard::{
    AsyncGuard, ConfigError, GuardConfig, GuardError, GuardResult, MonitoringService,
    OperationKind, PerformanceStats,
};

// Re-export guard operations
pub use guard::{
    execute_in_isolate, execute_named_with_timeout, execute_with_timeout, map_in_isolate,
    process_list_in_chunks, try_execute_in_isolate, try_process_list_in_chunks,
};
