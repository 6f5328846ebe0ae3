//! Runtime module
//!
//! Provides the worker hand-off handle and the cooperative yield point the
//! guard operations are built from.

pub mod async_task;
pub mod yield_now;

pub use async_task::{AsyncTask, TaskFailure};
pub use yield_now::yield_to_main_thread;
