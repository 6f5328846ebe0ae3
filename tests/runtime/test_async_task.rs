//! Tests for async task runtime primitives.

use anr_guard::runtime::{AsyncTask, TaskFailure};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[tokio::test]
async fn test_async_task_spawn() {
    let task = AsyncTask::spawn(|| 42);
    let result = task.await.unwrap();
    assert_eq!(result, 42);
}

#[tokio::test]
async fn test_async_task_spawn_async() {
    let task = AsyncTask::spawn_async(async { 42 });
    let result = task.await.unwrap();
    assert_eq!(result, 42);
}

#[tokio::test]
async fn test_async_task_spawn_panic_is_caught() {
    let task = AsyncTask::spawn(|| -> i32 { panic!("boom") });
    assert_eq!(task.await, Err(TaskFailure::Panicked("boom".to_string())));
}

#[tokio::test]
async fn test_async_task_spawn_async_panic_keeps_formatted_message() {
    let symbol = "TSLA";
    let task = AsyncTask::spawn_async(async move {
        if symbol.len() == 4 {
            panic!("no quote for {symbol}");
        }
        0_u32
    });
    assert_eq!(
        task.await,
        Err(TaskFailure::Panicked("no quote for TSLA".to_string()))
    );
}

#[tokio::test]
async fn test_dropping_handle_does_not_stop_work() {
    let finished = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&finished);

    let task = AsyncTask::spawn_async(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        flag.store(true, Ordering::SeqCst);
    });
    drop(task);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(finished.load(Ordering::SeqCst));
}
