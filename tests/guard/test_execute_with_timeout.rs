//! Tests for bounded-time execution.

use anr_guard::runtime::AsyncTask;
use anr_guard::{GuardError, execute_named_with_timeout, execute_with_timeout};
use std::convert::Infallible;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::{Instant, sleep};

async fn delayed<T>(after: Duration, value: T) -> Result<T, Infallible> {
    sleep(after).await;
    Ok(value)
}

#[tokio::test(start_paused = true)]
async fn test_fast_operation_resolves() {
    let result = execute_with_timeout(
        delayed(Duration::from_millis(50), "ok"),
        Duration::from_secs(1),
    )
    .await;
    assert_eq!(result.unwrap(), "ok");
}

#[tokio::test(start_paused = true)]
async fn test_slow_operation_times_out_on_schedule() {
    let started = Instant::now();
    let result = execute_with_timeout(
        delayed(Duration::from_secs(1), "late"),
        Duration::from_millis(100),
    )
    .await;
    let elapsed = started.elapsed();

    assert!(result.unwrap_err().is_timeout());
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed <= Duration::from_millis(120));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_fires_within_tolerance_for_several_bounds() {
    for millis in [10_u64, 100, 250, 1000] {
        let bound = Duration::from_millis(millis);
        let started = Instant::now();
        let result = execute_with_timeout(std::future::pending::<Result<(), Infallible>>(), bound).await;
        let elapsed = started.elapsed();

        assert!(result.unwrap_err().is_timeout());
        assert!(elapsed >= bound);
        assert!(elapsed <= bound.mul_f64(1.2));
    }
}

#[tokio::test(start_paused = true)]
async fn test_timeout_error_carries_configured_duration() {
    let err = execute_named_with_timeout(
        "fetch_market_movers",
        delayed(Duration::from_secs(5), ()),
        Duration::from_millis(250),
    )
    .await
    .unwrap_err();

    match err {
        GuardError::Timeout {
            operation,
            duration,
        } => {
            assert_eq!(operation, "fetch_market_movers");
            assert_eq!(duration, Duration::from_millis(250));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_operation_error_is_propagated_unchanged() {
    let op = async { Err::<(), _>(io::Error::new(io::ErrorKind::NotFound, "no tips document")) };
    let err = execute_with_timeout(op, Duration::from_secs(1))
        .await
        .unwrap_err();

    assert!(!err.is_timeout());
    let inner = err.into_propagated().expect("propagated error");
    assert_eq!(inner.kind(), io::ErrorKind::NotFound);
    assert_eq!(inner.to_string(), "no tips document");
}

#[tokio::test]
async fn test_zero_timeout_is_invalid_and_op_not_polled() {
    let polled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&polled);
    let op = async move {
        flag.store(true, Ordering::SeqCst);
        Ok::<_, Infallible>(1)
    };

    let err = execute_with_timeout(op, Duration::ZERO).await.unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(!polled.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn test_ready_operation_wins_against_tiny_timeout() {
    for _ in 0..100 {
        let result =
            execute_with_timeout(std::future::ready(Ok::<_, Infallible>(7)), Duration::from_nanos(1))
                .await;
        assert_eq!(result.unwrap(), 7);
    }
}

#[tokio::test(start_paused = true)]
async fn test_timeout_stops_waiting_not_spawned_work() {
    let finished = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&finished);
    let work = AsyncTask::spawn_async(async move {
        sleep(Duration::from_millis(300)).await;
        flag.store(true, Ordering::SeqCst);
        "refreshed"
    });

    let result = execute_with_timeout(work, Duration::from_millis(100)).await;
    assert!(result.unwrap_err().is_timeout());
    assert!(!finished.load(Ordering::SeqCst));

    sleep(Duration::from_millis(400)).await;
    assert!(finished.load(Ordering::SeqCst));
}

#[test]
fn test_timeout_display() {
    let err: GuardError = GuardError::Timeout {
        operation: "operation".to_string(),
        duration: Duration::from_millis(100),
    };
    assert_eq!(err.to_string(), "Operation timed out: operation after 100ms");
}
