//! Bounded wait driven by a plain `CancellationToken`, as a group's owner would use it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::task::TaskTracker;
use wake::{CancellationToken, WakeError, is_wait_deadline_exceeded, wait_with_timeout};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("worker failed")]
    Worker,
    #[error("shutdown")]
    Wake(#[from] WakeError),
}

#[tokio::test]
async fn straggler_hits_deadline_at_timeout() {
    let token = CancellationToken::new();
    token.cancel();

    let started = Instant::now();
    let res = wait_with_timeout(&token, Duration::from_secs(1), || async {
        time::sleep(Duration::from_millis(1500)).await;
        Ok::<(), AppError>(())
    })
    .await;

    let elapsed = started.elapsed();
    let err = res.unwrap_err();
    assert!(is_wait_deadline_exceeded(&err));
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_millis(1400), "took {elapsed:?}");
}

#[tokio::test]
async fn sentinel_error_returned_immediately() {
    let token = CancellationToken::new();
    token.cancel();

    let started = Instant::now();
    let res = wait_with_timeout(&token, Duration::from_secs(1), || async {
        Err(AppError::Worker)
    })
    .await;

    assert!(matches!(res, Err(AppError::Worker)));
    assert!(started.elapsed() < Duration::from_millis(200));
}

#[tokio::test]
async fn task_tracker_members_drain_within_timeout() {
    let token = CancellationToken::new();
    let tracker = TaskTracker::new();
    let drained = Arc::new(AtomicBool::new(false));

    for _ in 0..4 {
        let token = token.clone();
        tracker.spawn(async move {
            token.cancelled().await;
            time::sleep(Duration::from_millis(50)).await;
        });
    }
    tracker.close();

    let canceller = token.clone();
    tokio::spawn(async move {
        time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let flag = Arc::clone(&drained);
    let res = wait_with_timeout(&token, Duration::from_secs(1), move || async move {
        tracker.wait().await;
        flag.store(true, Ordering::SeqCst);
        Ok::<(), WakeError>(())
    })
    .await;

    assert!(res.is_ok());
    assert!(drained.load(Ordering::SeqCst));
}
