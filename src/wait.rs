//! # Bounded wait for a group to stop after cancellation.
//!
//! [`wait_with_timeout`] replaces a plain "wait for the group" call at the end of a
//! run function. It does nothing until the group's context is cancelled, then calls
//! the wait function once and gives it `timeout` to return.
//!
//! ## Flow
//! ```text
//! wait_with_timeout(ctx, timeout, wait)
//!   ├─► ctx.done().await                  (no work before cancellation)
//!   ├─► tokio::spawn(wait())              (timer starts here)
//!   └─► select! { biased;
//!         result ─► return result as-is
//!         sleep(timeout) ─► WaitDeadlineExceeded
//!                           (spawned wait is detached, its result dropped)
//!       }
//! ```
//!
//! ## Rules
//! - `wait` is invoked **exactly once**, and only after `ctx` is cancelled.
//! - On timeout the wait keeps running; stragglers are not awaited or aborted.
//! - The waiter must **not** be a member of the group it waits for: it would wait for itself.
//! - `timeout == 0`: `wait` is still launched; its result is returned only if it is
//!   already available on the first check, otherwise the deadline error is returned.
//! - A panic inside `wait` is resumed on the caller. If the runtime cancels the
//!   task running `wait`, [`WakeError::WaitAborted`] is returned.

use std::future::Future;
use std::panic;
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle};
use tokio::time;
use tracing::{debug, warn};

use crate::context::Context;
use crate::error::WakeError;

/// Waits for `ctx` to be cancelled, then for `wait` to finish, for at most `timeout`.
///
/// Returns the result of `wait` if it finishes in time, otherwise
/// [`WakeError::WaitDeadlineExceeded`] converted into `E`.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use wake::{Scope, WakeError, wait_with_timeout};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let ctx = Scope::new();
/// ctx.cancel();
///
/// let res = wait_with_timeout(&ctx, Duration::from_millis(50), || async {
///     tokio::time::sleep(Duration::from_secs(5)).await;
///     Ok::<(), WakeError>(())
/// })
/// .await;
/// assert!(matches!(res, Err(WakeError::WaitDeadlineExceeded { .. })));
/// # }
/// ```
pub async fn wait_with_timeout<C, F, Fut, E>(ctx: &C, timeout: Duration, wait: F) -> Result<(), E>
where
    C: Context + ?Sized,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: From<WakeError> + Send + 'static,
{
    ctx.done().await;
    debug!(?timeout, "context cancelled, waiting for group");

    let handle = tokio::spawn(async move { wait().await });
    race(handle, timeout).await
}

/// Same as [`wait_with_timeout`] for a synchronous wait function.
///
/// `wait` runs on Tokio's blocking pool. If it outlives `timeout` it keeps its
/// blocking thread until it returns.
///
/// # Example
/// ```
/// use std::sync::mpsc;
/// use std::time::Duration;
/// use wake::{Scope, WakeError, wait_blocking_with_timeout};
///
/// # #[tokio::main]
/// # async fn main() {
/// let ctx = Scope::new();
/// let (tx, rx) = mpsc::channel::<()>();
/// let worker = std::thread::spawn(move || { let _ = rx.recv(); });
///
/// ctx.cancel();
/// drop(tx);
/// let res = wait_blocking_with_timeout(&ctx, Duration::from_secs(1), move || {
///     let _ = worker.join();
///     Ok::<(), WakeError>(())
/// })
/// .await;
/// assert!(res.is_ok());
/// # }
/// ```
pub async fn wait_blocking_with_timeout<C, F, E>(
    ctx: &C,
    timeout: Duration,
    wait: F,
) -> Result<(), E>
where
    C: Context + ?Sized,
    F: FnOnce() -> Result<(), E> + Send + 'static,
    E: From<WakeError> + Send + 'static,
{
    ctx.done().await;
    debug!(?timeout, "context cancelled, waiting for blocking group");

    let handle = tokio::task::spawn_blocking(wait);
    race(handle, timeout).await
}

/// Races the launched wait against `timeout`; the result branch is checked first.
async fn race<E>(mut handle: JoinHandle<Result<(), E>>, timeout: Duration) -> Result<(), E>
where
    E: From<WakeError>,
{
    tokio::select! {
        biased;
        joined = &mut handle => {
            debug!(ok = matches!(joined, Ok(Ok(()))), "group wait completed within timeout");
            joined.unwrap_or_else(resume)
        }
        _ = time::sleep(timeout) => {
            warn!(?timeout, "group wait exceeded timeout; leaving it running");
            drop(handle);
            Err(WakeError::WaitDeadlineExceeded { timeout }.into())
        }
    }
}

/// Resumes a panic from the wait task; a cancelled task becomes [`WakeError::WaitAborted`].
fn resume<E>(err: JoinError) -> Result<(), E>
where
    E: From<WakeError>,
{
    match err.try_into_panic() {
        Ok(payload) => panic::resume_unwind(payload),
        Err(err) => {
            warn!(%err, "group wait task was cancelled before completing");
            Err(WakeError::WaitAborted.into())
        }
    }
}
