//! # Quit listener: turns an OS quit signal into a group-cancelling error.
//!
//! [`listen_for_quit_signal`] is meant to run as one member of a group whose
//! members share a context. When a quit signal arrives it returns
//! [`WakeError::ReceivedQuitSignal`], the group records it as its first error and
//! cancels the shared context.
//!
//! Unlike "cancel a token on signal" helpers, the result tells the two stop causes
//! apart:
//! - context cancelled elsewhere → [`WakeError::Context`] carrying the context's reason;
//! - quit signal observed here    → [`WakeError::ReceivedQuitSignal`] naming the signal.
//!
//! ## Flow
//! ```text
//! listen_for_quit_signal(ctx, signals)
//!   ├─► resolve(signals)          (empty → {Interrupt, Terminate})
//!   ├─► Subscription::new()       (synchronous, before the first await)
//!   └─► select! {
//!         ctx.done()   ─► drop subscription ─► Context(ctx.err())
//!         sub.recv()   ─► drop subscription ─► ReceivedQuitSignal{signal}
//!       }
//! ```
//!
//! If both are ready at once either branch may win.

use tracing::debug;

use super::{QuitSignal, Subscription};
use crate::context::Context;
use crate::error::{ContextError, WakeError};

/// Waits for a quit signal or for `ctx` to be cancelled, whichever comes first.
///
/// `signals` names the signals to treat as quit requests; an empty slice means
/// [`QuitSignal::DEFAULT`] (`Interrupt` and `Terminate`).
///
/// This future never completes "successfully": every outcome is a [`WakeError`]:
/// - [`WakeError::ReceivedQuitSignal`]: a subscribed signal arrived;
/// - [`WakeError::Context`]: `ctx` was cancelled, with its reason unchanged;
/// - [`WakeError::Register`]: a signal could not be subscribed to (e.g. [`QuitSignal::Kill`]).
///
/// The subscription is made on the first poll, before any waiting starts, and is
/// released before the future completes.
///
/// # Example
/// ```no_run
/// use wake::{Group, Scope, WakeError, listen_for_quit_signal};
///
/// # #[tokio::main]
/// # async fn main() {
/// let (mut group, ctx) = Group::<WakeError>::new(&Scope::new());
/// let listener_ctx = ctx.clone();
/// group.spawn(async move { Err(listen_for_quit_signal(&listener_ctx, &[]).await) });
/// // ... spawn the service members with `ctx.clone()` ...
/// let err = group.wait().await.unwrap_err();
/// println!("{err}"); // "interrupt: received quit signal"
/// # }
/// ```
pub async fn listen_for_quit_signal<C>(ctx: &C, signals: &[QuitSignal]) -> WakeError
where
    C: Context + ?Sized,
{
    let signals = QuitSignal::resolve(signals);
    let mut sub = match Subscription::new(&signals) {
        Ok(sub) => sub,
        Err(e) => return e,
    };

    tokio::select! {
        _ = ctx.done() => {
            drop(sub);
            let reason = ctx.err().unwrap_or(ContextError::Canceled);
            debug!(%reason, "quit listener stopped by context");
            WakeError::Context(reason)
        }
        Some(signal) = sub.recv() => {
            drop(sub);
            debug!(%signal, "quit signal received");
            WakeError::ReceivedQuitSignal { signal }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::context::Scope;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn test_parent_cancel_returns_context_reason() {
        let scope = Scope::new();
        let canceller = scope.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let err = tokio::time::timeout(
            Duration::from_secs(1),
            listen_for_quit_signal(&scope, &[QuitSignal::Hangup]),
        )
        .await
        .expect("listener should return after cancel");
        assert!(matches!(err, WakeError::Context(ContextError::Canceled)));
    }

    #[tokio::test]
    async fn test_deadline_reason_passes_through() {
        let scope = Scope::new().with_timeout(Duration::from_millis(30));
        let err = listen_for_quit_signal(&scope, &[QuitSignal::Hangup]).await;
        assert_eq!(err.context_reason(), Some(ContextError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_already_cancelled_token_returns_immediately() {
        let token = CancellationToken::new();
        token.cancel();
        let err = tokio::time::timeout(
            Duration::from_millis(200),
            listen_for_quit_signal(&token, &[QuitSignal::Hangup]),
        )
        .await
        .expect("listener should not block on a cancelled token");
        assert_eq!(err.to_string(), "context canceled");
    }

    #[tokio::test]
    async fn test_kill_cannot_be_subscribed() {
        let token = CancellationToken::new();
        let err = listen_for_quit_signal(&token, &[QuitSignal::Kill]).await;
        match err {
            WakeError::Register { signal, .. } => assert_eq!(signal, QuitSignal::Kill),
            other => panic!("expected Register error, got {other:?}"),
        }
    }
}
