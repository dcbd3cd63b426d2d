//! # Scope: a cancellation token that remembers why it was cancelled.
//!
//! [`Scope`] wraps a [`CancellationToken`] and records the [`ContextError`] that
//! cancelled it. Child scopes are cancelled together with their parent and report
//! the parent's reason unless they were cancelled on their own first.
//!
//! ## Rules
//! - The **first** reason recorded wins; later `cancel()` calls are no-ops.
//! - A deadline is enforced by a small Tokio task that exits as soon as the scope is
//!   cancelled for any reason, so no timer outlives the scope's cancellation.
//! - `with_timeout`/`with_deadline` must be called inside a Tokio runtime.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use super::Context;
use crate::error::ContextError;

struct Inner {
    token: CancellationToken,
    reason: OnceLock<ContextError>,
    parent: Option<Arc<Inner>>,
}

impl Inner {
    fn err(&self) -> Option<ContextError> {
        if !self.token.is_cancelled() {
            return None;
        }
        self.reason
            .get()
            .copied()
            .or_else(|| self.parent.as_ref().and_then(|p| p.err()))
            .or(Some(ContextError::Canceled))
    }

    fn cancel_with(&self, reason: ContextError) {
        if self.token.is_cancelled() {
            return;
        }
        let _ = self.reason.set(reason);
        self.token.cancel();
    }
}

/// Cloneable cancellable context with a reason.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use wake::{Context, ContextError, Scope};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let root = Scope::new();
/// let short = root.with_timeout(Duration::from_millis(10));
///
/// short.done().await;
/// assert_eq!(short.err(), Some(ContextError::DeadlineExceeded));
/// assert_eq!(root.err(), None);
/// # }
/// ```
#[derive(Clone)]
pub struct Scope {
    inner: Arc<Inner>,
}

impl Scope {
    /// Creates a root scope. It is only ever cancelled by [`Scope::cancel`].
    pub fn new() -> Self {
        Self::from_token(CancellationToken::new())
    }

    /// Wraps an existing token. Cancelling the token from outside reports [`ContextError::Canceled`].
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            inner: Arc::new(Inner {
                token,
                reason: OnceLock::new(),
                parent: None,
            }),
        }
    }

    /// Derives a child scope, cancelled when `self` is cancelled.
    pub fn child(&self) -> Self {
        Self {
            inner: Arc::new(Inner {
                token: self.inner.token.child_token(),
                reason: OnceLock::new(),
                parent: Some(Arc::clone(&self.inner)),
            }),
        }
    }

    /// Derives a child scope that cancels itself with [`ContextError::DeadlineExceeded`]
    /// after `timeout`.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derives a child scope that cancels itself with [`ContextError::DeadlineExceeded`]
    /// at `deadline`.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let child = self.child();
        let inner = Arc::clone(&child.inner);
        tokio::spawn(async move {
            tokio::select! {
                _ = inner.token.cancelled() => {}
                _ = time::sleep_until(deadline) => {
                    inner.cancel_with(ContextError::DeadlineExceeded);
                }
            }
        });
        child
    }

    /// Cancels the scope (and its children) with [`ContextError::Canceled`].
    pub fn cancel(&self) {
        self.inner.cancel_with(ContextError::Canceled);
    }

    /// Returns `true` once the scope is cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.inner.token.is_cancelled()
    }

    /// Returns the underlying token, e.g. to hand to code that only knows tokens.
    pub fn token(&self) -> &CancellationToken {
        &self.inner.token
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope").field("err", &self.inner.err()).finish()
    }
}

#[async_trait]
impl Context for Scope {
    async fn done(&self) {
        self.inner.token.cancelled().await
    }

    fn err(&self) -> Option<ContextError> {
        self.inner.err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancel_records_canceled() {
        let scope = Scope::new();
        assert_eq!(scope.err(), None);
        scope.cancel();
        scope.done().await;
        assert_eq!(scope.err(), Some(ContextError::Canceled));
    }

    #[tokio::test]
    async fn test_deadline_records_deadline_exceeded() {
        let root = Scope::new();
        let scope = root.with_timeout(Duration::from_millis(20));
        time::timeout(Duration::from_millis(500), scope.done())
            .await
            .expect("deadline should fire");
        assert_eq!(scope.err(), Some(ContextError::DeadlineExceeded));
        assert!(!root.is_cancelled());
    }

    #[tokio::test]
    async fn test_child_reports_parent_reason() {
        let root = Scope::new();
        let parent = root.with_timeout(Duration::from_millis(10));
        let child = parent.child();
        child.done().await;
        assert_eq!(child.err(), Some(ContextError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_first_reason_wins() {
        let root = Scope::new();
        let scope = root.with_timeout(Duration::from_millis(10));
        scope.cancel();
        time::sleep(Duration::from_millis(30)).await;
        assert_eq!(scope.err(), Some(ContextError::Canceled));
    }

    #[tokio::test]
    async fn test_child_cancel_does_not_touch_parent() {
        let root = Scope::new();
        let child = root.child();
        child.cancel();
        assert!(child.is_cancelled());
        assert_eq!(root.err(), None);
    }

    #[tokio::test]
    async fn test_external_token_cancel_reads_as_canceled() {
        let token = CancellationToken::new();
        let scope = Scope::from_token(token.clone());
        token.cancel();
        assert_eq!(scope.err(), Some(ContextError::Canceled));
    }
}
