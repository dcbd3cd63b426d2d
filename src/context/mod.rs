//! # Cancellable contexts.
//!
//! A [`Context`] is anything that can report "I was told to stop" together with a
//! reason. Both primitives of this crate consume one and never create one.
//!
//! Two implementations ship with the crate:
//! - [`CancellationToken`]: the bare token; its reason is always [`ContextError::Canceled`];
//! - [`Scope`]: a token plus a recorded reason, with child scopes and deadlines.
//!
//! ```text
//!   Scope::new() ──► child() ──► with_timeout(5s)
//!        │              │              │
//!     cancel()          │         (deadline) ─► err() = DeadlineExceeded
//!        └──────────────┴──────────────┴──────► err() = Canceled
//! ```

mod scope;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

pub use scope::Scope;

use crate::error::ContextError;

/// # Cancellation source with a reason.
///
/// Implementors must make [`done`](Context::done) complete once and for all after
/// cancellation, and [`err`](Context::err) return `Some` from that point on.
#[async_trait]
pub trait Context: Send + Sync {
    /// Completes when the context is cancelled. Returns immediately if it already is.
    async fn done(&self);

    /// Returns the cancellation reason, or `None` while the context is live.
    fn err(&self) -> Option<ContextError>;

    /// Returns `true` once the context is cancelled.
    fn is_done(&self) -> bool {
        self.err().is_some()
    }
}

#[async_trait]
impl Context for CancellationToken {
    async fn done(&self) {
        self.cancelled().await
    }

    fn err(&self) -> Option<ContextError> {
        self.is_cancelled().then_some(ContextError::Canceled)
    }
}

#[async_trait]
impl<C: Context + ?Sized> Context for std::sync::Arc<C> {
    async fn done(&self) {
        (**self).done().await
    }

    fn err(&self) -> Option<ContextError> {
        (**self).err()
    }
}
