//! # Group: members sharing one scope, first error wins.
//!
//! A [`Group`] runs futures ("members") on a [`JoinSet`]. All members get clones of
//! the same [`Scope`]. The first member to fail records its error and cancels the
//! scope, telling its siblings to stop.
//!
//! ## Architecture
//! ```text
//! Group::new(parent) ──► (group, scope = parent.child())
//!
//!   group.spawn(member) ── JoinSet ──► member.await
//!                                        └─ Err(e) ─► first error slot (once)
//!                                                     scope.cancel()
//!
//! group.wait():
//!   join all members ─► scope.cancel() ─► first error or Ok(())
//!
//! group.supervise(cfg):
//!   spawn listen_for_quit_signal(scope, cfg.quit_signals())
//!   wait_with_timeout(scope, cfg.grace, || group.wait())
//! ```
//!
//! ## Rules
//! - Only the **first** error is kept; later errors are dropped.
//! - `wait()` cancels the scope once every member has returned, so listeners stop too.
//! - A member panic cancels the scope as soon as `wait()` joins it, and is resumed
//!   once the remaining members finish.

use std::future::Future;
use std::panic;
use std::sync::{Arc, Mutex};

use tokio::task::JoinSet;
use tracing::debug;

use super::Config;
use crate::context::Scope;
use crate::error::WakeError;
use crate::signals::listen_for_quit_signal;
use crate::wait::wait_with_timeout;

/// Set of concurrent members sharing a cancellable [`Scope`].
pub struct Group<E> {
    scope: Scope,
    set: JoinSet<()>,
    first: Arc<Mutex<Option<E>>>,
}

impl<E> Group<E>
where
    E: Send + 'static,
{
    /// Creates a group whose scope is a child of `parent`.
    ///
    /// Returns the group and a clone of its scope for members to watch.
    pub fn new(parent: &Scope) -> (Self, Scope) {
        let scope = parent.child();
        let group = Self {
            scope: scope.clone(),
            set: JoinSet::new(),
            first: Arc::new(Mutex::new(None)),
        };
        (group, scope)
    }

    /// Returns the group's scope.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Number of members that have not been joined yet.
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Returns `true` if no members are pending.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Spawns a member. If it returns `Err` first among members, the error is kept
    /// and the group scope is cancelled.
    pub fn spawn<F>(&mut self, member: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
    {
        let scope = self.scope.clone();
        let first = Arc::clone(&self.first);
        self.set.spawn(async move {
            if let Err(e) = member.await {
                record(&first, e);
                scope.cancel();
            }
        });
    }

    /// Waits for all members, cancels the scope, and returns the first error.
    ///
    /// Call it once the members are spawned; pair it with
    /// [`wait_with_timeout`] to bound the wait after cancellation.
    pub async fn wait(mut self) -> Result<(), E> {
        let mut panicked = None;
        while let Some(joined) = self.set.join_next().await {
            if let Err(e) = joined {
                if e.is_panic() {
                    // A panicked member never records an error; stop the siblings here.
                    self.scope.cancel();
                    if panicked.is_none() {
                        panicked = Some(e.into_panic());
                    }
                }
            }
        }
        self.scope.cancel();

        if let Some(payload) = panicked {
            panic::resume_unwind(payload);
        }
        match take(&self.first) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<E> Group<E>
where
    E: From<WakeError> + Send + 'static,
{
    /// Runs the group until a quit signal arrives or a member fails, then waits up to
    /// `cfg.grace` for every member to stop.
    ///
    /// A quit-signal listener for [`Config::quit_signals`] is added as a member, so a
    /// delivered signal surfaces as the group's first error
    /// ([`WakeError::ReceivedQuitSignal`] converted into `E`).
    pub async fn supervise(mut self, cfg: &Config) -> Result<(), E> {
        let signals = cfg.quit_signals();
        let scope = self.scope.clone();
        let listener_scope = scope.clone();
        self.spawn(async move {
            Err(listen_for_quit_signal(&listener_scope, &signals)
                .await
                .into())
        });

        debug!(members = self.len(), grace = ?cfg.grace, "group supervised");
        wait_with_timeout(&scope, cfg.grace, move || self.wait()).await
    }
}

fn record<E>(slot: &Mutex<Option<E>>, err: E) {
    let mut guard = match slot.lock() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    };
    if guard.is_none() {
        *guard = Some(err);
    }
}

fn take<E>(slot: &Mutex<Option<E>>) -> Option<E> {
    match slot.lock() {
        Ok(mut g) => g.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    }
}
