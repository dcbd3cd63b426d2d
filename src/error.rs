//! Error types returned by the quit listener and the bounded waiter.
//!
//! - [`WakeError`]: outcomes of [`listen_for_quit_signal`](crate::listen_for_quit_signal)
//!   and [`wait_with_timeout`](crate::wait_with_timeout).
//! - [`ContextError`]: the reason a [`Context`](crate::Context) was cancelled.
//!
//! Callers usually wrap these (in `anyhow`, or in their own enums). Use
//! [`WakeError::find`], [`is_quit_signal`] or [`is_wait_deadline_exceeded`] to
//! recognise them through any number of wrapping layers. Wrappers must expose the
//! inner error via `source()` (`#[source]`/`#[from]` in thiserror, `.context()` in
//! anyhow); `#[error(transparent)]` forwards past it and hides it.

use std::error::Error as StdError;
use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::signals::QuitSignal;

/// # Reason a context was cancelled.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextError {
    /// Cancelled explicitly (by a caller, or by a group member failing).
    #[error("context canceled")]
    Canceled,

    /// The context's own deadline passed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// # Errors produced by the quit listener and the bounded waiter.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WakeError {
    /// One of the subscribed quit signals was delivered to the process.
    #[error("{signal}: received quit signal")]
    ReceivedQuitSignal {
        /// The signal that arrived.
        signal: QuitSignal,
    },

    /// The wait function did not return before the timeout elapsed.
    ///
    /// The wait function itself keeps running in the background.
    #[error("wait func didn't complete within {timeout:?}")]
    WaitDeadlineExceeded {
        /// The configured timeout.
        timeout: Duration,
    },

    /// The task running the wait function was cancelled before it returned, which
    /// happens when the runtime shuts down underneath the waiter.
    #[error("wait func was aborted before completing")]
    WaitAborted,

    /// The context was cancelled before any quit signal arrived; carries its reason unchanged.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// The platform refused to install a handler for the signal.
    #[error("failed to subscribe to {signal}: {source}")]
    Register {
        /// The signal that could not be subscribed to.
        signal: QuitSignal,
        /// Error reported by the runtime's signal driver.
        #[source]
        source: io::Error,
    },
}

impl WakeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use wake::{QuitSignal, WakeError};
    ///
    /// let err = WakeError::ReceivedQuitSignal { signal: QuitSignal::Interrupt };
    /// assert_eq!(err.as_label(), "received_quit_signal");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WakeError::ReceivedQuitSignal { .. } => "received_quit_signal",
            WakeError::WaitDeadlineExceeded { .. } => "wait_deadline_exceeded",
            WakeError::WaitAborted => "wait_aborted",
            WakeError::Context(ContextError::Canceled) => "context_canceled",
            WakeError::Context(ContextError::DeadlineExceeded) => "context_deadline_exceeded",
            WakeError::Register { .. } => "signal_register_failed",
        }
    }

    /// Returns the quit signal if this is [`WakeError::ReceivedQuitSignal`].
    pub fn quit_signal(&self) -> Option<QuitSignal> {
        match self {
            WakeError::ReceivedQuitSignal { signal } => Some(*signal),
            _ => None,
        }
    }

    /// Returns the context reason if this is [`WakeError::Context`].
    pub fn context_reason(&self) -> Option<ContextError> {
        match self {
            WakeError::Context(reason) => Some(*reason),
            _ => None,
        }
    }

    /// Finds the first [`WakeError`] in `err`'s source chain, `err` itself included.
    ///
    /// # Example
    /// ```
    /// use wake::{QuitSignal, WakeError};
    ///
    /// let err = anyhow::Error::new(WakeError::ReceivedQuitSignal { signal: QuitSignal::Terminate })
    ///     .context("service loop")
    ///     .context("run");
    /// let found = WakeError::find(&*err).unwrap();
    /// assert_eq!(found.quit_signal(), Some(QuitSignal::Terminate));
    /// ```
    pub fn find<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a WakeError> {
        let mut cur: Option<&'a (dyn StdError + 'static)> = Some(err);
        while let Some(e) = cur {
            if let Some(wake) = e.downcast_ref::<WakeError>() {
                return Some(wake);
            }
            cur = e.source();
        }
        None
    }
}

/// Reports whether `err` (or anything in its source chain) is [`WakeError::ReceivedQuitSignal`].
pub fn is_quit_signal(err: &(dyn StdError + 'static)) -> bool {
    matches!(
        WakeError::find(err),
        Some(WakeError::ReceivedQuitSignal { .. })
    )
}

/// Reports whether `err` (or anything in its source chain) is [`WakeError::WaitDeadlineExceeded`].
pub fn is_wait_deadline_exceeded(err: &(dyn StdError + 'static)) -> bool {
    matches!(
        WakeError::find(err),
        Some(WakeError::WaitDeadlineExceeded { .. })
    )
}
