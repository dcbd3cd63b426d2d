//! # Scoped OS signal subscription.
//!
//! [`Subscription`] owns one runtime signal stream per requested [`QuitSignal`].
//! Streams are created synchronously in [`Subscription::new`], so a signal raised
//! right after it returns is buffered, never lost. Dropping the subscription
//! releases every stream it holds.
//!
//! ## Signals
//! **Unix platforms:** any catchable signal (`SIGINT`, `SIGTERM`, `SIGQUIT`, `SIGHUP`,
//! `SIGUSR1`, `SIGUSR2`, raw numbers). `SIGKILL`/`SIGSTOP` and the fault signals are
//! refused by the runtime.
//!
//! **Windows platforms:**
//! - [`QuitSignal::Interrupt`] ← `CTRL_C_EVENT`, `CTRL_BREAK_EVENT`
//! - [`QuitSignal::Terminate`] ← `CTRL_CLOSE_EVENT`, `CTRL_SHUTDOWN_EVENT`
//!
//! Anything else is reported as [`io::ErrorKind::Unsupported`].

use std::future::poll_fn;
use std::io;
use std::task::{Context, Poll};

use tracing::trace;

use super::QuitSignal;
use crate::error::WakeError;

#[cfg(unix)]
mod platform {
    use super::*;
    use tokio::signal::unix::{Signal, SignalKind, signal};

    pub(super) struct Stream(Signal);

    impl Stream {
        pub(super) fn open(sig: QuitSignal) -> io::Result<Vec<Stream>> {
            let kind = SignalKind::from_raw(sig.as_raw());
            Ok(vec![Stream(signal(kind)?)])
        }

        pub(super) fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<Option<()>> {
            self.0.poll_recv(cx)
        }
    }
}

#[cfg(windows)]
mod platform {
    use super::*;
    use tokio::signal::windows;

    pub(super) enum Stream {
        CtrlC(windows::CtrlC),
        CtrlBreak(windows::CtrlBreak),
        CtrlClose(windows::CtrlClose),
        CtrlShutdown(windows::CtrlShutdown),
    }

    impl Stream {
        pub(super) fn open(sig: QuitSignal) -> io::Result<Vec<Stream>> {
            match sig {
                QuitSignal::Interrupt => Ok(vec![
                    Stream::CtrlC(windows::ctrl_c()?),
                    Stream::CtrlBreak(windows::ctrl_break()?),
                ]),
                QuitSignal::Terminate => Ok(vec![
                    Stream::CtrlClose(windows::ctrl_close()?),
                    Stream::CtrlShutdown(windows::ctrl_shutdown()?),
                ]),
                other => Err(io::Error::new(
                    io::ErrorKind::Unsupported,
                    format!("{other} cannot be subscribed to on this platform"),
                )),
            }
        }

        pub(super) fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<Option<()>> {
            match self {
                Stream::CtrlC(s) => s.poll_recv(cx),
                Stream::CtrlBreak(s) => s.poll_recv(cx),
                Stream::CtrlClose(s) => s.poll_recv(cx),
                Stream::CtrlShutdown(s) => s.poll_recv(cx),
            }
        }
    }
}

/// Signal streams held for the lifetime of one listener call.
///
/// Must be created inside a Tokio runtime with the signal driver enabled.
pub(crate) struct Subscription {
    streams: Vec<(QuitSignal, platform::Stream)>,
}

impl Subscription {
    /// Subscribes to every signal in `signals` (already resolved, no duplicates).
    ///
    /// On failure, streams opened so far are dropped before the error is returned.
    pub(crate) fn new(signals: &[QuitSignal]) -> Result<Self, WakeError> {
        let mut streams = Vec::with_capacity(signals.len());
        for &signal in signals {
            let opened = platform::Stream::open(signal)
                .map_err(|source| WakeError::Register { signal, source })?;
            streams.extend(opened.into_iter().map(|s| (signal, s)));
        }
        trace!(?signals, "quit signal subscription registered");
        Ok(Self { streams })
    }

    /// Waits for the next subscribed signal.
    ///
    /// Returns `None` once every stream is closed (the runtime is shutting down).
    pub(crate) async fn recv(&mut self) -> Option<QuitSignal> {
        poll_fn(|cx| {
            let mut open = 0;
            for (signal, stream) in self.streams.iter_mut() {
                match stream.poll_recv(cx) {
                    Poll::Ready(Some(())) => return Poll::Ready(Some(*signal)),
                    Poll::Ready(None) => {}
                    Poll::Pending => open += 1,
                }
            }
            if open == 0 {
                Poll::Ready(None)
            } else {
                Poll::Pending
            }
        })
        .await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        trace!(streams = self.streams.len(), "quit signal subscription released");
    }
}
