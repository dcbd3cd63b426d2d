//! # QuitSignal: platform-neutral quit signal identifier.
//!
//! Named variants cover the signals services usually treat as "please stop";
//! [`QuitSignal::Raw`] reaches any other Unix signal number.
//!
//! The display name is what ends up in
//! [`WakeError::ReceivedQuitSignal`](crate::WakeError::ReceivedQuitSignal)'s
//! message, e.g. `interrupt: received quit signal`.

use std::fmt;

/// Operating system signal that a caller treats as a request to quit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuitSignal {
    /// `SIGINT` on Unix, Ctrl-C elsewhere.
    Interrupt,
    /// `SIGTERM`, sent by service managers and `kill`.
    Terminate,
    /// `SIGQUIT`.
    Quit,
    /// `SIGHUP`.
    Hangup,
    /// `SIGUSR1`.
    User1,
    /// `SIGUSR2`.
    User2,
    /// `SIGKILL`. Cannot be intercepted; subscribing to it always fails.
    Kill,
    /// Any other signal, by its Unix number.
    Raw(i32),
}

impl QuitSignal {
    /// The set used when a caller does not name any signals.
    pub const DEFAULT: [QuitSignal; 2] = [QuitSignal::Interrupt, QuitSignal::Terminate];

    /// Returns `signals` with duplicates removed, or [`QuitSignal::DEFAULT`] when empty.
    ///
    /// Order of first occurrence is preserved.
    pub fn resolve(signals: &[QuitSignal]) -> Vec<QuitSignal> {
        if signals.is_empty() {
            return Self::DEFAULT.to_vec();
        }
        let mut out = Vec::with_capacity(signals.len());
        for s in signals {
            if !out.contains(s) {
                out.push(*s);
            }
        }
        out
    }

    /// Human-readable name, e.g. `"interrupt"` or `"terminated"`.
    pub fn name(&self) -> String {
        match self {
            QuitSignal::Interrupt => "interrupt".into(),
            QuitSignal::Terminate => "terminated".into(),
            QuitSignal::Quit => "quit".into(),
            QuitSignal::Hangup => "hangup".into(),
            QuitSignal::User1 => "user defined signal 1".into(),
            QuitSignal::User2 => "user defined signal 2".into(),
            QuitSignal::Kill => "killed".into(),
            QuitSignal::Raw(n) => match raw_name(*n) {
                Some(name) => name.into(),
                None => format!("signal {n}"),
            },
        }
    }

    /// Unix signal number.
    #[cfg(unix)]
    pub fn as_raw(&self) -> i32 {
        use tokio::signal::unix::SignalKind;

        match self {
            QuitSignal::Interrupt => SignalKind::interrupt().as_raw_value(),
            QuitSignal::Terminate => SignalKind::terminate().as_raw_value(),
            QuitSignal::Quit => SignalKind::quit().as_raw_value(),
            QuitSignal::Hangup => SignalKind::hangup().as_raw_value(),
            QuitSignal::User1 => SignalKind::user_defined1().as_raw_value(),
            QuitSignal::User2 => SignalKind::user_defined2().as_raw_value(),
            QuitSignal::Kill => 9,
            QuitSignal::Raw(n) => *n,
        }
    }
}

/// Platform name of a signal number that has no named variant.
#[cfg(unix)]
fn raw_name(n: i32) -> Option<&'static str> {
    use tokio::signal::unix::SignalKind;

    const NAMES: [(fn() -> SignalKind, &str); 11] = [
        (SignalKind::interrupt, "interrupt"),
        (SignalKind::terminate, "terminated"),
        (SignalKind::quit, "quit"),
        (SignalKind::hangup, "hangup"),
        (SignalKind::user_defined1, "user defined signal 1"),
        (SignalKind::user_defined2, "user defined signal 2"),
        (SignalKind::alarm, "alarm clock"),
        (SignalKind::pipe, "broken pipe"),
        (SignalKind::child, "child exited"),
        (SignalKind::window_change, "window changed"),
        (SignalKind::io, "I/O possible"),
    ];
    NAMES
        .iter()
        .find(|(kind, _)| kind().as_raw_value() == n)
        .map(|(_, name)| *name)
}

#[cfg(not(unix))]
fn raw_name(_: i32) -> Option<&'static str> {
    None
}

impl fmt::Display for QuitSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
