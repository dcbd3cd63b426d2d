//! # Shutdown settings for a supervised group.
//!
//! Provides [`Config`], the settings [`Group::supervise`](crate::Group::supervise) uses.
//!
//! ## Sentinel values
//! - `signals = []` → [`QuitSignal::DEFAULT`] (`Interrupt`, `Terminate`)
//! - `grace = 0s` → members get no time: the wait is launched and checked once

use std::time::Duration;

use crate::signals::QuitSignal;

/// Shutdown settings for a supervised group.
///
/// ## Field semantics
/// - `grace`: how long to wait for members after the group scope is cancelled
/// - `signals`: which signals count as quit requests (`[]` = default pair)
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum time to wait for members to stop once the group scope is cancelled.
    ///
    /// If exceeded, the group returns `WakeError::WaitDeadlineExceeded` and
    /// remaining members keep running unobserved.
    pub grace: Duration,

    /// Signals that trigger shutdown. Empty means [`QuitSignal::DEFAULT`].
    pub signals: Vec<QuitSignal>,
}

impl Config {
    /// Returns the signal set with the empty sentinel resolved and duplicates removed.
    pub fn quit_signals(&self) -> Vec<QuitSignal> {
        QuitSignal::resolve(&self.signals)
    }

    /// Returns a copy with `grace` replaced.
    #[must_use]
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Returns a copy with `signals` replaced.
    #[must_use]
    pub fn with_signals(mut self, signals: impl Into<Vec<QuitSignal>>) -> Self {
        self.signals = signals.into();
        self
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `grace = 60s`
    /// - `signals = []` (Interrupt + Terminate)
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(60),
            signals: Vec::new(),
        }
    }
}
