//! # OS quit signals.
//!
//! - [`QuitSignal`]: platform-neutral signal identifier with a display name;
//! - [`listen_for_quit_signal`]: waits for a quit signal or context cancellation;
//! - `Subscription`: per-call scoped registration with the runtime's signal driver.

mod listener;
mod quit;
mod subscription;

pub use listener::listen_for_quit_signal;
pub use quit::QuitSignal;

pub(crate) use subscription::Subscription;
