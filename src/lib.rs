//! # wake
//!
//! **wake** provides the two small pieces a "group of tasks sharing one
//! cancellation scope" needs around shutdown:
//!
//! - [`listen_for_quit_signal`] turns an OS quit signal (SIGINT, SIGTERM, ...) into an
//!   error that cancels the group, and tells "a signal arrived" apart from "someone
//!   else cancelled us";
//! - [`wait_with_timeout`] waits for the group to stop after cancellation, but only
//!   for a bounded time.
//!
//! ## Architecture
//! ```text
//!                  parent Scope
//!                       │ child()
//!                       ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │ Group (shared Scope, first error cancels it)                  │
//! │                                                               │
//! │  ┌──────────────────────┐  ┌──────────────┐  ┌──────────────┐ │
//! │  │ listen_for_quit_     │  │  service #1  │  │  service #2  │ │
//! │  │ signal(scope, sigs)  │  │ (scope.done) │  │ (scope.done) │ │
//! │  └──────────┬───────────┘  └──────────────┘  └──────────────┘ │
//! │             │ SIGINT ─► Err(ReceivedQuitSignal) ─► cancel     │
//! └─────────────┼─────────────────────────────────────────────────┘
//!               ▼
//! wait_with_timeout(scope, grace, || group.wait())
//!   ├─ scope.done()      (blocks until cancelled)
//!   ├─ spawn group.wait()
//!   └─ first of: group result │ grace elapsed ─► WaitDeadlineExceeded
//! ```
//!
//! ## Features
//! | Area           | Description                                                   | Key types / fns                                  |
//! |----------------|---------------------------------------------------------------|--------------------------------------------------|
//! | **Signals**    | Quit signal to error, with the signal's name                  | [`listen_for_quit_signal`], [`QuitSignal`]       |
//! | **Bounded wait** | Post-cancellation join with a timeout                       | [`wait_with_timeout`], [`wait_blocking_with_timeout`] |
//! | **Contexts**   | Cancellation with a reason (canceled / deadline exceeded)     | [`Context`], [`Scope`]                           |
//! | **Groups**     | errgroup-style members, first error cancels the rest          | [`Group`], [`Config`]                            |
//! | **Errors**     | Typed errors recognisable through wrapping                    | [`WakeError`], [`ContextError`], [`is_quit_signal`] |
//!
//! ## Logging
//! The crate emits [`tracing`] events (`debug`/`trace`, one `warn` on a missed
//! deadline) and never installs a subscriber.
//!
//! ## Example
//! ```rust,no_run
//! use std::time::Duration;
//! use wake::{Context, Group, Scope, WakeError, listen_for_quit_signal, wait_with_timeout};
//!
//! async fn run(parent: &Scope) -> Result<(), WakeError> {
//!     let (mut group, ctx) = Group::new(parent);
//!
//!     let listener_ctx = ctx.clone();
//!     group.spawn(async move { Err(listen_for_quit_signal(&listener_ctx, &[]).await) });
//!
//!     let service_ctx = ctx.clone();
//!     group.spawn(async move {
//!         service_ctx.done().await;
//!         // flush, close connections...
//!         Ok(())
//!     });
//!
//!     wait_with_timeout(&ctx, Duration::from_secs(1), move || group.wait()).await
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     match run(&Scope::new()).await {
//!         Err(e) if wake::is_quit_signal(&e) => println!("{e}"),
//!         other => println!("stopped: {other:?}"),
//!     }
//! }
//! ```

mod context;
mod error;
mod signals;
mod supervise;
mod wait;

// ---- Public re-exports ----

pub use context::{Context, Scope};
pub use error::{ContextError, WakeError, is_quit_signal, is_wait_deadline_exceeded};
pub use signals::{QuitSignal, listen_for_quit_signal};
pub use supervise::{Config, Group};
pub use wait::{wait_blocking_with_timeout, wait_with_timeout};

// Re-exported so callers can build contexts without naming tokio-util themselves.
pub use tokio_util::sync::CancellationToken;
