//! # Example: graceful
//!
//! A service run function in the group pattern: a quit-signal listener and two
//! workers share one scope; Ctrl-C cancels the scope and the run function waits at
//! most one second for the workers to stop.
//!
//! ## Flow
//! ```text
//! main()
//!   └─► run(scope)
//!         ├─► Group::new(scope)
//!         ├─► member: listen_for_quit_signal(ctx, [])   (SIGINT/SIGTERM)
//!         ├─► member: "ticker" (prints until cancelled, stops fast)
//!         ├─► member: "flusher" (takes 3s to stop → straggler)
//!         └─► wait_with_timeout(ctx, 1s, || group.wait())
//!
//! Ctrl-C ─► Err(ReceivedQuitSignal) ─► scope cancelled
//!        ─► ticker stops, flusher still flushing
//!        ─► 1s later: WaitDeadlineExceeded
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example graceful
//! # press Ctrl-C
//! ```

use std::time::Duration;

use tracing_subscriber::EnvFilter;
use wake::{
    Context, Group, Scope, WakeError, is_quit_signal, is_wait_deadline_exceeded,
    listen_for_quit_signal, wait_with_timeout,
};

async fn run(parent: &Scope) -> Result<(), WakeError> {
    let (mut group, ctx) = Group::new(parent);

    let listener_ctx = ctx.clone();
    group.spawn(async move { Err(listen_for_quit_signal(&listener_ctx, &[]).await) });

    let ticker_ctx = ctx.clone();
    group.spawn(async move {
        let mut n = 0u32;
        loop {
            tokio::select! {
                _ = ticker_ctx.done() => {
                    println!("[ticker] stopping after {n} ticks");
                    return Ok(());
                }
                _ = tokio::time::sleep(Duration::from_millis(500)) => {
                    n += 1;
                    println!("[ticker] tick {n}");
                }
            }
        }
    });

    let flusher_ctx = ctx.clone();
    group.spawn(async move {
        flusher_ctx.done().await;
        println!("[flusher] flushing buffers (3s)");
        tokio::time::sleep(Duration::from_secs(3)).await;
        Ok(())
    });

    wait_with_timeout(&ctx, Duration::from_secs(1), move || group.wait()).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    println!("=== graceful example === (press Ctrl-C)");

    match run(&Scope::new()).await {
        Ok(()) => println!("all members stopped"),
        Err(e) if is_quit_signal(&e) => println!("stopped by signal: {e}"),
        Err(e) if is_wait_deadline_exceeded(&e) => println!("gave up waiting: {e}"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
